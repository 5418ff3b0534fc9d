// A sheet stored as a JSON array of rows, e.g. `[["Email", "Verified"], ["a@x.com", "Y"]]`.
// Strings that parse as RFC 3339 timestamps are read as date cells.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;

use crate::core::activity::CellValue;
use crate::core::addon::{SheetError, TabularDataSource};

pub struct JsonSheet {
    path: PathBuf,
    // Cells stay in their stored JSON form; only changed cells are re-encoded.
    grid: RwLock<Vec<Vec<Value>>>,
}

impl JsonSheet {
    /// Loads the grid; a missing file is an empty sheet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SheetError> {
        let path = path.into();
        let grid = if path.exists() {
            let text = fs::read_to_string(&path).await?;
            serde_json::from_str(&text)?
        } else {
            Vec::new()
        };

        Ok(Self {
            path,
            grid: RwLock::new(grid),
        })
    }

    async fn persist(&self) -> Result<(), SheetError> {
        let text = serde_json::to_string_pretty(&*self.grid.read().await)?;
        fs::write(&self.path, text).await?;
        Ok(())
    }
}

fn cell_from_json(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Bool(flag) => CellValue::Bool(*flag),
        Value::Number(number) => number.as_f64().map(CellValue::Number).unwrap_or_default(),
        Value::String(text) => match DateTime::parse_from_rfc3339(text) {
            Ok(at) => CellValue::Date(at.with_timezone(&Utc)),
            Err(_) => CellValue::Text(text.clone()),
        },
        other => CellValue::Text(other.to_string()),
    }
}

fn cell_to_json(cell: CellValue) -> Value {
    match cell {
        CellValue::Empty => Value::Null,
        CellValue::Text(text) => Value::String(text),
        CellValue::Number(number) if number.fract() == 0.0 && number.abs() < i64::MAX as f64 => {
            Value::from(number as i64)
        }
        CellValue::Number(number) => serde_json::Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        CellValue::Bool(flag) => Value::Bool(flag),
        CellValue::Date(at) => Value::String(at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    }
}

fn is_blank(value: &Value) -> bool {
    cell_from_json(value).is_empty()
}

fn check_origin(row: usize, column: usize) -> Result<(), SheetError> {
    if row == 0 || column == 0 {
        return Err(SheetError::InvalidRange(format!(
            "rows and columns start at 1, got row {} column {}",
            row, column
        )));
    }
    Ok(())
}

#[async_trait]
impl TabularDataSource for JsonSheet {
    async fn last_row(&self) -> Result<usize, SheetError> {
        let grid = self.grid.read().await;
        Ok(grid
            .iter()
            .rposition(|row| row.iter().any(|cell| !is_blank(cell)))
            .map_or(0, |index| index + 1))
    }

    async fn last_column(&self) -> Result<usize, SheetError> {
        let grid = self.grid.read().await;
        Ok(grid
            .iter()
            .filter_map(|row| row.iter().rposition(|cell| !is_blank(cell)))
            .max()
            .map_or(0, |index| index + 1))
    }

    async fn get_values(
        &self,
        row: usize,
        column: usize,
        num_rows: usize,
        num_columns: usize,
    ) -> Result<Vec<Vec<CellValue>>, SheetError> {
        check_origin(row, column)?;
        let grid = self.grid.read().await;

        Ok((row - 1..row - 1 + num_rows)
            .map(|r| {
                (column - 1..column - 1 + num_columns)
                    .map(|c| {
                        grid.get(r)
                            .and_then(|cells| cells.get(c))
                            .map(cell_from_json)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect())
    }

    async fn set_values(
        &self,
        row: usize,
        column: usize,
        values: Vec<Vec<CellValue>>,
    ) -> Result<(), SheetError> {
        check_origin(row, column)?;
        let mut grid = self.grid.write().await;

        for (offset, cells) in values.into_iter().enumerate() {
            let r = row - 1 + offset;
            if grid.len() <= r {
                grid.resize_with(r + 1, Vec::new);
            }
            for (c_offset, cell) in cells.into_iter().enumerate() {
                let c = column - 1 + c_offset;
                let target = &mut grid[r];
                if target.len() <= c {
                    target.resize(c + 1, Value::Null);
                }
                // Rewriting an unchanged value keeps its stored text.
                if cell_from_json(&target[c]) != cell {
                    target[c] = cell_to_json(cell);
                }
            }
        }
        drop(grid); // Release lock before persisting

        self.persist().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    async fn sheet_with(content: &str) -> (tempfile::TempDir, JsonSheet) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.json");
        std::fs::write(&path, content).unwrap();
        let sheet = JsonSheet::open(&path).await.unwrap();
        (dir, sheet)
    }

    #[tokio::test]
    async fn test_bounds_ignore_trailing_blanks() {
        let (_dir, sheet) = sheet_with(
            r#"[["Email", "Verified", null], ["a@x.com", "Y", ""], [null, ""]]"#,
        )
        .await;

        assert_eq!(sheet.last_row().await.unwrap(), 2);
        assert_eq!(sheet.last_column().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_cell_types() {
        let (_dir, sheet) =
            sheet_with(r#"[["a", 1, true, "2020-02-03T04:05:06Z", null]]"#).await;

        let values = sheet.get_values(1, 1, 1, 6).await.unwrap();

        assert_eq!(
            values[0],
            vec![
                CellValue::from("a"),
                CellValue::from(1.0),
                CellValue::from(true),
                CellValue::Date(Utc.with_ymd_and_hms(2020, 2, 3, 4, 5, 6).unwrap()),
                CellValue::Empty,
                CellValue::Empty,
            ]
        );
    }

    #[tokio::test]
    async fn test_set_values_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.json");
        std::fs::write(&path, r#"[["Issued"], ["N"], [""]]"#).unwrap();
        let sheet = JsonSheet::open(&path).await.unwrap();

        sheet
            .set_values(2, 1, vec![vec![CellValue::from("Y")], vec![CellValue::from("Y")]])
            .await
            .unwrap();

        let reopened = JsonSheet::open(&path).await.unwrap();
        let column = reopened.get_values(2, 1, 2, 1).await.unwrap();
        assert_eq!(column, vec![vec![CellValue::from("Y")], vec![CellValue::from("Y")]]);
    }

    #[tokio::test]
    async fn test_write_keeps_untouched_cells_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.json");
        std::fs::write(
            &path,
            r#"[["Id","When","Issued"],[1,"2020-02-03T04:05:06Z",""],[2.5,"2021-01-01T00:00:00+02:00","N"]]"#,
        )
        .unwrap();
        let sheet = JsonSheet::open(&path).await.unwrap();

        // Same shape as the issued write-back: whole column read, one row changed.
        let mut column = sheet.get_values(2, 3, 2, 1).await.unwrap();
        column[0] = vec![CellValue::from("Y")];
        sheet.set_values(2, 3, column).await.unwrap();

        let stored: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            stored,
            serde_json::json!([
                ["Id", "When", "Issued"],
                [1, "2020-02-03T04:05:06Z", "Y"],
                [2.5, "2021-01-01T00:00:00+02:00", "N"]
            ])
        );
        assert!(stored[1][0].is_i64());
    }

    #[tokio::test]
    async fn test_written_whole_numbers_stay_integers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.json");
        let sheet = JsonSheet::open(&path).await.unwrap();

        sheet
            .set_values(1, 1, vec![vec![CellValue::from(3.0), CellValue::from(0.5)]])
            .await
            .unwrap();

        let stored: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(stored, serde_json::json!([[3, 0.5]]));
    }

    #[tokio::test]
    async fn test_zero_origin_is_rejected() {
        let (_dir, sheet) = sheet_with("[]").await;
        assert!(matches!(
            sheet.get_values(0, 1, 1, 1).await,
            Err(SheetError::InvalidRange(_))
        ));
    }
}
