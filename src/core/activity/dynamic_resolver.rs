//! Detection of `{{reference}}` tokens in the configured body fields.
//!
//! A dynamic field takes its value per row (sheets) or per submission (forms)
//! instead of using the configured literal. On sheets the reference is read as
//! column letters; on forms it is matched against question titles.

use once_cell::sync::Lazy;
use regex::Regex;

use super::activity_models::{ActivityField, AddonSettings};

static DYNAMIC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("dynamic token pattern is valid"));

/// A body field bound to a sheet column or form question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicProperty {
    pub field: ActivityField,
    /// Token content without the braces, upper-cased.
    pub reference: String,
    /// 1-based column, when the reference is made of letters only.
    pub column_index: Option<u32>,
}

/// Returns the upper-cased token content if `value` holds a dynamic token.
pub fn dynamic_reference(value: &str) -> Option<String> {
    DYNAMIC_TOKEN
        .captures(value)
        .map(|captures| captures[1].to_uppercase())
}

/// Reads spreadsheet column letters as a bijective base-26 number: A=1, Z=26, AA=27.
///
/// Case-insensitive. Anything other than ASCII letters, or a value too large for
/// a `u32`, is not a column.
pub fn column_number(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }

    letters.chars().try_fold(0u32, |total, letter| {
        if !letter.is_ascii_alphabetic() {
            return None;
        }
        let digit = u32::from(letter.to_ascii_uppercase() as u8 - b'A') + 1;
        total.checked_mul(26)?.checked_add(digit)
    })
}

/// Collects one `DynamicProperty` per configured body field holding a token.
pub fn resolve(settings: &AddonSettings) -> Vec<DynamicProperty> {
    settings
        .fields
        .iter()
        .filter_map(|(field, value)| {
            let reference = dynamic_reference(value)?;
            let column_index = column_number(&reference);
            Some(DynamicProperty {
                field: *field,
                reference,
                column_index,
            })
        })
        .collect()
}

pub fn find_property(
    properties: &[DynamicProperty],
    field: ActivityField,
) -> Option<&DynamicProperty> {
    properties.iter().find(|property| property.field == field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_dynamic(value: &str) -> bool {
        DYNAMIC_TOKEN.is_match(value)
    }

    fn settings(fields: &[(ActivityField, &str)]) -> AddonSettings {
        AddonSettings {
            fields: fields
                .iter()
                .map(|(field, value)| (*field, value.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_column_number_conversion() {
        let cases = [
            ("a", 1),
            ("b", 2),
            ("z", 26),
            ("aa", 27),
            ("az", 52),
            ("Az", 52),
            ("AZ", 52),
            ("BA", 53),
        ];
        for (input, expected) in cases {
            assert_eq!(column_number(input), Some(expected), "input {input}");
        }
    }

    #[test]
    fn test_column_number_grows_with_length() {
        assert!(column_number("ZZ").unwrap() < column_number("AAA").unwrap());
        assert!(column_number("Z").unwrap() < column_number("AA").unwrap());
    }

    #[test]
    fn test_column_number_rejects_non_letters() {
        assert_eq!(column_number(""), None);
        assert_eq!(column_number("A1"), None);
        assert_eq!(column_number("First Name"), None);
        assert_eq!(column_number(&"Z".repeat(10)), None);
    }

    #[test]
    fn test_no_dynamic_properties() {
        assert!(resolve(&AddonSettings::default()).is_empty());
        assert!(resolve(&settings(&[(ActivityField::Text1, "plain")])).is_empty());
    }

    #[test]
    fn test_dynamic_property_details() {
        let result = resolve(&settings(&[(ActivityField::Text1, "{{b}}")]));

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].field, ActivityField::Text1);
        assert_eq!(result[0].reference, "B");
        assert_eq!(result[0].column_index, Some(2));
    }

    #[test]
    fn test_count_matches_token_count() {
        let configured = settings(&[
            (ActivityField::Email, "{{A}}"),
            (ActivityField::Text1, "static"),
            (ActivityField::Text2, "{C}"),
            (ActivityField::Int1, "{{}}"),
            (ActivityField::FirstName, "{{First Name}}"),
        ]);
        let expected = configured
            .fields
            .iter()
            .filter(|(_, value)| is_dynamic(value))
            .count();

        let result = resolve(&configured);

        assert_eq!(result.len(), expected);
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].reference, "FIRST NAME");
        assert_eq!(result[1].column_index, None);
    }

    #[test]
    fn test_find_property() {
        let result = resolve(&settings(&[
            (ActivityField::Verified, "{{C}}"),
            (ActivityField::Issued, "{{D}}"),
        ]));
        let issued = find_property(&result, ActivityField::Issued).unwrap();
        assert_eq!(issued.column_index, Some(4));
        assert!(find_property(&result, ActivityField::Email).is_none());
    }
}
