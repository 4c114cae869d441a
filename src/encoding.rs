//! Category tables that turn form labels into the integer codes the classifier was trained on.
//!
//! Every table is a `'static` slice of `(label, code)` pairs listed in the order the form
//! presents them. Labels are opaque keys: they must match the training-time spelling byte for
//! byte, including the `"Divorced/Seperated"` typo carried over from the survey data.

use std::fmt;

use thiserror::Error;

/// Categorical (and ordinal) fields collected by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Country,
    Location,
    Cellphone,
    Gender,
    Relationship,
    Marital,
    Education,
    Job,
}

impl Field {
    /// The label-encoded fields, in feature-vector order.
    pub const CATEGORICAL: [Field; 8] = [
        Field::Education,
        Field::Country,
        Field::Location,
        Field::Cellphone,
        Field::Gender,
        Field::Relationship,
        Field::Marital,
        Field::Job,
    ];

    /// Stable identifier used in error messages, logs, and JSON input.
    pub fn key(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Country => "country",
            Field::Location => "location",
            Field::Cellphone => "cellphone",
            Field::Gender => "gender",
            Field::Relationship => "relationship",
            Field::Marital => "marital",
            Field::Education => "education",
            Field::Job => "job",
        }
    }

    /// Look a field up by its identifier.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }

    /// Every field, in the order the form lays them out after the two numeric inputs.
    pub const ALL: [Field; 9] = [
        Field::Year,
        Field::Education,
        Field::Country,
        Field::Location,
        Field::Cellphone,
        Field::Gender,
        Field::Relationship,
        Field::Marital,
        Field::Job,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A label reached the encoder that is not part of its field's closed set.
///
/// This means the form's choice lists drifted from the model's training-time encoding. It is
/// never coerced to a default code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("label {label:?} is not in the {field} domain")]
pub struct DomainMismatch {
    pub field: Field,
    pub label: String,
}

type Table = &'static [(&'static str, u8)];

const COUNTRY: Table = &[("Kenya", 0), ("Rwanda", 1), ("Tanzania", 2), ("Uganda", 3)];

const LOCATION: Table = &[("Rural", 0), ("Urban", 1)];

const CELLPHONE: Table = &[("Yes", 1), ("No", 0)];

const GENDER: Table = &[("Female", 0), ("Male", 1)];

const RELATIONSHIP: Table = &[
    ("Spouse", 0),
    ("Head of Household", 1),
    ("Other relative", 2),
    ("Child", 3),
    ("Parent", 4),
    ("Other non-relatives", 5),
];

const MARITAL: Table = &[
    ("Married/Living together", 0),
    ("Widowed", 1),
    ("Single/Never Married", 2),
    ("Divorced/Seperated", 3),
    ("Dont know", 4),
];

// Form order, not code order.
const EDUCATION: Table = &[
    ("Secondary education", 3),
    ("No formal education", 0),
    ("Vocational/Specialised training", 5),
    ("Primary education", 2),
    ("Tertiary education", 4),
    ("Other/Dont know/RTA", 1),
];

const JOB: Table = &[
    ("Self employed", 0),
    ("Government Dependent", 1),
    ("Formally employed Private", 2),
    ("Informally employed", 3),
    ("Formally employed Government", 4),
    ("Farming and Fishing", 5),
    ("Remittance Dependent", 6),
    ("Other Income", 7),
    ("Dont Know/Refuse to answer", 8),
    ("No Income", 9),
];

/// Immutable label-to-code table for one field.
#[derive(Debug, Clone, Copy)]
pub struct CategoryMapping {
    entries: Table,
}

impl CategoryMapping {
    /// Table for `field`, or `None` for the ordinal year field which has no label table.
    pub fn for_field(field: Field) -> Option<Self> {
        let entries = match field {
            Field::Year => return None,
            Field::Country => COUNTRY,
            Field::Location => LOCATION,
            Field::Cellphone => CELLPHONE,
            Field::Gender => GENDER,
            Field::Relationship => RELATIONSHIP,
            Field::Marital => MARITAL,
            Field::Education => EDUCATION,
            Field::Job => JOB,
        };
        Some(Self { entries })
    }

    /// Code for `label`, if the label belongs to this field's domain.
    pub fn code(&self, label: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|(key, _)| *key == label)
            .map(|(_, code)| *code)
    }

    /// Labels in form order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(label, _)| *label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Encode `label` for `field` using the training-time table.
pub fn encode(field: Field, label: &str) -> Result<u8, DomainMismatch> {
    CategoryMapping::for_field(field)
        .and_then(|mapping| mapping.code(label))
        .ok_or_else(|| DomainMismatch {
            field,
            label: label.to_string(),
        })
}

/// Labels a form should offer for `field`, in presentation order.
///
/// The year field returns its survey years rendered as text.
pub fn choices(field: Field) -> Vec<String> {
    match CategoryMapping::for_field(field) {
        Some(mapping) => mapping.labels().map(str::to_string).collect(),
        None => crate::features::SURVEY_YEARS
            .iter()
            .map(u16::to_string)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_match_training_codes() {
        let expected: &[(Field, &[(&str, u8)])] = &[
            (
                Field::Country,
                &[("Kenya", 0), ("Rwanda", 1), ("Tanzania", 2), ("Uganda", 3)],
            ),
            (Field::Location, &[("Rural", 0), ("Urban", 1)]),
            (Field::Cellphone, &[("Yes", 1), ("No", 0)]),
            (Field::Gender, &[("Female", 0), ("Male", 1)]),
            (
                Field::Relationship,
                &[
                    ("Spouse", 0),
                    ("Head of Household", 1),
                    ("Other relative", 2),
                    ("Child", 3),
                    ("Parent", 4),
                    ("Other non-relatives", 5),
                ],
            ),
            (
                Field::Marital,
                &[
                    ("Married/Living together", 0),
                    ("Widowed", 1),
                    ("Single/Never Married", 2),
                    ("Divorced/Seperated", 3),
                    ("Dont know", 4),
                ],
            ),
            (
                Field::Education,
                &[
                    ("No formal education", 0),
                    ("Other/Dont know/RTA", 1),
                    ("Primary education", 2),
                    ("Secondary education", 3),
                    ("Tertiary education", 4),
                    ("Vocational/Specialised training", 5),
                ],
            ),
            (
                Field::Job,
                &[
                    ("Self employed", 0),
                    ("Government Dependent", 1),
                    ("Formally employed Private", 2),
                    ("Informally employed", 3),
                    ("Formally employed Government", 4),
                    ("Farming and Fishing", 5),
                    ("Remittance Dependent", 6),
                    ("Other Income", 7),
                    ("Dont Know/Refuse to answer", 8),
                    ("No Income", 9),
                ],
            ),
        ];
        for (field, pairs) in expected {
            let mapping = CategoryMapping::for_field(*field).unwrap();
            assert!(!mapping.is_empty(), "{field} table is empty");
            assert_eq!(mapping.len(), pairs.len(), "{field} table size");
            for (label, code) in *pairs {
                assert_eq!(encode(*field, label), Ok(*code), "{field}/{label}");
                assert_eq!(encode(*field, label), encode(*field, label));
            }
        }
    }

    #[test]
    fn codes_are_unique_per_field() {
        for field in Field::ALL {
            let Some(mapping) = CategoryMapping::for_field(field) else {
                continue;
            };
            let mut codes: Vec<u8> = mapping.labels().filter_map(|l| mapping.code(l)).collect();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), mapping.len(), "{field} has duplicate codes");
        }
    }

    #[test]
    fn spot_checks() {
        assert_eq!(encode(Field::Education, "Vocational/Specialised training"), Ok(5));
        assert_eq!(encode(Field::Job, "No Income"), Ok(9));
        assert_eq!(encode(Field::Marital, "Divorced/Seperated"), Ok(3));
    }

    #[test]
    fn corrected_spelling_is_rejected() {
        let err = encode(Field::Marital, "Divorced/Separated").unwrap_err();
        assert_eq!(err.field, Field::Marital);
        assert_eq!(err.label, "Divorced/Separated");
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert!(encode(Field::Country, "kenya").is_err());
        assert!(encode(Field::Country, "Kenya ").is_err());
    }

    #[test]
    fn year_has_no_label_table() {
        assert!(CategoryMapping::for_field(Field::Year).is_none());
        assert!(encode(Field::Year, "2018").is_err());
        assert_eq!(choices(Field::Year), vec!["2018", "2016", "2017"]);
    }

    #[test]
    fn choices_follow_form_order() {
        let education = choices(Field::Education);
        assert_eq!(education.first().map(String::as_str), Some("Secondary education"));
        assert_eq!(education.len(), 6);
        assert_eq!(choices(Field::Cellphone), vec!["Yes", "No"]);
    }

    #[test]
    fn field_keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("salary"), None);
    }
}
