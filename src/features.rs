//! Raw form values and the fixed-order feature vector the classifier consumes.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::encoding::{DomainMismatch, Field, encode};

/// Survey years offered by the year selector, in selector order.
pub const SURVEY_YEARS: [u16; 3] = [2018, 2016, 2017];

/// Number of values per feature vector.
pub const FEATURE_LEN: usize = 11;

/// Column names in the order the classifier was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_LEN] = [
    "year",
    "household_size",
    "age_of_respondent",
    "education_level",
    "country",
    "location_type",
    "cellphone_access",
    "gender_of_respondent",
    "relationship_with_head",
    "marital_status",
    "job_type",
];

/// Unencoded form values for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    pub year: u16,
    pub household_size: NonZeroU32,
    pub age: u32,
    pub education: String,
    pub country: String,
    pub location: String,
    pub cellphone: String,
    pub gender: String,
    pub relationship: String,
    pub marital: String,
    pub job: String,
}

impl RawInput {
    /// Label currently held for a categorical field, `None` for the year.
    pub fn label(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Year => return None,
            Field::Country => &self.country,
            Field::Location => &self.location,
            Field::Cellphone => &self.cellphone,
            Field::Gender => &self.gender,
            Field::Relationship => &self.relationship,
            Field::Marital => &self.marital,
            Field::Education => &self.education,
            Field::Job => &self.job,
        };
        Some(value.as_str())
    }
}

/// Encoded, ordered model input. The order is a contract with the model artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; FEATURE_LEN]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Value of the named column.
    pub fn get(&self, name: &str) -> Option<f32> {
        FEATURE_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|idx| self.0[idx])
    }
}

impl AsRef<[f32]> for FeatureVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// Encode the categorical fields and lay every value out in training order.
pub fn assemble(raw: &RawInput) -> Result<FeatureVector, DomainMismatch> {
    if !SURVEY_YEARS.contains(&raw.year) {
        return Err(DomainMismatch {
            field: Field::Year,
            label: raw.year.to_string(),
        });
    }
    let code = |field: Field, label: &str| encode(field, label).map(f32::from);
    let vector = FeatureVector([
        f32::from(raw.year),
        raw.household_size.get() as f32,
        raw.age as f32,
        code(Field::Education, &raw.education)?,
        code(Field::Country, &raw.country)?,
        code(Field::Location, &raw.location)?,
        code(Field::Cellphone, &raw.cellphone)?,
        code(Field::Gender, &raw.gender)?,
        code(Field::Relationship, &raw.relationship)?,
        code(Field::Marital, &raw.marital)?,
        code(Field::Job, &raw.job)?,
    ]);
    tracing::debug!(features = ?vector.as_slice(), "Assembled feature vector");
    Ok(vector)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_input() -> RawInput {
        RawInput {
            year: 2018,
            household_size: NonZeroU32::new(3).unwrap(),
            age: 34,
            education: "Secondary education".into(),
            country: "Kenya".into(),
            location: "Urban".into(),
            cellphone: "Yes".into(),
            gender: "Female".into(),
            relationship: "Head of Household".into(),
            marital: "Single/Never Married".into(),
            job: "Informally employed".into(),
        }
    }

    #[test]
    fn assembles_reference_person() {
        let vector = assemble(&sample_input()).unwrap();
        assert_eq!(
            vector.as_slice(),
            &[2018.0, 3.0, 34.0, 3.0, 0.0, 1.0, 1.0, 0.0, 1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn categorical_slots_match_encoder() {
        let mut raw = sample_input();
        raw.country = "Uganda".into();
        raw.job = "No Income".into();
        raw.marital = "Divorced/Seperated".into();
        let vector = assemble(&raw).unwrap();
        assert_eq!(vector.as_slice().len(), FEATURE_LEN);
        for field in Field::CATEGORICAL {
            let label = raw.label(field).unwrap();
            let expected = f32::from(encode(field, label).unwrap());
            assert_eq!(vector.get(column_for(field)), Some(expected), "{field}");
        }
    }

    #[test]
    fn numeric_fields_pass_through() {
        let mut raw = sample_input();
        raw.year = 2016;
        raw.household_size = NonZeroU32::new(21).unwrap();
        raw.age = 0;
        let vector = assemble(&raw).unwrap();
        assert_eq!(vector.get("year"), Some(2016.0));
        assert_eq!(vector.get("household_size"), Some(21.0));
        assert_eq!(vector.get("age_of_respondent"), Some(0.0));
    }

    #[test]
    fn unknown_year_is_domain_mismatch() {
        let mut raw = sample_input();
        raw.year = 2019;
        let err = assemble(&raw).unwrap_err();
        assert_eq!(err.field, Field::Year);
        assert_eq!(err.label, "2019");
    }

    #[test]
    fn bad_label_aborts_assembly() {
        let mut raw = sample_input();
        raw.job = "Astronaut".into();
        let err = assemble(&raw).unwrap_err();
        assert_eq!(err.field, Field::Job);
    }

    #[test]
    fn zero_household_is_rejected_by_deserializer() {
        let json = serde_json::json!({
            "year": 2018, "household_size": 0, "age": 34,
            "education": "Secondary education", "country": "Kenya", "location": "Urban",
            "cellphone": "Yes", "gender": "Female", "relationship": "Head of Household",
            "marital": "Single/Never Married", "job": "Informally employed"
        });
        assert!(serde_json::from_value::<RawInput>(json).is_err());
    }

    fn column_for(field: Field) -> &'static str {
        match field {
            Field::Year => "year",
            Field::Education => "education_level",
            Field::Country => "country",
            Field::Location => "location_type",
            Field::Cellphone => "cellphone_access",
            Field::Gender => "gender_of_respondent",
            Field::Relationship => "relationship_with_head",
            Field::Marital => "marital_status",
            Field::Job => "job_type",
        }
    }
}
