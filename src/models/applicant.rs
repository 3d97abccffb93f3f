//! Applicant model and related types.
//!
//! The applicant is the person whose entitlement is being evaluated. Only
//! age and gender matter to the engine; gender selects the statutory
//! retirement age.

use serde::{Deserialize, Serialize};

/// The applicant's gender as reported by the caller.
///
/// Unrecognised values deserialize to [`Gender::Unspecified`] rather than
/// failing, so a malformed gender falls back to the default retirement age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male applicant.
    Male,
    /// Female applicant.
    Female,
    /// Not reported or not recognised.
    #[serde(other)]
    Unspecified,
}

/// The person an entitlement is calculated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    /// Age in completed years.
    pub age: u32,
    /// Gender, used to select the retirement age.
    pub gender: Gender,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_known_genders() {
        let male: Gender = serde_json::from_str("\"male\"").unwrap();
        let female: Gender = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(male, Gender::Male);
        assert_eq!(female, Gender::Female);
    }

    #[test]
    fn test_unknown_gender_falls_back_to_unspecified() {
        let gender: Gender = serde_json::from_str("\"otro\"").unwrap();
        assert_eq!(gender, Gender::Unspecified);
    }

    #[test]
    fn test_deserialize_applicant() {
        let json = r#"{ "age": 58, "gender": "female" }"#;
        let applicant: Applicant = serde_json::from_str(json).unwrap();
        assert_eq!(applicant.age, 58);
        assert_eq!(applicant.gender, Gender::Female);
    }
}
