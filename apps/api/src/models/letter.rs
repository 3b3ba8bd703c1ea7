use serde::{Deserialize, Serialize};

use crate::models::certificate::CertificateFields;

/// Model-written letter bound to one institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLetter {
    pub content: String,
    pub institution: String,
    pub reference_code: String,
}

impl GeneratedLetter {
    /// `legacy_<institution>.txt` with `/` and spaces turned into underscores.
    pub fn file_name(&self) -> String {
        format!(
            "legacy_{}.txt",
            self.institution.replace('/', "_").replace(' ', "_")
        )
    }
}

pub const BUNDLE_FILE_NAME: &str = "legacy_bundle.json";

/// JSON download combining the letter with the fields it was written from.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadBundle<'a> {
    pub institution: &'a str,
    pub extracted_fields: &'a CertificateFields,
    pub letter: &'a str,
}

impl<'a> DownloadBundle<'a> {
    pub fn new(letter: &'a GeneratedLetter, fields: &'a CertificateFields) -> Self {
        Self {
            institution: &letter.institution,
            extracted_fields: fields,
            letter: &letter.content,
        }
    }

    /// Pretty-printed with two-space indentation.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::certificate::FieldName;

    fn letter(institution: &str) -> GeneratedLetter {
        GeneratedLetter {
            content: "Dear Sir or Madam,".to_string(),
            institution: institution.to_string(),
            reference_code: "REF".to_string(),
        }
    }

    #[test]
    fn test_file_name_replaces_slashes_and_spaces() {
        assert_eq!(
            letter("Social Security Administration").file_name(),
            "legacy_Social_Security_Administration.txt"
        );
        assert_eq!(
            letter("Medicare/Medicaid").file_name(),
            "legacy_Medicare_Medicaid.txt"
        );
        assert_eq!(letter("IRS").file_name(), "legacy_IRS.txt");
    }

    #[test]
    fn test_bundle_has_expected_keys_and_indentation() {
        let mut fields = CertificateFields::new();
        fields.set(FieldName::DeceasedName, "Jane A. Doe");
        let letter = letter("IRS");

        let json = DownloadBundle::new(&letter, &fields)
            .to_pretty_json()
            .unwrap();

        assert!(json.starts_with("{\n  \"institution\": \"IRS\""));
        assert!(json.contains("\n  \"extracted_fields\": {\n    \"deceased_name\": \"Jane A. Doe\""));
        assert!(json.contains("\n  \"letter\": \"Dear Sir or Madam,\""));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["extracted_fields"].as_object().unwrap().len(), 9);
    }
}
