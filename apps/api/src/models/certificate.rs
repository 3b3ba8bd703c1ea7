//! Death certificate field taxonomy and the records built on it.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The fixed set of certificate fields.
///
/// Declaration order is display order; `Ord` follows it, so every `BTreeMap`
/// keyed by `FieldName` iterates in display order too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    DeceasedName,
    DateOfBirth,
    DateOfDeath,
    Ssn,
    Address,
    CauseOfDeath,
    PlaceOfDeath,
    NextOfKin,
    CertificateNumber,
}

impl FieldName {
    pub const ALL: [FieldName; 9] = [
        FieldName::DeceasedName,
        FieldName::DateOfBirth,
        FieldName::DateOfDeath,
        FieldName::Ssn,
        FieldName::Address,
        FieldName::CauseOfDeath,
        FieldName::PlaceOfDeath,
        FieldName::NextOfKin,
        FieldName::CertificateNumber,
    ];

    /// Wire key, as used in model replies, forms and download bundles.
    pub fn key(self) -> &'static str {
        match self {
            FieldName::DeceasedName => "deceased_name",
            FieldName::DateOfBirth => "date_of_birth",
            FieldName::DateOfDeath => "date_of_death",
            FieldName::Ssn => "ssn",
            FieldName::Address => "address",
            FieldName::CauseOfDeath => "cause_of_death",
            FieldName::PlaceOfDeath => "place_of_death",
            FieldName::NextOfKin => "next_of_kin",
            FieldName::CertificateNumber => "certificate_number",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Label shown next to the input on the review form.
    pub fn review_label(self) -> &'static str {
        match self {
            FieldName::DeceasedName => "Full Name",
            FieldName::DateOfBirth => "Date of Birth",
            FieldName::DateOfDeath => "Date of Death",
            FieldName::Ssn => "Social Security Number",
            FieldName::Address => "Last Known Address",
            FieldName::CauseOfDeath => "Cause of Death",
            FieldName::PlaceOfDeath => "Place of Death",
            FieldName::NextOfKin => "Next of Kin",
            FieldName::CertificateNumber => "Certificate Number",
        }
    }

    /// Label used when the field is listed in a letter prompt.
    pub fn letter_label(self) -> &'static str {
        match self {
            FieldName::NextOfKin => "Next of Kin / Estate Representative",
            FieldName::CertificateNumber => "Death Certificate Number",
            other => other.review_label(),
        }
    }
}

/// Renders a loosely-typed JSON value as field text.
///
/// Strings pass through, numbers and booleans are stringified, null and
/// containers become empty.
pub fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// One value per taxonomy field. Always complete: absent fields hold `""`.
///
/// Serializes as a JSON object in display order. Deserializing ignores unknown
/// keys and fills missing ones, so it is safe to accept from clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CertificateFields(BTreeMap<FieldName, String>);

impl Default for CertificateFields {
    fn default() -> Self {
        Self(FieldName::ALL.into_iter().map(|f| (f, String::new())).collect())
    }
}

impl CertificateFields {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the full set by asking `lookup` for each wire key.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self(
            FieldName::ALL
                .into_iter()
                .map(|f| (f, lookup(f.key()).unwrap_or_default()))
                .collect(),
        )
    }

    pub fn from_json_map(map: &serde_json::Map<String, Value>) -> Self {
        Self::from_lookup(|key| map.get(key).map(field_text))
    }

    pub fn get(&self, field: FieldName) -> &str {
        self.0.get(&field).map(String::as_str).unwrap_or_default()
    }

    #[cfg(test)]
    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(f, v)| (*f, v.as_str()))
    }
}

impl<'de> Deserialize<'de> for CertificateFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_json_map(&map))
    }
}

/// Per-field confidence scores in `[0, 1]`. Always complete: absent fields hold `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfidenceScores(BTreeMap<FieldName, f64>);

pub const DEFAULT_CONFIDENCE: f64 = 1.0;

impl Default for ConfidenceScores {
    fn default() -> Self {
        Self(
            FieldName::ALL
                .into_iter()
                .map(|f| (f, DEFAULT_CONFIDENCE))
                .collect(),
        )
    }
}

impl ConfidenceScores {
    /// Numeric scores are clamped into `[0, 1]`; anything else falls back to the default.
    pub fn from_json_map(map: &serde_json::Map<String, Value>) -> Self {
        Self(
            FieldName::ALL
                .into_iter()
                .map(|f| {
                    let score = map
                        .get(f.key())
                        .and_then(Value::as_f64)
                        .filter(|s| s.is_finite())
                        .map(|s| s.clamp(0.0, 1.0))
                        .unwrap_or(DEFAULT_CONFIDENCE);
                    (f, score)
                })
                .collect(),
        )
    }

    pub fn get(&self, field: FieldName) -> f64 {
        self.0.get(&field).copied().unwrap_or(DEFAULT_CONFIDENCE)
    }
}

/// Structured result of reading one certificate image.
///
/// Immutable once produced; the workflow edits a copy of `fields`, never the record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedRecord {
    pub state_detected: String,
    pub fields: CertificateFields,
    pub confidence: ConfidenceScores,
    pub format_notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_taxonomy_keys_round_trip() {
        for field in FieldName::ALL {
            assert_eq!(FieldName::from_key(field.key()), Some(field));
        }
        assert_eq!(FieldName::from_key("favourite_colour"), None);
    }

    #[test]
    fn test_serde_name_matches_wire_key() {
        for field in FieldName::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.key()));
        }
    }

    #[test]
    fn test_letter_labels_differ_only_where_expected() {
        assert_eq!(FieldName::NextOfKin.review_label(), "Next of Kin");
        assert_eq!(
            FieldName::NextOfKin.letter_label(),
            "Next of Kin / Estate Representative"
        );
        assert_eq!(
            FieldName::CertificateNumber.letter_label(),
            "Death Certificate Number"
        );
        assert_eq!(FieldName::Ssn.letter_label(), "Social Security Number");
    }

    #[test]
    fn test_fields_serialize_in_display_order() {
        let mut fields = CertificateFields::new();
        fields.set(FieldName::CertificateNumber, "TX-1");
        fields.set(FieldName::DeceasedName, "Jane Doe");

        let json = serde_json::to_string(&fields).unwrap();
        let name_at = json.find("deceased_name").unwrap();
        let ssn_at = json.find("\"ssn\"").unwrap();
        let cert_at = json.find("certificate_number").unwrap();
        assert!(name_at < ssn_at && ssn_at < cert_at);
        assert!(json.contains("\"certificate_number\":\"TX-1\""));
    }

    #[test]
    fn test_fields_deserialize_ignores_unknown_and_fills_missing() {
        let fields: CertificateFields = serde_json::from_value(json!({
            "deceased_name": "Jane Doe",
            "certificate_number": 12345,
            "shoe_size": "9",
            "ssn": null
        }))
        .unwrap();

        assert_eq!(fields.iter().count(), 9);
        assert_eq!(fields.get(FieldName::DeceasedName), "Jane Doe");
        assert_eq!(fields.get(FieldName::CertificateNumber), "12345");
        assert_eq!(fields.get(FieldName::Ssn), "");
        assert_eq!(fields.get(FieldName::Address), "");
    }

    #[test]
    fn test_confidence_defaults_and_clamps() {
        let map = json!({
            "deceased_name": 0.95,
            "ssn": 1.7,
            "address": -0.2,
            "date_of_birth": "high"
        });
        let scores = ConfidenceScores::from_json_map(map.as_object().unwrap());

        assert!((scores.get(FieldName::DeceasedName) - 0.95).abs() < f64::EPSILON);
        assert_eq!(scores.get(FieldName::Ssn), 1.0);
        assert_eq!(scores.get(FieldName::Address), 0.0);
        assert_eq!(scores.get(FieldName::DateOfBirth), 1.0);
        assert_eq!(scores.get(FieldName::NextOfKin), 1.0);
    }
}
