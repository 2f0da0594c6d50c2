//! Prescription record model and its YAML/JSON wire format.
//!
//! A [`ClinicalRecord`] is assembled entirely by the caller (a form, a fixture file, or another
//! service) and handed to the renderer as an immutable value. Nothing in this module validates
//! clinical content; it only guarantees the shape.
//!
//! Keys are camelCase. The older portal payload names (`prescriptionId`, `date`, `doctor`) are
//! accepted as aliases so existing fixtures keep loading.

use crate::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single prescription event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ClinicalRecord {
    /// Caller-assigned identifier, printed as "Prescription ID".
    #[serde(alias = "prescriptionId")]
    pub record_id: String,

    /// Display-formatted issue date. Not parsed.
    #[serde(alias = "date")]
    pub issued_date: String,

    pub patient: PatientDetails,

    #[serde(alias = "doctor")]
    pub prescriber: Prescriber,

    pub diagnosis: String,

    /// Display order is input order.
    pub medications: Vec<Medication>,

    pub general_instructions: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientDetails {
    pub name: String,
    pub id: String,
    /// Age in whole years.
    pub age: u32,
    pub gender: String,
    pub phone: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Prescriber {
    pub name: String,
    pub license: String,
    pub specialty: String,
}

/// One line of the medication list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Medication {
    pub name: String,
    /// Strength, for example "500mg".
    pub dosage: String,
    pub frequency: String,
    /// When to take it relative to meals or time of day.
    pub timing: String,
    pub duration: String,
    pub instructions: String,
}

/// Serialisation format of a record file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordFormat {
    Yaml,
    Json,
}

impl RecordFormat {
    /// Pick a format from a file extension. Anything other than `.json` is read as YAML, which
    /// is a superset of JSON for the documents we accept.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => RecordFormat::Json,
            _ => RecordFormat::Yaml,
        }
    }
}

impl ClinicalRecord {
    /// Follow-up date exactly as supplied, if one is set and not empty.
    pub fn follow_up(&self) -> Option<&str> {
        self.follow_up_date
            .as_deref()
            .filter(|date| !date.is_empty())
    }

    /// Parse a record from YAML text.
    ///
    /// This uses `serde_path_to_error` to surface the path (e.g. `medications[1].dosage`) to the
    /// failing field when the text does not match the record schema.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SchemaMismatch`] if:
    /// - the YAML is malformed,
    /// - a required field is missing or has an unexpected type,
    /// - any unknown keys are present.
    pub fn from_yaml_str(yaml_text: &str) -> CoreResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        deserialize_with_path("clinical record", deserializer)
    }

    /// Parse a record from JSON text. See [`ClinicalRecord::from_yaml_str`] for error details.
    pub fn from_json_str(json_text: &str) -> CoreResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        let record = deserialize_with_path("clinical record", &mut deserializer)?;
        deserializer
            .end()
            .map_err(|e| schema_mismatch("clinical record", String::new(), e))?;
        Ok(record)
    }

    /// Parse a record in the given format.
    pub fn parse(text: &str, format: RecordFormat) -> CoreResult<Self> {
        match format {
            RecordFormat::Yaml => Self::from_yaml_str(text),
            RecordFormat::Json => Self::from_json_str(text),
        }
    }

    /// Read and parse a record file, choosing the format from its extension.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded clinical record from {}", path.display());
        Self::parse(&text, RecordFormat::from_path(path))
    }
}

/// Deserialize `T`, attaching the failing field path to any error.
pub(crate) fn deserialize_with_path<'de, D, T>(what: &'static str, deserializer: D) -> CoreResult<T>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    serde_path_to_error::deserialize::<_, T>(deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        schema_mismatch(what, path, source)
    })
}

fn schema_mismatch(what: &'static str, path: String, source: impl std::fmt::Display) -> CoreError {
    let path = if path.is_empty() || path == "." {
        "<root>".to_string()
    } else {
        path
    };
    CoreError::SchemaMismatch {
        what,
        path,
        message: source.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn amoxicillin_record() -> ClinicalRecord {
        ClinicalRecord {
            record_id: "RX-2024-001".into(),
            issued_date: "2024-12-15".into(),
            patient: PatientDetails {
                name: "Priya Sharma".into(),
                id: "PT-1042".into(),
                age: 34,
                gender: "Female".into(),
                phone: "+91 98765 43210".into(),
            },
            prescriber: Prescriber {
                name: "Dr. Sarah Johnson".into(),
                license: "MCI-55821".into(),
                specialty: "General Medicine".into(),
            },
            diagnosis: "Acute bacterial sinusitis".into(),
            medications: vec![Medication {
                name: "Amoxicillin".into(),
                dosage: "500mg".into(),
                frequency: "3x/day".into(),
                timing: "after meals".into(),
                duration: "7 days".into(),
                instructions: "complete full course".into(),
            }],
            general_instructions: "Rest and drink plenty of fluids.".into(),
            follow_up_date: None,
        }
    }

    const YAML_RECORD: &str = r#"
recordId: RX-2024-001
issuedDate: 2024-12-15
patient:
  name: Priya Sharma
  id: PT-1042
  age: 34
  gender: Female
  phone: "+91 98765 43210"
prescriber:
  name: Dr. Sarah Johnson
  license: MCI-55821
  specialty: General Medicine
diagnosis: Acute bacterial sinusitis
medications:
  - name: Amoxicillin
    dosage: 500mg
    frequency: 3x/day
    timing: after meals
    duration: 7 days
    instructions: complete full course
generalInstructions: Rest and drink plenty of fluids.
"#;

    #[test]
    fn parses_yaml_record() {
        let record = ClinicalRecord::from_yaml_str(YAML_RECORD).unwrap();
        assert_eq!(record, amoxicillin_record());
        assert!(record.follow_up().is_none());
    }

    #[test]
    fn parses_json_with_portal_aliases() {
        let json = r#"{
            "prescriptionId": "RX-2024-001",
            "date": "2024-12-15",
            "patient": {"name": "Priya Sharma", "id": "PT-1042", "age": 34, "gender": "Female", "phone": "+91 98765 43210"},
            "doctor": {"name": "Dr. Sarah Johnson", "license": "MCI-55821", "specialty": "General Medicine"},
            "diagnosis": "Acute bacterial sinusitis",
            "medications": [{"name": "Amoxicillin", "dosage": "500mg", "frequency": "3x/day", "timing": "after meals", "duration": "7 days", "instructions": "complete full course"}],
            "generalInstructions": "Rest and drink plenty of fluids.",
            "followUpDate": "2025-01-10"
        }"#;
        let record = ClinicalRecord::from_json_str(json).unwrap();
        assert_eq!(record.record_id, "RX-2024-001");
        assert_eq!(record.prescriber.name, "Dr. Sarah Johnson");
        assert_eq!(record.follow_up(), Some("2025-01-10"));
    }

    #[test]
    fn schema_error_reports_field_path() {
        let broken = YAML_RECORD.replace("age: 34", "age: thirty-four");
        let err = ClinicalRecord::from_yaml_str(&broken).unwrap_err();
        match err {
            CoreError::SchemaMismatch { path, .. } => assert_eq!(path, "patient.age"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let extra = format!("{YAML_RECORD}pharmacy: Central\n");
        let err = ClinicalRecord::from_yaml_str(&extra).unwrap_err();
        assert!(err.to_string().contains("pharmacy"));
    }

    #[test]
    fn trailing_json_is_rejected() {
        let json = serde_json::to_string(&amoxicillin_record()).unwrap();
        let err = ClinicalRecord::from_json_str(&format!("{json} {{}}")).unwrap_err();
        assert!(matches!(err, CoreError::SchemaMismatch { .. }));
    }

    #[test]
    fn only_empty_follow_up_counts_as_absent() {
        let mut record = amoxicillin_record();
        record.follow_up_date = Some(String::new());
        assert!(record.follow_up().is_none());

        record.follow_up_date = Some("   ".into());
        assert_eq!(record.follow_up(), Some("   "));
    }

    #[test]
    fn follow_up_is_kept_verbatim() {
        let mut record = amoxicillin_record();
        record.follow_up_date = Some(" 2025-01-10 ".into());
        assert_eq!(record.follow_up(), Some(" 2025-01-10 "));
    }

    #[test]
    fn format_is_chosen_by_extension() {
        assert_eq!(
            RecordFormat::from_path(Path::new("rx.JSON")),
            RecordFormat::Json
        );
        assert_eq!(
            RecordFormat::from_path(Path::new("rx.yaml")),
            RecordFormat::Yaml
        );
        assert_eq!(RecordFormat::from_path(Path::new("rx")), RecordFormat::Yaml);
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.yaml");
        std::fs::write(&path, YAML_RECORD).unwrap();
        assert_eq!(ClinicalRecord::load(&path).unwrap(), amoxicillin_record());
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = ClinicalRecord::load(&path).unwrap_err();
        assert!(matches!(err, CoreError::FileRead { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn sample_fixture_parses() {
        let record = ClinicalRecord::from_yaml_str(include_str!("../fixtures/prescription.yaml"))
            .unwrap();
        assert_eq!(record.patient.name, "John Doe");
        assert_eq!(record.medications.len(), 2);
        assert_eq!(record.medications[1].name, "Aspirin");
        assert_eq!(record.follow_up(), Some("January 15, 2025"));
    }
}
