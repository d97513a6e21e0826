use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// One diagnosis. Text fields carry lightweight markup and are passed through untouched.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub diagnosis: String,
    pub confidence: Confidence,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub treatment_plan: String,
    #[serde(default)]
    pub prevention_tips: String,
}

/// Output of the diagnosis service. Only the plant name and labels are read here.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    pub plant: String,
    #[serde(flatten)]
    pub primary: Diagnosis,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub secondary: Option<Diagnosis>,
}

impl DiagnosisResult {
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::InvalidDiagnosis(format!("{}: {e}", path.display())))
    }

    pub fn document_title(&self) -> String {
        format!("Plant Debugger – Debugging Report: {}", self.plant)
    }
}

/// Lower-cased ASCII alphanumerics of `name`; everything else is dropped.
pub fn sanitize_token(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn report_file_name(plant: &str, date: NaiveDate) -> String {
    let token = sanitize_token(plant);
    let token = if token.is_empty() { "plant".to_string() } else { token };
    format!("plant-diagnosis-{token}-{}.pdf", date.format("%Y-%m-%d"))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
