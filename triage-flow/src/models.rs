use serde::{Deserialize, Serialize};

/// Half-open character interval `[start, end)` locating one occurrence of a
/// mention inside the base text. `text` carries the literal substring for
/// display and redundancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// A candidate symptom mention with its occurrences and, when normalization
/// found a confident match, an ontology binding. The binding fields are
/// all-present or all-absent by upstream contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSymptom {
    pub symptom: String,
    #[serde(default)]
    pub spans: Vec<TextSpan>,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub hpo_id: Option<String>,
    #[serde(default)]
    pub label_en: Option<String>,
    #[serde(default)]
    pub label_ja: Option<String>,
    #[serde(default)]
    pub hpo_url: Option<String>,
}

impl NormalizedSymptom {
    /// Whether normalization bound this mention to an ontology identifier.
    pub fn has_binding(&self) -> bool {
        self.hpo_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub text: String,
    #[serde(default)]
    pub symptoms: Vec<NormalizedSymptom>,
}

/// Ranking target vocabulary of the prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Omim,
    Orphanet,
    Gene,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub hpo_ids: Vec<String>,
    pub target: Target,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseasePrediction {
    pub id: String,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub disease_name_en: Option<String>,
    #[serde(default)]
    pub disease_name_ja: Option<String>,
    #[serde(default)]
    pub disease_url: Option<String>,
    #[serde(default)]
    pub matched_hpo_ids: Vec<String>,
}

/// Ranked predictions as returned by the ranking service. Order is the
/// service's rank order; the session never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub target: Target,
    #[serde(default)]
    pub hpo_ids: Vec<String>,
    #[serde(default)]
    pub predictions: Vec<DiseasePrediction>,
}
