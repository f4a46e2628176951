//! Task results and their parsing from backend bodies.
//!
//! Bodies are validated here so that rendering can stay total: a value of
//! [`TaskResult`] always carries probabilities and similarities within [0, 1].

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::ResponseError;
use crate::models::TaskKind;

/// Body of `POST /api/task1/classify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub probability: f64,
    pub shop_prob: f64,
    pub not_shop_prob: f64,
    #[serde(default)]
    pub shop_names: Vec<String>,
}

impl ClassificationResult {
    /// Parse and validate a classify success body.
    pub fn from_body(body: &[u8]) -> Result<Self, ResponseError> {
        let result: Self = unwrap_envelope(body)?;
        result.validate()?;
        Ok(result)
    }

    pub fn is_shop(&self) -> bool {
        self.label == "shop"
    }

    fn validate(&self) -> Result<(), ResponseError> {
        if self.label.trim().is_empty() {
            return Err(ResponseError::Empty("label"));
        }
        check_unit("probability", self.probability)?;
        check_unit("shop_prob", self.shop_prob)?;
        check_unit("not_shop_prob", self.not_shop_prob)
    }
}

/// One indexed image returned by the search task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub rank: u32,
    pub similarity: f64,
    pub image: String,
}

/// Body of `POST /api/task2/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub exists: bool,
    pub best_similarity: f64,
    #[serde(default)]
    pub results: Vec<SearchMatch>,
    #[serde(default)]
    pub shop_names: Vec<String>,
}

impl SearchResult {
    /// Parse and validate a search success body.
    pub fn from_body(body: &[u8]) -> Result<Self, ResponseError> {
        let mut result: Self = unwrap_envelope(body)?;
        result.normalize()?;
        Ok(result)
    }

    /// Similarities are float32 cosines: an indexed query scores a hair above 1 and
    /// unrelated rows can dip below 0. Those are clamped into [0, 1].
    fn normalize(&mut self) -> Result<(), ResponseError> {
        self.best_similarity = clamp_similarity("best_similarity", self.best_similarity)?;
        for item in &mut self.results {
            item.similarity = clamp_similarity("results.similarity", item.similarity)?;
        }
        Ok(())
    }
}

/// Result of whichever task finished last.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum TaskResult {
    Classification(ClassificationResult),
    Search(SearchResult),
}

impl TaskResult {
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskResult::Classification(_) => TaskKind::Classify,
            TaskResult::Search(_) => TaskKind::Search,
        }
    }
}

/// The backend wraps every payload in `{ "data": ... }`; other envelope keys are ignored.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

fn unwrap_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T, ResponseError> {
    let envelope: Envelope<T> = serde_json::from_slice(body)?;
    Ok(envelope.data)
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ResponseError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ResponseError::OutOfRange { field, value })
    }
}

/// Slack allowed past the cosine range [-1, 1] before a value counts as malformed.
const SIMILARITY_TOLERANCE: f64 = 1e-3;

fn clamp_similarity(field: &'static str, value: f64) -> Result<f64, ResponseError> {
    let limit = 1.0 + SIMILARITY_TOLERANCE;
    if value.is_finite() && (-limit..=limit).contains(&value) {
        Ok(value.clamp(0.0, 1.0))
    } else {
        Err(ResponseError::OutOfRange { field, value })
    }
}
