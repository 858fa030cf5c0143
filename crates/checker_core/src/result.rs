use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

/// Message shown when a failed response carries no usable `detail`.
pub const GENERIC_SERVER_ERROR: &str = "Unexpected server error.";

/// Display class of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Unsafe,
    Error,
}

impl Verdict {
    /// Any status other than the two recognized ones lands in `Unsafe`.
    pub fn from_status(status: &str) -> Self {
        match status {
            "Safe" => Verdict::Safe,
            "Error" => Verdict::Error,
            _ => Verdict::Unsafe,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Verdict::Safe => "safe",
            Verdict::Unsafe => "unsafe",
            Verdict::Error => "error",
        }
    }
}

/// The classification endpoint's verdict for one submitted image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassificationResult {
    pub status: String,
    pub reason: String,
    pub confidence: f64,
    #[serde(default, deserialize_with = "deserialize_categories")]
    pub categories: BTreeSet<String>,
    #[serde(default, deserialize_with = "deserialize_scores")]
    pub category_scores: BTreeMap<String, f64>,
}

impl ClassificationResult {
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_status(&self.status)
    }

    /// Confidence as a percentage with one decimal place, e.g. `87.3%`.
    pub fn confidence_label(&self) -> String {
        format_confidence(self.confidence)
    }

    /// Pretty-printed `categories` and `category_scores` for inspection.
    pub fn details_json(&self) -> String {
        #[derive(Serialize)]
        struct Details<'a> {
            categories: &'a BTreeSet<String>,
            category_scores: &'a BTreeMap<String, f64>,
        }

        let details = Details {
            categories: &self.categories,
            category_scores: &self.category_scores,
        };
        // Serializing string sets and finite-or-null floats cannot fail.
        serde_json::to_string_pretty(&details).unwrap_or_default()
    }
}

/// Percentage with one decimal place. Ties round away from zero, so `0.1225`
/// reads `12.3%`.
pub fn format_confidence(confidence: f64) -> String {
    let tenths = (confidence * 100.0 * 10.0).round() / 10.0;
    format!("{tenths:.1}%")
}

/// Message for a non-success response: the body's `detail` string when present,
/// otherwise the generic message. Bodies that are not JSON count as `{}`.
pub fn server_error_message(body: &[u8]) -> String {
    #[derive(Deserialize, Default)]
    struct ErrorBody {
        #[serde(default)]
        detail: Option<serde_json::Value>,
    }

    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    match parsed.detail {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail,
        _ => GENERIC_SERVER_ERROR.to_string(),
    }
}

/// Accepts either `["label", ...]` or `{"label": bool, ...}`; the object form
/// keeps only the labels flagged `true`. `null` in place of the field or of a
/// flag counts as not flagged.
fn deserialize_categories<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Categories {
        Labels(Vec<String>),
        Flags(BTreeMap<String, Option<bool>>),
    }

    Ok(match Option::<Categories>::deserialize(deserializer)? {
        None => BTreeSet::new(),
        Some(Categories::Labels(labels)) => labels.into_iter().collect(),
        Some(Categories::Flags(flags)) => flags
            .into_iter()
            .filter_map(|(label, flagged)| (flagged == Some(true)).then_some(label))
            .collect(),
    })
}

/// Scores keyed by label; `null` scores, or a `null` map, are dropped.
fn deserialize_scores<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let scores = Option::<BTreeMap<String, Option<f64>>>::deserialize(deserializer)?;
    Ok(scores
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(label, score)| score.map(|score| (label, score)))
        .collect())
}
