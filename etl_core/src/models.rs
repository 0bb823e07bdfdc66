use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three data sources, in the order the pipeline visits them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Advice,
    Activity,
    DogImage,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Advice, SourceKind::Activity, SourceKind::DogImage];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Advice => "advice",
            SourceKind::Activity => "activity",
            SourceKind::DogImage => "dog_image",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Raw payloads (as returned by the extractors)
// ---------------------------------------------------------------------------

/// Inner `slip` object of the advice API response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdviceSlip {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub advice: Option<String>,
}

/// One element of the quote API response list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteEntry {
    /// Quote text.
    #[serde(default)]
    pub q: Option<String>,
    /// Attribution.
    #[serde(default)]
    pub a: Option<String>,
}

/// Activity payload as served by the Bored API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoredActivity {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub participants: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub accessibility: Option<f64>,
}

/// Raw input for the activity table. Which variant arrives depends on the
/// configured activity source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawActivity {
    Quotes(Vec<QuoteEntry>),
    Bored(BoredActivity),
}

/// Dog image URL, only produced once the API reported success.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DogImage {
    #[serde(default)]
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceRecord {
    pub advice_id: i64,
    pub advice_text: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    pub activity_key: i64,
    pub activity: String,
    /// Free-form label, stored in the `type` column.
    pub activity_type: String,
    pub participants: i32,
    pub price: f64,
    pub accessibility: f64,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DogImageRecord {
    pub breed: String,
    pub image_url: String,
    pub fetched_at: DateTime<Utc>,
}
