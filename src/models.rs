use chrono::{DateTime, FixedOffset};
use serde::{self, Deserialize, Deserializer, Serialize};

/// One synthesized point of the performance chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input_size: u32,
    pub execution_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownStep {
    pub operation: String,
    pub description: String,
    pub complexity: String,
}

/// Complexity verdict returned by the analysis endpoint, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityReport {
    pub time_complexity: String,
    pub space_complexity: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub breakdown: Vec<BreakdownStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub code: String,
    pub language: String,
    pub problem: String,
}

/// Error payload the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    #[serde(rename = "retryAfter")]
    pub retry_after: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "from_rfc3339")]
    pub start_time: DateTime<FixedOffset>,
    #[serde(deserialize_with = "from_rfc3339")]
    pub end_time: DateTime<FixedOffset>,
    #[serde(default)]
    pub problem_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    pub is_sample: bool,
}

/// Payload of the problem-creation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDraft {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub constraints: String,
    pub time_limit_ms: u32,
    pub memory_limit_mb: u32,
    pub test_cases: Vec<TestCase>,
}

impl Default for ProblemDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            difficulty: Difficulty::Easy,
            tags: Vec::new(),
            constraints: String::new(),
            time_limit_ms: 1000,
            memory_limit_mb: 256,
            test_cases: vec![TestCase {
                is_sample: true,
                ..TestCase::default()
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

fn from_rfc3339<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(s.trim()).map_err(serde::de::Error::custom)
}

pub trait HasId {
    fn id(&self) -> &str;
}

impl HasId for ContestSummary {
    fn id(&self) -> &str {
        &self.id
    }
}
