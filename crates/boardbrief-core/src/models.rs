use serde::{Deserialize, Serialize};

/// Raw HTML as fetched from a game page.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub url: String,
    pub html: String,
}

impl SourceDocument {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Plain text pulled out of a [`SourceDocument`], ready to be prompted with.
///
/// `char_count` counts Unicode scalar values, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    text: String,
    char_count: usize,
}

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_count = text.chars().count();
        Self { text, char_count }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// One call to the inference backend.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub model_id: &'a str,
    pub prompt: &'a str,
    pub params: GenerationParams,
}

/// What the backend produced for a single request.
///
/// Token counts are whatever the backend reported; absent counts are zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Generation {
    pub text: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Metrics recorded for a successful model call.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMetrics {
    pub latency_seconds: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub output_length: usize,
}

/// Outcome of one model call: a summary with metrics, or a failure marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ModelResultWire", from = "ModelResultWire")]
pub enum ModelResult {
    Success {
        model_id: String,
        summary: String,
        metrics: ModelMetrics,
    },
    Failure {
        model_id: String,
        error: String,
        latency_seconds: f64,
    },
}

impl ModelResult {
    /// Build a success entry from a backend generation.
    ///
    /// The summary is trimmed; `output_length` counts characters of the
    /// untrimmed generation, as the backend returned it.
    pub fn success(model_id: impl Into<String>, generation: Generation, latency_seconds: f64) -> Self {
        Self::Success {
            model_id: model_id.into(),
            summary: generation.text.trim().to_string(),
            metrics: ModelMetrics {
                latency_seconds: round_latency(latency_seconds),
                input_tokens: generation.input_tokens,
                output_tokens: generation.output_tokens,
                output_length: generation.text.chars().count(),
            },
        }
    }

    pub fn failure(
        model_id: impl Into<String>,
        error: impl Into<String>,
        latency_seconds: f64,
    ) -> Self {
        Self::Failure {
            model_id: model_id.into(),
            error: error.into(),
            latency_seconds: round_latency(latency_seconds),
        }
    }

    pub fn model_id(&self) -> &str {
        match self {
            Self::Success { model_id, .. } | Self::Failure { model_id, .. } => model_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn latency_seconds(&self) -> f64 {
        match self {
            Self::Success { metrics, .. } => metrics.latency_seconds,
            Self::Failure {
                latency_seconds, ..
            } => *latency_seconds,
        }
    }
}

fn round_latency(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

/// Final artifact of a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Character count of the extracted text that was summarized.
    pub text_length: usize,
    /// Number of models attempted.
    pub models_compared: usize,
    /// One entry per configured model, in configured order.
    pub results: Vec<ModelResult>,
}

impl ComparisonReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// True when models were attempted and none of them produced a summary.
    pub fn all_failed(&self) -> bool {
        !self.results.is_empty() && self.succeeded() == 0
    }
}

// ---- Wire representation ----

#[derive(Clone, Serialize, Deserialize)]
struct ModelResultWire {
    model_id: String,
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default)]
    metrics: MetricsWire,
}

#[derive(Clone, Default, Serialize, Deserialize)]
struct MetricsWire {
    #[serde(default)]
    latency_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    output_length: Option<usize>,
}

impl From<ModelResult> for ModelResultWire {
    fn from(result: ModelResult) -> Self {
        match result {
            ModelResult::Success {
                model_id,
                summary,
                metrics,
            } => Self {
                model_id,
                success: true,
                summary: Some(summary),
                error: None,
                metrics: MetricsWire {
                    latency_seconds: metrics.latency_seconds,
                    input_tokens: Some(metrics.input_tokens),
                    output_tokens: Some(metrics.output_tokens),
                    output_length: Some(metrics.output_length),
                },
            },
            ModelResult::Failure {
                model_id,
                error,
                latency_seconds,
            } => Self {
                model_id,
                success: false,
                summary: None,
                error: Some(error),
                metrics: MetricsWire {
                    latency_seconds,
                    ..MetricsWire::default()
                },
            },
        }
    }
}

impl From<ModelResultWire> for ModelResult {
    fn from(wire: ModelResultWire) -> Self {
        if wire.success {
            ModelResult::Success {
                model_id: wire.model_id,
                summary: wire.summary.unwrap_or_default(),
                metrics: ModelMetrics {
                    latency_seconds: wire.metrics.latency_seconds,
                    input_tokens: wire.metrics.input_tokens.unwrap_or(0),
                    output_tokens: wire.metrics.output_tokens.unwrap_or(0),
                    output_length: wire.metrics.output_length.unwrap_or(0),
                },
            }
        } else {
            ModelResult::Failure {
                model_id: wire.model_id,
                error: wire.error.unwrap_or_else(|| "Unknown error".to_string()),
                latency_seconds: wire.metrics.latency_seconds,
            }
        }
    }
}
