use std::fmt;

use boardbrief_core::models::{ComparisonReport, ModelResult};

const WIDTH: usize = 80;

/// Human-readable side-by-side rendering of a [`ComparisonReport`].
pub struct ReportView<'a>(pub &'a ComparisonReport);

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let heavy = "=".repeat(WIDTH);
        let light = "-".repeat(WIDTH);

        writeln!(f, "{heavy}")?;
        writeln!(f, "BOARD GAME SUMMARIZER - MODEL COMPARISON RESULTS")?;
        writeln!(f, "{heavy}")?;
        writeln!(f)?;
        writeln!(f, "Text extracted: {} characters", report.text_length)?;
        writeln!(f, "Models compared: {}", report.models_compared)?;

        for (i, result) in report.results.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "{light}")?;
            writeln!(f, "MODEL {}: {}", i + 1, result.model_id())?;
            writeln!(f, "{light}")?;
            writeln!(f)?;

            match result {
                ModelResult::Success {
                    summary, metrics, ..
                } => {
                    writeln!(f, "Summary:")?;
                    writeln!(f, "{summary}")?;
                    writeln!(f)?;
                    writeln!(f, "Metrics:")?;
                    writeln!(f, "  - Latency: {:.2} seconds", metrics.latency_seconds)?;
                    writeln!(f, "  - Input tokens: {}", metrics.input_tokens)?;
                    writeln!(f, "  - Output tokens: {}", metrics.output_tokens)?;
                    writeln!(f, "  - Output length: {} characters", metrics.output_length)?;
                }
                ModelResult::Failure {
                    error,
                    latency_seconds,
                    ..
                } => {
                    writeln!(f, "ERROR: {error}")?;
                    writeln!(f, "Latency: {latency_seconds:.2} seconds")?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "{heavy}")?;
        writeln!(f, "{}", outcome_line(report))
    }
}

/// Final verdict line; an all-failed run reads differently from a partial one.
fn outcome_line(report: &ComparisonReport) -> String {
    if report.results.is_empty() {
        "Document processed, but no models are configured.".to_string()
    } else if report.all_failed() {
        format!(
            "Document processed, but all {} models failed.",
            report.results.len()
        )
    } else {
        format!(
            "{} of {} models succeeded.",
            report.succeeded(),
            report.results.len()
        )
    }
}
