use std::sync::Arc;

use nh_core::ports::SummaryGeneratorPort;
use nh_core::Report;
use tracing::warn;

pub const NO_REPORTS_MESSAGE: &str = "There are no reports to analyze.";
pub const EMPTY_RESULT_MESSAGE: &str = "The analysis finished without a result.";
pub const UNAVAILABLE_MESSAGE: &str =
    "AI analysis is temporarily unavailable. Check that the AI API key is configured.";

/// Asks the AI endpoint for a manager-facing summary of operator reports.
///
/// Never fails: every problem maps to one of the fixed messages above.
pub struct AnalyzeReports {
    summary: Option<Arc<dyn SummaryGeneratorPort>>,
    language: String,
}

impl AnalyzeReports {
    pub fn new(summary: Option<Arc<dyn SummaryGeneratorPort>>, language: impl Into<String>) -> Self {
        Self {
            summary,
            language: language.into(),
        }
    }

    #[tracing::instrument(name = "usecase.analyze_reports.execute", skip(self, reports), fields(count = reports.len()))]
    pub async fn execute(&self, reports: &[Report]) -> String {
        if reports.is_empty() {
            return NO_REPORTS_MESSAGE.to_string();
        }
        let Some(summary) = self.summary.as_ref() else {
            warn!("no AI summary client configured");
            return UNAVAILABLE_MESSAGE.to_string();
        };

        let instruction = format!(
            "You are a professional business analyst. Analyze the data in depth and write only the most important points in {}.",
            self.language
        );
        let prompt = format!(
            "Analyze the following operator reports and give a professional summary in {}. \
             Identify problems and give recommendations to the manager:\n\n{}",
            self.language,
            report_lines(reports)
        );

        match summary.generate(&instruction, &prompt).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_RESULT_MESSAGE.to_string(),
            Err(err) => {
                warn!(error = %err, "AI summary request failed");
                UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }
}

/// One `Operator: …, Status: …, Note: …` line per report.
pub fn report_lines(reports: &[Report]) -> String {
    reports
        .iter()
        .map(|r| {
            format!(
                "Operator: {}, Status: {}, Note: {}",
                r.operator_name, r.visit_status, r.tasks_completed
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
