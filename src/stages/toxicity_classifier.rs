use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::StageError;
use crate::pipeline::{Issue, IssueKind, Position, ProcessingContext, Severity, Stage};

/// Flagged word patterns and the category each one reports
static TOXIC_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)\bstupid\b").unwrap(), "inappropriate"),
        (Regex::new(r"(?i)\bidiot\b").unwrap(), "inappropriate"),
        (Regex::new(r"(?i)\bfool\b").unwrap(), "inappropriate"),
        (Regex::new(r"(?i)\bhate\b").unwrap(), "negative"),
    ]
});

/// Flags hostile wording. The text itself is left alone.
#[derive(Debug, Default)]
pub struct ToxicityClassifier;

impl ToxicityClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Find every flagged word in `text`, grouped by pattern
    pub fn classify(text: &str) -> Vec<Issue> {
        TOXIC_PATTERNS
            .iter()
            .flat_map(|(pattern, category)| {
                pattern.find_iter(text).map(move |m| {
                    Issue::new(
                        IssueKind::Toxicity,
                        Position::from_match(&m),
                        m.as_str(),
                        format!("Consider using more neutral language instead of '{}'", m.as_str()),
                        Severity::Medium,
                    )
                    .with_category(*category)
                })
            })
            .collect()
    }
}

#[async_trait]
impl Stage for ToxicityClassifier {
    async fn process(&self, mut context: ProcessingContext) -> Result<ProcessingContext, StageError> {
        let issues = Self::classify(&context.current_text);

        if issues.is_empty() {
            debug!("No toxic content found");
        } else {
            warn!("Found {} potentially toxic word(s)", issues.len());
        }

        context.set_metric("toxicity_issues", issues.len());
        context.extend_issues(issues);

        Ok(context)
    }

    fn name(&self) -> &str {
        "toxicity_classifier"
    }
}
