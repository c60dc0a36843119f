use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::errors::StageError;
use crate::pipeline::{Issue, IssueKind, Position, ProcessingContext, Severity, Stage};

/// Correction rules, applied in order: (pattern, replacement)
static CORRECTION_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        // Lowercase first person pronoun
        (Regex::new(r"(?i)\bi am\b").unwrap(), "I am"),
        (Regex::new(r"(?i)\bi've\b").unwrap(), "I've"),
        // Runs of whitespace
        (Regex::new(r"\s{2,}").unwrap(), " "),
        // Ellipses of any length
        (Regex::new(r"\.{2,}").unwrap(), "..."),
    ]
});

/// Fixes a handful of common mistakes and reports each one as a grammar issue.
///
/// Issue positions refer to the text this stage received; the rewritten text
/// is handed on to the next stage.
#[derive(Debug, Default)]
pub struct GrammarCorrector;

impl GrammarCorrector {
    pub fn new() -> Self {
        Self
    }

    /// Compute the corrected text and the issues found in `text`
    pub fn correct(text: &str) -> (String, Vec<Issue>) {
        let mut issues = Vec::new();
        let mut corrected = text.to_string();

        for (pattern, replacement) in CORRECTION_RULES.iter() {
            for m in pattern.find_iter(text) {
                if m.as_str() != *replacement {
                    issues.push(Issue::new(
                        IssueKind::Grammar,
                        Position::from_match(&m),
                        m.as_str(),
                        *replacement,
                        Severity::Low,
                    ));
                }
            }

            corrected = pattern.replace_all(&corrected, NoExpand(replacement)).into_owned();
        }

        (corrected, issues)
    }
}

#[async_trait]
impl Stage for GrammarCorrector {
    async fn process(&self, mut context: ProcessingContext) -> Result<ProcessingContext, StageError> {
        let (corrected, issues) = Self::correct(&context.current_text);

        debug!("Grammar corrector found {} issue(s)", issues.len());

        context.set_metric("grammar_issues", issues.len());
        context.current_text = corrected;
        context.extend_issues(issues);

        Ok(context)
    }

    fn name(&self) -> &str {
        "grammar_corrector"
    }
}
