/*!
 * Data model threaded through the validation pipeline.
 *
 * A `ProcessingContext` is created fresh for every run, handed from stage to
 * stage by value and finally turned into a `ValidationResult`.
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Metric key owned by the orchestrator; stages must never write it.
pub const PROCESSING_TIME_METRIC: &str = "processing_time_ms";

/// Kind of problem an issue reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// Spelling, capitalization, spacing and punctuation
    Grammar,
    /// Offensive or hostile wording
    Toxicity,
    /// Culturally sensitive wording
    Cultural,
}

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Byte span of an issue within the text version it was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

impl Position {
    /// Create a span; `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "issue span start {} > end {}", start, end);
        Self { start, end }
    }

    /// Span from a regex match.
    pub fn from_match(m: &regex::Match<'_>) -> Self {
        Self::new(m.start(), m.end())
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A single problem found in the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub position: Position,
    pub original: String,
    pub suggestion: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Issue {
    /// Create an issue without a category.
    pub fn new(
        kind: IssueKind,
        position: Position,
        original: impl Into<String>,
        suggestion: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            kind,
            position,
            original: original.into(),
            suggestion: suggestion.into(),
            severity,
            category: None,
        }
    }

    /// Attach a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A free-form improvement hint.
///
/// Only `type` is fixed; every other field depends on the suggestion type and
/// is flattened next to it on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Suggestion {
    /// Create an empty suggestion of the given type.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Map::new(),
        }
    }

    /// Add or replace a payload field. A `type` field is ignored.
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        if name != "type" {
            self.fields.insert(name.to_string(), value.into());
        }
        self
    }

    /// Look up a payload field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// A cultural adaptation suggestion.
    pub fn cultural(original: &str, adapted: &str, language: &str) -> Self {
        Self::new("cultural")
            .with_field("original", original)
            .with_field("adapted", adapted)
            .with_field("language", language)
            .with_field(
                "explanation",
                format!("Adapted for {} cultural context", language),
            )
    }

    /// A prompt optimization hint with a confidence score.
    pub fn optimization(suggestion: &str, confidence: f64) -> Self {
        Self::new("optimization")
            .with_field("suggestion", suggestion)
            .with_field("confidence", confidence)
    }
}

/// Output format requested for the optimized prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plaintext,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plaintext => "plaintext",
            Self::Json => "json",
            Self::Markdown => "markdown",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "plaintext" | "text" => Ok(Self::Plaintext),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(anyhow::anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Caller-supplied options. The orchestrator passes them through untouched;
/// only stages interpret them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptOptions {
    /// Desired tone, e.g. "neutral" or "formal"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,

    /// Desired output format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    /// Keys no built-in stage recognizes, kept for custom stages
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PromptOptions {
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// The mutable record threaded through all stages during one run.
///
/// `original_text` is fixed at construction. Issues and suggestions can only
/// be appended to.
#[derive(Debug, Clone)]
pub struct ProcessingContext {
    original_text: String,
    pub current_text: String,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub options: PromptOptions,
    issues: Vec<Issue>,
    suggestions: Vec<Suggestion>,
    metrics: BTreeMap<String, Value>,
}

impl ProcessingContext {
    /// Seed a fresh context for one run.
    pub fn new(
        text: &str,
        source_language: Option<&str>,
        target_language: Option<&str>,
        options: PromptOptions,
    ) -> Self {
        Self {
            original_text: text.to_string(),
            current_text: text.to_string(),
            source_language: source_language.map(str::to_string),
            target_language: target_language.map(str::to_string),
            options,
            issues: Vec::new(),
            suggestions: Vec::new(),
            metrics: BTreeMap::new(),
        }
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn metrics(&self) -> &BTreeMap<String, Value> {
        &self.metrics
    }

    pub fn push_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend_issues(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    pub fn push_suggestion(&mut self, suggestion: Suggestion) {
        self.suggestions.push(suggestion);
    }

    pub fn extend_suggestions(&mut self, suggestions: impl IntoIterator<Item = Suggestion>) {
        self.suggestions.extend(suggestions);
    }

    /// Add or overwrite a metric.
    pub fn set_metric(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.metrics.insert(name.into(), value.into());
    }

    pub fn metric(&self, name: &str) -> Option<&Value> {
        self.metrics.get(name)
    }

    /// Consume the context into the final result.
    pub fn into_result(self) -> ValidationResult {
        ValidationResult {
            original_text: self.original_text,
            validated_text: self.current_text,
            issues: self.issues,
            metrics: self.metrics,
            suggestions: self.suggestions,
        }
    }
}

/// Final structured output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub original_text: String,
    pub validated_text: String,
    pub issues: Vec<Issue>,
    pub metrics: BTreeMap<String, Value>,
    pub suggestions: Vec<Suggestion>,
}

impl ValidationResult {
    /// Elapsed pipeline time, when recorded
    pub fn processing_time_ms(&self) -> Option<f64> {
        self.metrics.get(PROCESSING_TIME_METRIC).and_then(Value::as_f64)
    }

    /// Number of issues with the given kind
    pub fn issue_count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    /// Whether the prompt came through without any issue
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
