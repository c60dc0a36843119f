/*!
 * End-to-end tests running prompts through the built-in stages
 */

use serde_json::json;
use std::sync::Arc;

use promptbridge::cache::ResultCache;
use promptbridge::errors::{PipelineError, ProviderError, StageError};
use promptbridge::pipeline::{
    IssueKind, OutputFormat, PipelineOrchestrator, PromptOptions, Severity, Stage, StageKind,
};
use promptbridge::providers::PassthroughTranslator;
use promptbridge::stages::{GrammarCorrector, LanguageDetector};
use promptbridge::validator::{PromptValidator, cache_key};

use crate::common::{FailingTranslator, TaggingTranslator, default_orchestrator, init_logging};

#[tokio::test]
async fn test_pipeline_detectorAndCorrector_shouldCapitalizePronoun() {
    init_logging();
    let orchestrator = PipelineOrchestrator::new(vec![
        Box::new(LanguageDetector::new()) as Box<dyn Stage>,
        Box::new(GrammarCorrector::new()),
    ]);

    let result = orchestrator
        .run("i am testing", None, None, PromptOptions::default())
        .await
        .unwrap();

    assert_eq!(result.validated_text, "I am testing");
    assert_eq!(result.original_text, "i am testing");
    assert_eq!(result.issues.len(), 1);

    let issue = &result.issues[0];
    assert_eq!(issue.kind, IssueKind::Grammar);
    assert_eq!((issue.position.start, issue.position.end), (0, 4));
    assert_eq!(issue.original, "i am");
    assert_eq!(issue.suggestion, "I am");
    assert_eq!(issue.severity, Severity::Low);

    assert_eq!(result.metrics.get("detected_language"), Some(&json!("en")));
    assert!(result.processing_time_ms().is_some());
}

#[tokio::test]
async fn test_pipeline_withFailingAdapter_shouldFailWithoutCaching() {
    init_logging();
    let cache = Arc::new(ResultCache::with_ttl_secs(10, 60).unwrap());
    let orchestrator = PipelineOrchestrator::with_default_stages(Arc::new(FailingTranslator));
    let validator = PromptValidator::new(orchestrator, cache.clone());

    let error = validator
        .run_pipeline("hello world", Some("en"), Some("ja"), PromptOptions::default())
        .await
        .unwrap_err();

    match &error {
        PipelineError::StageFailed { stage, source } => {
            assert_eq!(stage, "cultural_adapter");
            assert!(matches!(
                source,
                StageError::Provider(ProviderError::ApiError { status_code: 503, .. })
            ));
        }
        other => panic!("unexpected error: {}", other),
    }

    assert!(cache.is_empty());
    assert_eq!(cache.stats().hits, 0);
}

#[tokio::test]
async fn test_pipeline_fullRun_shouldCollectEveryStageOutput() {
    let translator = Arc::new(TaggingTranslator::default());
    let orchestrator = PipelineOrchestrator::with_default_stages(translator.clone());
    let options = PromptOptions::default().with_format(OutputFormat::Json);

    let result = orchestrator
        .run("i am  so stupid..", None, Some("fr"), options)
        .await
        .unwrap();

    assert_eq!(translator.calls(), 1);
    assert_eq!(result.issue_count(IssueKind::Grammar), 3);
    assert_eq!(result.issue_count(IssueKind::Toxicity), 1);

    // Grammar issues come before toxicity issues
    let kinds: Vec<IssueKind> = result.issues.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![IssueKind::Grammar, IssueKind::Grammar, IssueKind::Grammar, IssueKind::Toxicity]
    );

    let prompt: serde_json::Value = serde_json::from_str(&result.validated_text).unwrap();
    assert_eq!(prompt, json!({"prompt": "I am so stupid... [fr]"}));

    let suggestion_kinds: Vec<&str> = result.suggestions.iter().map(|s| s.kind.as_str()).collect();
    assert_eq!(suggestion_kinds, vec!["cultural", "optimization", "optimization"]);

    assert_eq!(result.metrics.get("grammar_issues"), Some(&json!(3)));
    assert_eq!(result.metrics.get("toxicity_issues"), Some(&json!(1)));
    assert_eq!(result.metrics.get("output_format"), Some(&json!("json")));
    assert_eq!(result.metrics.get("tone"), Some(&json!("neutral")));
}

#[tokio::test]
async fn test_pipeline_sameInput_shouldProduceSameResultApartFromTiming() {
    let orchestrator = default_orchestrator();

    let mut first = orchestrator
        .run("I hate  waiting", None, None, PromptOptions::default())
        .await
        .unwrap();
    let mut second = orchestrator
        .run("I hate  waiting", None, None, PromptOptions::default())
        .await
        .unwrap();

    first.metrics.remove("processing_time_ms");
    second.metrics.remove("processing_time_ms");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_pipeline_withProvidedSource_shouldSkipDetection() {
    let orchestrator = PipelineOrchestrator::from_kinds(
        &[StageKind::LanguageDetector, StageKind::CulturalAdapter],
        Arc::new(TaggingTranslator::default()),
    );

    let result = orchestrator
        .run("Bonjour à tous", Some("fre"), Some("fr"), PromptOptions::default())
        .await
        .unwrap();

    assert!(result.metrics.get("detected_language").is_none());
    assert_eq!(result.validated_text, "Bonjour à tous");
    assert!(result.suggestions.is_empty());
}

#[tokio::test]
async fn test_validator_concurrentRequests_shouldShareCache() {
    init_logging();
    let cache = Arc::new(ResultCache::with_ttl_secs(100, 60).unwrap());
    let validator = Arc::new(PromptValidator::new(
        PipelineOrchestrator::with_default_stages(Arc::new(PassthroughTranslator)),
        cache.clone(),
    ));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let validator = Arc::clone(&validator);
            tokio::spawn(async move {
                let text = format!("prompt number {}", i % 4);
                validator
                    .run_pipeline(&text, None, None, PromptOptions::default())
                    .await
            })
        })
        .collect();

    for handle in futures::future::join_all(handles).await {
        let result = handle.unwrap().unwrap();
        assert!(result.validated_text.starts_with("prompt number"));
    }

    assert_eq!(cache.len(), 4);
    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 16);
    assert!(cache.get(&cache_key("prompt number 0", None)).is_some());
}

#[tokio::test]
async fn test_validator_serializedResult_shouldRoundTrip() {
    let validator = PromptValidator::without_cache(default_orchestrator());

    let result = validator
        .run_pipeline("you idiot, i've said it", None, None, PromptOptions::default())
        .await
        .unwrap();

    let json = serde_json::to_string(&result).unwrap();
    let parsed: promptbridge::ValidationResult = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, result);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for field in ["original_text", "validated_text", "issues", "metrics", "suggestions"] {
        assert!(value.get(field).is_some(), "missing field {}", field);
    }
}
