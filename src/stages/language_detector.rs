/*!
 * Source language detection.
 *
 * Detection is heuristic: the dominant non-Latin script decides first, then
 * Latin-script text is assigned by stop-word voting. Anything undecided is
 * reported as English.
 */

use async_trait::async_trait;
use log::{info, warn};

use crate::errors::StageError;
use crate::language_utils;
use crate::pipeline::{ProcessingContext, Stage};

/// Language reported when nothing more specific is found
pub const DEFAULT_LANGUAGE: &str = "en";

const STOP_WORDS: &[(&str, &[&str])] = &[
    ("en", &["the", "and", "is", "are", "you", "i", "to", "of", "what", "how", "please", "with", "this", "that", "for"]),
    ("es", &["el", "los", "las", "que", "y", "por", "con", "una", "cómo", "qué", "necesito", "quiero", "pero", "hacer", "sobre"]),
    ("fr", &["le", "les", "des", "est", "et", "pour", "avec", "je", "vous", "ce", "qui", "pas", "c'est", "sur", "dans"]),
    ("de", &["der", "die", "das", "und", "ist", "nicht", "ich", "ein", "eine", "mit", "für", "wie", "sie", "auf", "zu"]),
    ("pt", &["não", "você", "é", "os", "do", "da", "em", "uma", "com", "isso", "está", "como", "mas", "meu", "seu"]),
    ("it", &["il", "gli", "della", "che", "è", "per", "non", "sono", "questo", "come", "anche", "perché", "ma", "mi", "io"]),
];

/// Fills in `source_language` when the caller did not provide one
#[derive(Debug, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Guess the ISO 639-1 code of `text`
    pub fn detect(text: &str) -> &'static str {
        detect_by_script(text)
            .or_else(|| detect_by_stop_words(text))
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

#[async_trait]
impl Stage for LanguageDetector {
    async fn process(&self, mut context: ProcessingContext) -> Result<ProcessingContext, StageError> {
        let provided = context
            .source_language
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string);

        if let Some(code) = provided {
            match language_utils::normalize_to_part1_or_part2t(&code) {
                Ok(normalized) => {
                    info!("Using provided source language: {}", normalized);
                    context.source_language = Some(normalized);
                }
                Err(_) => {
                    warn!("Provided source language '{}' is not an ISO code, keeping it as is", code);
                    context.source_language = Some(code);
                }
            }
            return Ok(context);
        }

        let detected = Self::detect(&context.current_text);
        info!("Detected language: {}", detected);

        context.source_language = Some(detected.to_string());
        context.set_metric("detected_language", detected);

        Ok(context)
    }

    fn name(&self) -> &str {
        "language_detector"
    }
}

/// Language whose script a character belongs to, for scripts that identify one
fn script_language(c: char) -> Option<&'static str> {
    match c as u32 {
        0x0400..=0x04FF => Some("ru"),
        0x0590..=0x05FF => Some("he"),
        0x0600..=0x06FF | 0x0750..=0x077F => Some("ar"),
        0x0370..=0x03FF => Some("el"),
        0x0900..=0x097F => Some("hi"),
        0x0E00..=0x0E7F => Some("th"),
        0x1100..=0x11FF | 0xAC00..=0xD7AF => Some("ko"),
        0x3040..=0x30FF => Some("ja"),
        0x4E00..=0x9FFF => Some("zh"),
        _ => None,
    }
}

fn detect_by_script(text: &str) -> Option<&'static str> {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    let mut latin = 0usize;

    for c in text.chars().filter(|c| c.is_alphabetic()) {
        match script_language(c) {
            Some(lang) => match counts.iter_mut().find(|(l, _)| *l == lang) {
                Some((_, n)) => *n += 1,
                None => counts.push((lang, 1)),
            },
            None => latin += 1,
        }
    }

    let non_latin: usize = counts.iter().map(|(_, n)| n).sum();
    if non_latin == 0 || non_latin < latin {
        return None;
    }

    // Japanese mixes kana with Han characters
    if counts.iter().any(|(lang, _)| *lang == "ja") {
        return Some("ja");
    }

    counts
        .into_iter()
        .max_by_key(|(_, n)| *n)
        .map(|(lang, _)| lang)
}

fn detect_by_stop_words(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphabetic() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect();

    let scores: Vec<(&'static str, usize)> = STOP_WORDS
        .iter()
        .map(|(lang, list)| (*lang, words.iter().filter(|w| list.contains(*w)).count()))
        .collect();

    let best = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
    if best == 0 {
        return None;
    }

    let mut leaders = scores.iter().filter(|(_, s)| *s == best);
    match (leaders.next(), leaders.next()) {
        (Some((lang, _)), None) => Some(*lang),
        _ => None,
    }
}
