//! # Transcript Analyzer
//!
//! Drives a single transcript through the LLM extraction call and turns the
//! free-form reply into a well-formed [`AnalysisResult`]. The model's output
//! is untrusted input: the reply is scanned for the first balanced JSON
//! object, loosely-typed fields are coerced with defaults, topics outside the
//! closed vocabulary are dropped, and a claimed guest match is only honored
//! when it names a real guest.
//!
//! Throttling-shaped provider failures (429 / rate / overloaded / 529 in the
//! error text) are retried with exponential backoff up to a fixed cap. Any
//! other failure, including an unparsable reply, propagates immediately.

use crate::{
    constants::{
        DEFAULT_DURATION, DEFAULT_INITIAL_BACKOFF_MS, DEFAULT_MAX_RETRIES, DEFAULT_TITLE, TOPICS,
    },
    errors::AnalysisError,
    matcher::validate_guest_match,
    prompts::{analysis_system_prompt, format_analysis_prompt},
    providers::ai::AiProvider,
    types::{AnalysisResult, Confidence, Guest},
};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry behavior for throttled provider calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_millis(DEFAULT_INITIAL_BACKOFF_MS),
        }
    }
}

/// The outcome of one successful analysis call.
#[derive(Debug, Clone)]
pub struct Analyzed {
    pub analysis: AnalysisResult,
    pub matched_guest_id: Option<String>,
}

/// Analyzes transcripts through an AI provider.
#[derive(Debug, Clone)]
pub struct Analyzer {
    provider: Box<dyn AiProvider>,
    retry: RetryPolicy,
}

impl Analyzer {
    pub fn new(provider: Box<dyn AiProvider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Runs the extraction call for one transcript and validates the result.
    ///
    /// Guest-match validation is independent of the field coercions: a
    /// hallucinated id is rejected even when every other field looks fine.
    pub async fn analyze(
        &self,
        file_name: &str,
        content: &str,
        guests: &[Guest],
    ) -> Result<Analyzed, AnalysisError> {
        let system_prompt = analysis_system_prompt();
        let user_prompt = format_analysis_prompt(file_name, content, guests);

        let reply = self.complete_with_retry(&system_prompt, &user_prompt).await?;
        debug!(file = %file_name, reply_len = reply.len(), "Received analysis reply");

        let raw_object =
            extract_json_object(&reply).ok_or(AnalysisError::UnparsableResponse)?;
        let value: Value =
            serde_json::from_str(raw_object).map_err(|_| AnalysisError::UnparsableResponse)?;

        let matched_guest_id =
            validate_guest_match(value.get("matchedGuestId").and_then(Value::as_str), guests);
        let analysis = coerce_analysis(&value, file_name);

        Ok(Analyzed {
            analysis,
            matched_guest_id,
        })
    }

    async fn complete_with_retry(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AnalysisError> {
        let mut delay = self.retry.initial_backoff;
        let mut last_error = String::new();

        for attempt in 0..=self.retry.max_retries {
            if attempt > 0 {
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "AI provider throttled, backing off: {last_error}"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }

            match self.provider.complete(system_prompt, user_prompt).await {
                Ok(text) => return Ok(text),
                Err(err) => {
                    let message = err.to_string();
                    if !is_transient_error(&message) {
                        return Err(err.into());
                    }
                    last_error = message;
                }
            }
        }

        Err(AnalysisError::RetriesExhausted {
            attempts: self.retry.max_retries + 1,
            last_error,
        })
    }
}

/// Classifies a provider error message as throttling-shaped.
///
/// Matching on message text is fragile, but the provider surfaces throttling
/// through these signatures and does not expose a structured status here.
pub fn is_transient_error(message: &str) -> bool {
    let lowered = message.to_lowercase();
    ["429", "rate", "overloaded", "529"]
        .iter()
        .any(|signature| lowered.contains(signature))
}

/// Extracts the first balanced `{...}` object from free-form reply text.
///
/// The scan is aware of JSON string literals and escapes, so braces inside
/// strings don't unbalance it.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

static EPISODE_NUMBER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)ep[\s_-]?(\d+)",
        r"(?i)episode[\s_-]?(\d+)",
        r"^(\d+)\.",
        r"[\s_-](\d+)\.",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("episode number pattern is valid"))
    .collect()
});

/// Derives an episode number from a filename, e.g. "ep-123.txt",
/// "episode_45.txt", "Ep 7.txt", or "12.txt". Used as a fallback when the
/// model can't determine one, and as the duplicate key before spending an
/// LLM call.
pub fn parse_episode_number(file_name: &str) -> Option<u32> {
    EPISODE_NUMBER_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(file_name)
            .and_then(|captures| captures.get(1))
            .and_then(|digits| digits.as_str().parse().ok())
    })
}

/// Builds a well-formed [`AnalysisResult`] from the model's loosely-typed
/// JSON, applying the field defaults and dropping topics outside the closed
/// vocabulary.
pub fn coerce_analysis(value: &Value, file_name: &str) -> AnalysisResult {
    let episode_number = value
        .get("episodeNumber")
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .or_else(|| parse_episode_number(file_name));

    let topics = value
        .get("topics")
        .and_then(Value::as_array)
        .map(|raw| {
            raw.iter()
                .filter_map(Value::as_str)
                .filter_map(canonical_topic)
                .collect()
        })
        .unwrap_or_default();

    let warnings = value
        .get("warnings")
        .and_then(Value::as_array)
        .map(|raw| {
            raw.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let confidence = value
        .get("confidence")
        .and_then(Value::as_str)
        .map(|raw| match raw {
            "high" => Confidence::High,
            "low" => Confidence::Low,
            _ => Confidence::Medium,
        })
        .unwrap_or_default();

    AnalysisResult {
        episode_number,
        title: non_empty_str(value, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: non_empty_str(value, "description").unwrap_or_default(),
        featured_quote: non_empty_str(value, "featuredQuote").unwrap_or_default(),
        quote_timestamp: non_empty_str(value, "quoteTimestamp"),
        topics,
        estimated_duration: non_empty_str(value, "estimatedDuration")
            .unwrap_or_else(|| DEFAULT_DURATION.to_string()),
        guest_name: non_empty_str(value, "guestName"),
        guest_title: non_empty_str(value, "guestTitle"),
        guest_company: non_empty_str(value, "guestCompany"),
        confidence,
        warnings,
    }
}

/// Maps a raw topic value onto the canonical vocabulary entry, or drops it.
fn canonical_topic(raw: &str) -> Option<String> {
    TOPICS
        .iter()
        .find(|topic| topic.eq_ignore_ascii_case(raw.trim()))
        .map(|topic| topic.to_string())
}

fn non_empty_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// A scripted provider that replays canned responses and records calls.
    #[derive(Debug, Clone, Default)]
    pub struct ScriptedProvider {
        responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
        pub calls: Arc<Mutex<u32>>,
    }

    impl ScriptedProvider {
        pub fn new(responses: Vec<Result<String, String>>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(responses.into())),
                calls: Arc::new(Mutex::new(0)),
            }
        }

        pub fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl AiProvider for ScriptedProvider {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
            *self.calls.lock().unwrap() += 1;
            match self.responses.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(message)) => Err(ProviderError::AiApi(message)),
                None => panic!("scripted provider ran out of responses"),
            }
        }
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
        }
    }

    #[test]
    fn test_parse_episode_number_patterns() {
        assert_eq!(parse_episode_number("ep-123.txt"), Some(123));
        assert_eq!(parse_episode_number("episode_45.txt"), Some(45));
        assert_eq!(parse_episode_number("EP123.txt"), Some(123));
        assert_eq!(parse_episode_number("Ep 7.txt"), Some(7));
        assert_eq!(parse_episode_number("12.txt"), Some(12));
        assert_eq!(parse_episode_number("interview-33.txt"), Some(33));
        assert_eq!(parse_episode_number("notes.txt"), None);
    }

    #[test]
    fn test_extract_json_object_embedded_in_prose() {
        let reply = r#"Sure! Here's the data: {"title":"X","topics":["Product"]} hope it helps"#;
        assert_eq!(
            extract_json_object(reply),
            Some(r#"{"title":"X","topics":["Product"]}"#)
        );
    }

    #[test]
    fn test_extract_json_object_ignores_braces_in_strings() {
        let reply = r#"{"title":"a } brace","nested":{"ok":true}} trailing"#;
        assert_eq!(
            extract_json_object(reply),
            Some(r#"{"title":"a } brace","nested":{"ok":true}}"#)
        );
    }

    #[test]
    fn test_extract_json_object_none_without_braces() {
        assert_eq!(extract_json_object("no json here at all"), None);
        assert_eq!(extract_json_object("unbalanced { forever"), None);
    }

    #[test]
    fn test_coerce_defaults_and_topic_filtering() {
        let value: Value = serde_json::from_str(
            r#"{"topics":["Product","Blockchain","growth"],"warnings":"oops"}"#,
        )
        .unwrap();
        let analysis = coerce_analysis(&value, "ep-9.txt");
        assert_eq!(analysis.title, DEFAULT_TITLE);
        assert_eq!(analysis.topics, vec!["Product", "Growth"]);
        assert!(analysis.warnings.is_empty());
        assert_eq!(analysis.confidence, Confidence::Medium);
        assert_eq!(analysis.estimated_duration, DEFAULT_DURATION);
        // Model gave no episodeNumber, so the filename fallback applies.
        assert_eq!(analysis.episode_number, Some(9));
    }

    #[test]
    fn test_coerce_prefers_model_episode_number() {
        let value: Value = serde_json::from_str(r#"{"episodeNumber": 200}"#).unwrap();
        let analysis = coerce_analysis(&value, "ep-9.txt");
        assert_eq!(analysis.episode_number, Some(200));
    }

    #[tokio::test]
    async fn test_analyze_parses_reply_with_defaults() {
        // Scenario: the model wraps its JSON in chatty prose.
        let provider = ScriptedProvider::new(vec![Ok(
            r#"Sure! Here's the data: {"title":"X","topics":["Product"]}"#.to_string(),
        )]);
        let analyzer = Analyzer::new(Box::new(provider), fast_retry());

        let analyzed = analyzer.analyze("ep-1.txt", "transcript", &[]).await.unwrap();
        assert_eq!(analyzed.analysis.title, "X");
        assert_eq!(analyzed.analysis.topics, vec!["Product"]);
        assert_eq!(analyzed.analysis.confidence, Confidence::Medium);
        assert!(analyzed.analysis.warnings.is_empty());
        assert_eq!(analyzed.matched_guest_id, None);
    }

    #[tokio::test]
    async fn test_analyze_rejects_hallucinated_guest_id() {
        let provider = ScriptedProvider::new(vec![Ok(
            r#"{"title":"X","matchedGuestId":"g-fake"}"#.to_string(),
        )]);
        let analyzer = Analyzer::new(Box::new(provider), fast_retry());

        let analyzed = analyzer.analyze("ep-1.txt", "transcript", &[]).await.unwrap();
        assert_eq!(analyzed.matched_guest_id, None);
    }

    #[tokio::test]
    async fn test_unparsable_reply_is_not_retried() {
        let provider = ScriptedProvider::new(vec![Ok("I could not find anything".to_string())]);
        let counter = provider.clone();
        let analyzer = Analyzer::new(Box::new(provider), fast_retry());

        let err = analyzer
            .analyze("ep-1.txt", "transcript", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::UnparsableResponse));
        assert_eq!(counter.call_count(), 1);
    }

    #[tokio::test]
    async fn test_non_transient_error_propagates_immediately() {
        let provider =
            ScriptedProvider::new(vec![Err("401 Unauthorized: bad api key".to_string())]);
        let counter = provider.clone();
        let analyzer = Analyzer::new(Box::new(provider), fast_retry());

        let err = analyzer
            .analyze("ep-1.txt", "transcript", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Provider(_)));
        assert_eq!(counter.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retries_until_budget_exhausted() {
        // Every attempt fails with a 429; with max_retries = 3 there are
        // exactly 4 attempts before the terminal error.
        let failure = "429 Too Many Requests".to_string();
        let provider = ScriptedProvider::new(vec![
            Err(failure.clone()),
            Err(failure.clone()),
            Err(failure.clone()),
            Err(failure.clone()),
        ]);
        let counter = provider.clone();
        let analyzer = Analyzer::new(Box::new(provider), fast_retry());

        let started = tokio::time::Instant::now();
        let err = analyzer
            .analyze("ep-1.txt", "transcript", &[])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::RetriesExhausted { attempts: 4, .. }
        ));
        assert_eq!(counter.call_count(), 4);
        // Backoff doubles: 100ms + 200ms + 400ms.
        assert_eq!(started.elapsed(), Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_recovers_within_budget() {
        let provider = ScriptedProvider::new(vec![
            Err("overloaded_error".to_string()),
            Ok(r#"{"title":"Recovered"}"#.to_string()),
        ]);
        let counter = provider.clone();
        let analyzer = Analyzer::new(Box::new(provider), fast_retry());

        let analyzed = analyzer.analyze("ep-1.txt", "transcript", &[]).await.unwrap();
        assert_eq!(analyzed.analysis.title, "Recovered");
        assert_eq!(counter.call_count(), 2);
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_transient_error("429 Too Many Requests"));
        assert!(is_transient_error("Rate limit exceeded"));
        assert!(is_transient_error("Overloaded, try again"));
        assert!(is_transient_error("HTTP 529"));
        assert!(!is_transient_error("401 Unauthorized"));
        assert!(!is_transient_error("connection refused"));
    }
}
