//! # Analysis Prompts
//!
//! Prompt construction for the transcript metadata extraction call. The
//! system prompt pins the extraction contract and the closed topic
//! vocabulary; the user prompt carries the filename, the known-guest roster
//! for matching, and the (possibly truncated) transcript.

use crate::constants::{MAX_TRANSCRIPT_CHARS, TOPICS, TRUNCATION_MARKER};
use crate::types::Guest;
use std::borrow::Cow;
use std::fmt::Write;

/// Builds the system instruction for transcript analysis.
pub fn analysis_system_prompt() -> String {
    let topics = TOPICS.join(", ");
    format!(
        "You are an expert at analyzing podcast transcripts. Your job is to extract \
structured metadata from podcast episode transcripts to populate an episode database.

For each transcript, you must extract:
1. Episode number (from the filename pattern if present)
2. A compelling title that captures the main topic
3. A 2-3 sentence description summarizing the episode
4. Guest information (name, title, company)
5. A memorable, shareable quote from the transcript
6. Topics that best categorize the episode
7. A duration estimate based on word count

TOPIC CATEGORIES (select 2-4 that best fit):
{topics}

IMPORTANT GUIDELINES:
- If information cannot be reliably extracted, use null
- For quotes, select something insightful, memorable, or actionable
- Titles should be compelling but accurate to the content
- Duration estimation: approximately 150 words = 1 minute of speech

You MUST respond with valid JSON only."
    )
}

/// Builds the user prompt for one transcript.
///
/// The transcript is truncated to [`MAX_TRANSCRIPT_CHARS`] characters before
/// submission, with a trailing marker appended when truncation occurred.
pub fn format_analysis_prompt(file_name: &str, transcript: &str, guests: &[Guest]) -> String {
    let content = truncate_transcript(transcript);
    let guest_list = if guests.is_empty() {
        Cow::Borrowed("No existing guests in database.")
    } else {
        let mut list = String::new();
        for guest in guests {
            let _ = writeln!(
                list,
                "- {} ({} at {}) [ID: {}]",
                guest.name, guest.title, guest.company, guest.id
            );
        }
        Cow::Owned(list)
    };
    let topics = TOPICS.join(", ");

    format!(
        r#"Analyze this podcast transcript and extract episode metadata.

FILENAME: {file_name}
(Use this to extract the episode number if present, e.g., "ep-123.txt" or "episode_45.txt")

EXISTING GUESTS (for matching):
{guest_list}

TRANSCRIPT:
"""
{content}
"""

Respond with a JSON object in this exact format:
{{
  "episodeNumber": <number or null if not determinable>,
  "title": "<compelling episode title based on main topic>",
  "description": "<2-3 sentence summary of episode content>",
  "featuredQuote": "<memorable quote from the transcript>",
  "quoteTimestamp": null,
  "topics": ["<topic1>", "<topic2>", ...],
  "estimatedDuration": "<e.g., '1h 15m' based on word count>",
  "guestName": "<full name of guest or null>",
  "guestTitle": "<job title of guest or null>",
  "guestCompany": "<company name or null>",
  "matchedGuestId": "<ID from existing guests list if this matches one, otherwise null>",
  "confidence": "<'high' | 'medium' | 'low' based on transcript quality>",
  "warnings": ["<any issues or notes about this transcript>"]
}}

IMPORTANT:
- Only use topic values from the allowed list: {topics}
- If the guest matches an existing guest, include their ID in matchedGuestId
- Set confidence to 'low' if the transcript is unclear or incomplete"#
    )
}

/// Truncates a transcript to the configured character budget, appending the
/// truncation marker when content was cut. The cut happens at a character
/// boundary so the result is always valid UTF-8.
pub fn truncate_transcript(content: &str) -> Cow<'_, str> {
    match content.char_indices().nth(MAX_TRANSCRIPT_CHARS) {
        Some((byte_index, _)) => {
            Cow::Owned(format!("{}{}", &content[..byte_index], TRUNCATION_MARKER))
        }
        None => Cow::Borrowed(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_transcript_untouched() {
        let content = "A short transcript.";
        assert!(matches!(truncate_transcript(content), Cow::Borrowed(_)));
    }

    #[test]
    fn test_long_transcript_truncated_with_marker() {
        let content = "x".repeat(MAX_TRANSCRIPT_CHARS + 500);
        let truncated = truncate_transcript(&content);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            truncated.chars().count(),
            MAX_TRANSCRIPT_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // Multi-byte characters must not be split mid-codepoint.
        let content = "é".repeat(MAX_TRANSCRIPT_CHARS + 10);
        let truncated = truncate_transcript(&content);
        assert!(truncated.ends_with(TRUNCATION_MARKER));
        assert!(std::str::from_utf8(truncated.as_bytes()).is_ok());
    }

    #[test]
    fn test_prompt_lists_known_guests() {
        let guests = vec![crate::types::Guest {
            id: "g-1".to_string(),
            name: "Julie Zhuo".to_string(),
            title: "Co-founder".to_string(),
            company: "Sundial".to_string(),
            bio: String::new(),
            photo_url: String::new(),
        }];
        let prompt = format_analysis_prompt("ep-1.txt", "hello", &guests);
        assert!(prompt.contains("Julie Zhuo"));
        assert!(prompt.contains("[ID: g-1]"));

        let empty = format_analysis_prompt("ep-1.txt", "hello", &[]);
        assert!(empty.contains("No existing guests"));
    }
}
