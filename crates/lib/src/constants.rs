//! Shared constants for the analysis pipeline.

/// The maximum number of transcript characters submitted to the model.
/// Roughly 12k words, chosen to stay comfortably within context limits
/// while preserving as much of the episode as possible.
pub const MAX_TRANSCRIPT_CHARS: usize = 80_000;

/// Appended to a transcript whenever it was cut at `MAX_TRANSCRIPT_CHARS`.
pub const TRUNCATION_MARKER: &str = "\n\n[TRANSCRIPT TRUNCATED...]";

/// Default number of retries after the initial attempt for throttled calls.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default initial backoff delay in milliseconds. Doubles on each retry.
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 1000;

/// Default pause between consecutive items in a batch, in milliseconds.
/// Batches run strictly sequentially and this delay keeps the request rate
/// under the provider's throttling threshold.
pub const DEFAULT_ITEM_DELAY_MS: u64 = 2000;

/// Placeholder title used when the model could not produce one.
pub const DEFAULT_TITLE: &str = "Untitled Episode";

/// Placeholder duration used when the model could not estimate one.
pub const DEFAULT_DURATION: &str = "1h 0m";

/// The closed topic vocabulary. Both the extraction prompt and the response
/// validator work from this list; values outside it are dropped.
pub const TOPICS: &[&str] = &[
    "Product",
    "Growth",
    "Leadership",
    "Strategy",
    "Culture",
    "Hiring",
    "Marketing",
    "Design",
    "Engineering",
    "Startups",
    "AI",
    "B2B",
    "Consumer",
    "Pricing",
    "Metrics",
];
