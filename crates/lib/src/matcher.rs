//! # Guest Matching
//!
//! The model is shown the roster of known guests and asked to name the id of
//! the one it believes the transcript's guest matches. Models hallucinate ids,
//! so a claimed match is only honored if it actually exists in the known set.

use crate::types::Guest;

/// Validates a model-claimed guest match against the known guest set.
///
/// Returns the claimed id only when it names a real guest; anything else is
/// treated as no-match. The "create new guest" fallback for unmatched names is
/// a policy decision made by the caller, not here.
pub fn validate_guest_match(claimed_id: Option<&str>, guests: &[Guest]) -> Option<String> {
    let claimed = claimed_id?;
    guests
        .iter()
        .any(|guest| guest.id == claimed)
        .then(|| claimed.to_string())
}
