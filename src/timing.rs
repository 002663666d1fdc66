//! Frame-delay normalization.
//!
//! Animated containers frequently carry per-frame delays of zero (or a few
//! milliseconds) as an authoring artifact rather than a genuine request for
//! instantaneous frames. Browsers and viewers floor such delays to a
//! visually meaningful default, and this module reproduces that convention
//! in one place so every consumer agrees on the rule.

/// Delay assigned when a reported delay is below the floor threshold, and to
/// frames produced by the single-frame fallback (which has no timing at all).
pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// Reported delays at or below this value are treated as authoring artifacts
/// and replaced with [`DEFAULT_FRAME_DELAY_MS`].
pub const DELAY_FLOOR_THRESHOLD_MS: u32 = 10;

/// Normalize a raw per-frame delay reported by a decoder.
///
/// Delays of [`DELAY_FLOOR_THRESHOLD_MS`] or less become
/// [`DEFAULT_FRAME_DELAY_MS`]; anything above passes through unchanged.
/// Pure and idempotent: `normalize_delay(normalize_delay(x)) == normalize_delay(x)`.
///
/// # Example
///
/// ```
/// use unspool::normalize_delay;
///
/// assert_eq!(normalize_delay(0), 100);
/// assert_eq!(normalize_delay(10), 100);
/// assert_eq!(normalize_delay(11), 11);
/// assert_eq!(normalize_delay(250), 250);
/// ```
pub fn normalize_delay(raw_delay_ms: u32) -> u32 {
    if raw_delay_ms <= DELAY_FLOOR_THRESHOLD_MS {
        DEFAULT_FRAME_DELAY_MS
    } else {
        raw_delay_ms
    }
}
