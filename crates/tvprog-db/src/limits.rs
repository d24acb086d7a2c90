//! Column limits for bounded text fields.
//!
//! Values longer than their column limit are clipped, not rejected: the
//! stored value is the first `max` characters of the source value. This
//! is lossy on purpose, and every row goes through it right before it is
//! bound to a statement.

/// Maximum length of `channels.name`.
pub const CHANNEL_NAME_MAX: usize = 150;
/// Maximum length of `channels.channel`.
pub const CHANNEL_ID_MAX: usize = 100;
/// Maximum length of `programmes.name`.
pub const PROGRAMME_NAME_MAX: usize = 150;
/// Maximum length of `programmes.channel`.
pub const PROGRAMME_CHANNEL_MAX: usize = 100;

/// Returns the first `max_chars` characters of `value`.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
#[must_use]
pub fn clip(value: &str, max_chars: usize) -> &str {
    value
        .char_indices()
        .nth(max_chars)
        .and_then(|(end, _)| value.get(..end))
        .unwrap_or(value)
}
