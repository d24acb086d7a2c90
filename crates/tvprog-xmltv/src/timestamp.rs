//! XMLTV timestamp handling.

use chrono::{DateTime, FixedOffset};

/// `chrono` format of XMLTV timestamps, e.g. `20240101180000 +0000`.
pub const XMLTV_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S %z";

/// Parses an XMLTV timestamp, keeping the offset given in the source.
///
/// # Errors
///
/// Returns an error if `value` does not match [`XMLTV_TIMESTAMP_FORMAT`].
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(value, XMLTV_TIMESTAMP_FORMAT)
}
