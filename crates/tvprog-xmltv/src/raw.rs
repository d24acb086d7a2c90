//! Serde mirror of the XMLTV elements the importer reads.
//!
//! Every field is optional here so that missing data is reported by the
//! parser with the element position instead of a bare serde message.
//! Unknown attributes, children and top-level elements are skipped by
//! the deserializer.

use serde::Deserialize;

/// Document root (`<tv>`).
#[derive(Debug, Deserialize)]
pub struct RawTv {
    /// `channel` elements in document order.
    #[serde(rename = "channel", default)]
    pub channels: Vec<RawChannel>,
    /// `programme` elements in document order.
    #[serde(rename = "programme", default)]
    pub programmes: Vec<RawProgramme>,
}

/// `<channel id="...">`.
#[derive(Debug, Deserialize)]
pub struct RawChannel {
    #[serde(rename = "@id", default)]
    pub id: Option<String>,
    #[serde(rename = "display-name", default)]
    pub display_names: Vec<RawText>,
}

/// `<programme start="..." stop="..." channel="...">`.
#[derive(Debug, Deserialize)]
pub struct RawProgramme {
    #[serde(rename = "@start", default)]
    pub start: Option<String>,
    #[serde(rename = "@stop", default)]
    pub stop: Option<String>,
    #[serde(rename = "@channel", default)]
    pub channel: Option<String>,
    #[serde(rename = "title", default)]
    pub titles: Vec<RawText>,
}

/// Text-only element such as `<title lang="en">News</title>`.
#[derive(Debug, Deserialize)]
pub struct RawText {
    /// Element text with entities resolved; empty for `<title/>`.
    #[serde(rename = "$text", default)]
    pub value: String,
}
