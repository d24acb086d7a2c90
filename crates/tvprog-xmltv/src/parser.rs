//! XMLTV document parsing.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::instrument;

use super::error::ParseError;
use super::raw::{RawChannel, RawProgramme, RawText, RawTv};
use super::timestamp::parse_timestamp;
use super::types::{XmltvChannel, XmltvDocument, XmltvProgramme};

const CHANNEL: &str = "channel";
const PROGRAMME: &str = "programme";

/// Parses an XMLTV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its content is not a
/// valid XMLTV document (see [`parse_reader`]).
#[instrument(skip_all, fields(path = %path.display()))]
pub fn parse_file(path: &Path) -> Result<XmltvDocument, ParseError> {
    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_reader(BufReader::new(file))
}

/// Parses an XMLTV document from a buffered reader.
///
/// The whole document is read before any record is returned, so a
/// failure never yields a partial result.
///
/// # Errors
///
/// Returns an error if the XML is malformed, a `channel` lacks `id` or
/// `display-name`, or a `programme` lacks `start`, `stop`, `channel` or
/// `title`, or carries a timestamp that is not `YYYYMMDDHHMMSS ±HHMM`.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<XmltvDocument, ParseError> {
    let raw: RawTv = quick_xml::de::from_reader(reader)?;
    build_document(raw)
}

/// Parses an XMLTV document held in memory.
///
/// # Errors
///
/// Same as [`parse_reader`].
pub fn parse_str(xml: &str) -> Result<XmltvDocument, ParseError> {
    let raw: RawTv = quick_xml::de::from_str(xml)?;
    build_document(raw)
}

/// Converts deserialized elements into records, keeping document order.
fn build_document(raw: RawTv) -> Result<XmltvDocument, ParseError> {
    let channels = (1_usize..)
        .zip(raw.channels)
        .map(|(position, ch)| to_channel(position, ch))
        .collect::<Result<Vec<_>, _>>()?;

    let programmes = (1_usize..)
        .zip(raw.programmes)
        .map(|(position, prog)| to_programme(position, prog))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        channels = channels.len(),
        programmes = programmes.len(),
        "XMLTV document parsed"
    );

    Ok(XmltvDocument {
        channels,
        programmes,
    })
}

fn to_channel(position: usize, raw: RawChannel) -> Result<XmltvChannel, ParseError> {
    let id = raw.id.ok_or(ParseError::MissingAttribute {
        element: CHANNEL,
        position,
        attribute: "id",
    })?;
    let display_name = last_text(raw.display_names).ok_or(ParseError::MissingChild {
        element: CHANNEL,
        position,
        child: "display-name",
    })?;

    Ok(XmltvChannel { id, display_name })
}

fn to_programme(position: usize, raw: RawProgramme) -> Result<XmltvProgramme, ParseError> {
    let missing = |attribute: &'static str| ParseError::MissingAttribute {
        element: PROGRAMME,
        position,
        attribute,
    };

    let start = raw.start.ok_or_else(|| missing("start"))?;
    let stop = raw.stop.ok_or_else(|| missing("stop"))?;
    let channel = raw.channel.ok_or_else(|| missing("channel"))?;
    let title = last_text(raw.titles).ok_or(ParseError::MissingChild {
        element: PROGRAMME,
        position,
        child: "title",
    })?;

    Ok(XmltvProgramme {
        start: programme_timestamp(position, "start", start)?,
        stop: programme_timestamp(position, "stop", stop)?,
        channel,
        title,
    })
}

fn programme_timestamp(
    position: usize,
    attribute: &'static str,
    value: String,
) -> Result<chrono::DateTime<chrono::FixedOffset>, ParseError> {
    parse_timestamp(&value).map_err(|source| ParseError::InvalidTimestamp {
        element: PROGRAMME,
        position,
        attribute,
        value,
        source,
    })
}

/// When a child is repeated (one per language), the last one wins.
fn last_text(texts: Vec<RawText>) -> Option<String> {
    texts.into_iter().last().map(|t| t.value)
}
