//! Flat records produced from an XMLTV document.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

/// A `channel` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmltvChannel {
    /// Channel identifier (`id` attribute).
    pub id: String,
    /// Text of the last `display-name` child.
    pub display_name: String,
}

/// A `programme` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmltvProgramme {
    /// Channel identifier (`channel` attribute).
    pub channel: String,
    /// Text of the last `title` child.
    pub title: String,
    /// Broadcast start, in the offset given by the source.
    pub start: DateTime<FixedOffset>,
    /// Broadcast stop, in the offset given by the source.
    pub stop: DateTime<FixedOffset>,
}

impl XmltvProgramme {
    /// Calendar date of the start time as written in the source offset.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Wall-clock start time as written in the source offset.
    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.start.time()
    }

    /// Start as Unix epoch seconds.
    #[must_use]
    pub fn timestart(&self) -> i64 {
        self.start.timestamp()
    }

    /// Stop as Unix epoch seconds.
    #[must_use]
    pub fn timestop(&self) -> i64 {
        self.stop.timestamp()
    }
}

/// All records of one document, each list in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmltvDocument {
    /// Channels, duplicates preserved.
    pub channels: Vec<XmltvChannel>,
    /// Programmes, duplicates preserved.
    pub programmes: Vec<XmltvProgramme>,
}
