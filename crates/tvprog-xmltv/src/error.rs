//! Parse error type.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an input file into XMLTV records.
///
/// Positions are 1-based and count elements of the same kind in
/// document order.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input file could not be opened.
    #[error("failed to open {}", .path.display())]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not well-formed XML or has no root element.
    #[error("malformed XMLTV document")]
    Xml(#[from] quick_xml::de::DeError),

    /// A required attribute is absent.
    #[error("{element} #{position} is missing the `{attribute}` attribute")]
    MissingAttribute {
        /// Element kind (`channel` or `programme`).
        element: &'static str,
        /// Position among elements of the same kind.
        position: usize,
        /// Attribute name.
        attribute: &'static str,
    },

    /// A required child element is absent.
    #[error("{element} #{position} has no `{child}` element")]
    MissingChild {
        /// Element kind (`channel` or `programme`).
        element: &'static str,
        /// Position among elements of the same kind.
        position: usize,
        /// Child element name.
        child: &'static str,
    },

    /// A `start`/`stop` attribute does not match `YYYYMMDDHHMMSS ±HHMM`.
    #[error("{element} #{position} has an invalid `{attribute}` timestamp {value:?}")]
    InvalidTimestamp {
        /// Element kind.
        element: &'static str,
        /// Position among elements of the same kind.
        position: usize,
        /// Attribute name.
        attribute: &'static str,
        /// Raw attribute value.
        value: String,
        /// Underlying chrono error.
        #[source]
        source: chrono::ParseError,
    },
}
