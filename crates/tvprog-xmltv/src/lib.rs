//! XMLTV schedule parser.
//!
//! Reads an XMLTV document and flattens its `channel` and `programme`
//! elements into ordered record lists, ready to be written to the
//! schedule database.

mod error;
mod parser;
mod raw;
mod timestamp;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use error::ParseError;
pub use parser::{parse_file, parse_reader, parse_str};
pub use timestamp::{XMLTV_TIMESTAMP_FORMAT, parse_timestamp};
#[allow(clippy::module_name_repetitions)]
pub use types::{XmltvChannel, XmltvDocument, XmltvProgramme};
