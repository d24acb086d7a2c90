//! Closed set of tables the CLI may truncate.

use std::fmt;
use std::str::FromStr;

use super::error::UnknownTableError;

/// A schedule table.
///
/// This is the whole truncation allow-list: no other table name can be
/// turned into a `Table`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `channels`
    Channels,
    /// `programmes`
    Programmes,
}

impl Table {
    /// Every table, in schema creation order.
    pub const ALL: [Self; 2] = [Self::Channels, Self::Programmes];

    /// Table names accepted by [`Table::from_str`].
    pub const NAMES: [&'static str; 2] = [Self::Channels.name(), Self::Programmes.name()];

    /// SQL table name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Channels => "channels",
            Self::Programmes => "programmes",
        }
    }

    /// Statement removing every row of the table.
    pub(crate) const fn delete_all_sql(self) -> &'static str {
        match self {
            Self::Channels => "DELETE FROM channels",
            Self::Programmes => "DELETE FROM programmes",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = UnknownTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|table| table.name() == s)
            .ok_or_else(|| UnknownTableError {
                name: String::from(s),
            })
    }
}
