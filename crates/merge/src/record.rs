use derive_more::Display;

/// A station as scraped from the directory, before it has been numbered.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
#[display("{name} <{link}>")]
pub struct Station {
    /// Display name, free text.
    pub name: String,
    /// Resolved playlist URL.
    pub link: String,
}
impl Station {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self { name: name.into(), link: link.into() }
    }
}

/// One row of a snapshot or destination table.
///
/// The `id` is unique within its table; `link` is the natural key used when
/// merging, but its uniqueness is not enforced here.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
#[display("#{id} {name} <{link}>")]
pub struct StreamRecord {
    pub id: u64,
    pub name: String,
    pub link: String,
}
impl StreamRecord {
    pub fn new(id: u64, name: impl Into<String>, link: impl Into<String>) -> Self {
        Self { id, name: name.into(), link: link.into() }
    }

    /// Assign sequential identifiers to scraped stations, starting at `first`.
    ///
    /// A fresh snapshot table starts at 1; appending to an existing table
    /// should start at its highest identifier plus one.
    pub fn numbered(stations: impl IntoIterator<Item = Station>, first: u64) -> Vec<Self> {
        stations
            .into_iter()
            .zip(first..)
            .map(|(station, id)| Self { id, name: station.name, link: station.link })
            .collect()
    }
}
impl From<StreamRecord> for Station {
    fn from(record: StreamRecord) -> Self {
        Self { name: record.name, link: record.link }
    }
}
