use crate::Identifier;
use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use time::UtcDateTime;

/// A named group of tables, either one scrape run or the merge destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: Identifier,
    pub created_at: UtcDateTime,
}

#[derive(sqlx::FromRow)]
pub(crate) struct SchemaRow {
    name: String,
    created_at: i64,
}
impl TryFrom<SchemaRow> for Schema {
    type Error = Error;
    fn try_from(row: SchemaRow) -> Result<Self, Self::Error> {
        Ok(Self {
            name: Identifier::new(row.name).or_raise(|| ErrorKind::InvalidData("schema name"))?,
            created_at: UtcDateTime::from_unix_timestamp(row.created_at)
                .or_raise(|| ErrorKind::InvalidData("schema creation date"))?,
        })
    }
}
