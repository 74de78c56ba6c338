use crate::error::{ErrorKind, Result};
use crate::snapshot_name;
use async_stream::try_stream;
use exn::ResultExt;
use futures::Stream;
use iradio_fetch::Directory;
use iradio_merge::StreamRecord;
use iradio_store::{Identifier, Repository};
use time::UtcDateTime;

/// Progress events emitted by [`populate`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once.
/// 2. [`Fetched`](Self::Fetched), once per category, in selection order.
/// 3. [`Written`](Self::Written), once per category, in selection order.
/// 4. [`Complete`](Self::Complete), exactly once, after the commit.
///
/// An error terminates the stream early, in which case nothing was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulateEvent {
    Started { schema: Identifier, categories: usize },
    /// A category was downloaded; `stations` excludes the skipped ones.
    Fetched { table: Identifier, stations: usize },
    Written { table: Identifier, records: usize },
    Complete { schema: Identifier, tables: usize },
}

/// Scrape `categories` into a new snapshot schema named after `started_at`.
///
/// Every category is downloaded first; the schema and its tables are then
/// written in one batch, each table numbered from 1 in the order the
/// directory listed its stations. A schema with the same name (a run in the
/// same minute) is replaced.
///
/// Labels are checked before anything is downloaded.
pub fn populate<'a, D>(
    directory: &'a D,
    repo: &'a Repository,
    categories: &'a [String],
    started_at: UtcDateTime,
) -> impl Stream<Item = Result<PopulateEvent>> + 'a
where
    D: Directory + ?Sized,
{
    try_stream!({
        let schema = snapshot_name(started_at)?;
        let tables = categories
            .iter()
            .map(|label| Identifier::new(label.as_str()).or_raise(|| ErrorKind::InvalidName(label.clone())))
            .collect::<Result<Vec<_>>>()?;
        tracing::info!(%schema, categories = tables.len(), "Populating snapshot");
        yield PopulateEvent::Started { schema: schema.clone(), categories: tables.len() };

        let mut snapshot = Vec::with_capacity(tables.len());
        for (label, table) in categories.iter().zip(tables) {
            let stations = directory.fetch_category(label).await.or_raise(|| ErrorKind::Directory)?;
            yield PopulateEvent::Fetched { table: table.clone(), stations: stations.len() };
            snapshot.push((table, StreamRecord::numbered(stations, 1)));
        }

        let mut batch = repo.begin().await.or_raise(|| ErrorKind::Store)?;
        if batch.get_schema(&schema).await.or_raise(|| ErrorKind::Store)?.is_some() {
            tracing::warn!(%schema, "Snapshot schema already exists, replacing it");
        }
        batch.create_schema(&schema).await.or_raise(|| ErrorKind::Store)?;
        for (table, records) in &snapshot {
            batch.write_table(&schema, table, records).await.or_raise(|| ErrorKind::Store)?;
            yield PopulateEvent::Written { table: table.clone(), records: records.len() };
        }
        batch.commit().await.or_raise(|| ErrorKind::Store)?;
        tracing::info!(%schema, tables = snapshot.len(), "Snapshot committed");
        yield PopulateEvent::Complete { schema, tables: snapshot.len() };
    })
}
