use crate::error::{ErrorKind, Result};
use async_stream::try_stream;
use derive_more::Display;
use exn::ResultExt;
use futures::Stream;
use iradio_merge::{MergePlan, merge};
use iradio_store::{Identifier, Repository, SnapshotStore};
use tracing::instrument;

/// What happened to one source table.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum TableOutcome {
    /// The destination already had the table; the snapshot was merged in.
    #[display("merged ({inserted} inserted, {updated} updated)")]
    Merged { inserted: usize, updated: usize },
    /// The destination did not have the table; it was copied over whole.
    #[display("created ({records} records)")]
    Created { records: u64 },
}

#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("{source}/{table}: {outcome}")]
pub struct TableSummary {
    pub source: Identifier,
    pub table: Identifier,
    pub outcome: TableOutcome,
}

/// Totals over a whole update run.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq)]
#[display("{tables} tables: {created} created, {inserted} streams inserted, {updated} streams renamed")]
pub struct UpdateSummary {
    pub tables: usize,
    pub created: usize,
    pub inserted: usize,
    pub updated: usize,
}
impl UpdateSummary {
    fn record(&mut self, outcome: TableOutcome) {
        self.tables += 1;
        match outcome {
            TableOutcome::Merged { inserted, updated } => {
                self.inserted += inserted;
                self.updated += updated;
            },
            TableOutcome::Created { .. } => self.created += 1,
        }
    }
}

/// Progress events emitted by [`update`].
///
/// [`Started`](Self::Started) comes first, then one [`Table`](Self::Table)
/// per source table (sources in the order given, tables in creation order),
/// then [`Complete`](Self::Complete). An error terminates the stream early,
/// in which case nothing was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    Started { destination: Identifier, sources: usize },
    Table(TableSummary),
    /// `committed` is `false` for a dry run, whose changes were rolled back.
    Complete { summary: UpdateSummary, committed: bool },
}

/// Snapshots are never written to; only the destination is.
fn ensure_distinct(sources: &[Identifier], destination: &Identifier) -> Result<()> {
    if sources.contains(destination) {
        exn::bail!(ErrorKind::SourceIsDestination(destination.to_string()));
    }
    Ok(())
}

/// Merge one snapshot table into the destination table of the same name.
///
/// Both tables must exist and `source` must differ from `destination`. The
/// computed plan is applied through `store` and returned.
#[instrument(level = "debug", skip_all, fields(%source, %destination, %table))]
pub async fn merge_table<S>(store: &mut S, source: &Identifier, destination: &Identifier, table: &Identifier) -> Result<MergePlan>
where
    S: SnapshotStore + ?Sized,
{
    ensure_distinct(std::slice::from_ref(source), destination)?;
    let incoming = store.read_table(source, table).await.or_raise(|| ErrorKind::Store)?;
    let existing = store.read_table(destination, table).await.or_raise(|| ErrorKind::Store)?;
    let plan = merge(&incoming, &existing);
    store.apply(destination, table, plan.operations()).await.or_raise(|| ErrorKind::Store)?;
    Ok(plan)
}

/// Fold `sources` into `destination`, in order, in a single batch.
///
/// The destination schema is created if it does not exist. For every table of
/// every source: if the destination has a table of that name the two are
/// merged (inserts and renames only, nothing is deleted), otherwise the table
/// is copied into the destination as is. When several sources are given,
/// later ones see the result of earlier ones.
///
/// With `dry_run` the batch is rolled back instead of committed, so the
/// events describe what would have happened.
pub fn update<'a>(
    repo: &'a Repository,
    sources: &'a [Identifier],
    destination: &'a Identifier,
    dry_run: bool,
) -> impl Stream<Item = Result<UpdateEvent>> + 'a {
    try_stream!({
        ensure_distinct(sources, destination)?;
        tracing::info!(%destination, sources = sources.len(), dry_run, "Updating destination");
        yield UpdateEvent::Started { destination: destination.clone(), sources: sources.len() };

        let mut batch = repo.begin().await.or_raise(|| ErrorKind::Store)?;
        batch.ensure_schema(destination).await.or_raise(|| ErrorKind::Store)?;
        let mut summary = UpdateSummary::default();
        for source in sources {
            let tables = batch.list_tables(source).await.or_raise(|| ErrorKind::Store)?;
            for table in tables {
                let outcome = if batch.table_exists(destination, &table).await.or_raise(|| ErrorKind::Store)? {
                    let plan = merge_table(&mut batch, source, destination, &table).await?;
                    TableOutcome::Merged { inserted: plan.inserts().count(), updated: plan.updates().count() }
                } else {
                    let records =
                        batch.copy_table(source, destination, &table).await.or_raise(|| ErrorKind::Store)?;
                    TableOutcome::Created { records }
                };
                tracing::debug!(%source, %table, %outcome, "Table done");
                summary.record(outcome);
                yield UpdateEvent::Table(TableSummary { source: source.clone(), table, outcome });
            }
        }

        if dry_run {
            batch.rollback().await.or_raise(|| ErrorKind::Store)?;
            tracing::info!(%summary, "Dry run, changes discarded");
        } else {
            batch.commit().await.or_raise(|| ErrorKind::Store)?;
            tracing::info!(%summary, "Destination updated");
        }
        yield UpdateEvent::Complete { summary, committed: !dry_run };
    })
}
