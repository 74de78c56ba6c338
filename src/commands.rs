//! Subcommand handlers. Listings and progress go to stdout, logs to stderr.

use crate::error::{ErrorKind, Result};
use crate::select::{SelectArgs, Selection};
use exn::ResultExt;
use futures::{StreamExt, pin_mut};
use iradio_config::Config;
use iradio_fetch::{Directory, HttpDirectory, SiteUrl};
use iradio_library::{PopulateEvent, UpdateEvent, populate, update};
use iradio_store::{Database, Identifier, Repository};
use time::UtcDateTime;

const NO_SELECTOR: &str = "No action requested, select with --all, --one, --range or --few";

/// Everything a command may need, built lazily from the configuration.
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn directory(&self) -> Result<HttpDirectory> {
        let site = &self.config.site;
        let url = SiteUrl::parse(&site.url).or_raise(|| ErrorKind::Config)?;
        HttpDirectory::new(url, &site.user_agent, site.timeout()).or_raise(|| ErrorKind::Directory)
    }

    async fn database(&self) -> Result<Database> {
        let path = &self.config.database.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Database)?;
        }
        Database::connect(path).await.or_raise(|| ErrorKind::Database)
    }

    fn destination(&self) -> Result<Identifier> {
        Identifier::new(self.config.database.destination.as_str()).or_raise(|| ErrorKind::Config)
    }

    async fn categories_list(&self, directory: &dyn Directory) -> Result<Vec<String>> {
        directory.categories().await.or_raise(|| ErrorKind::Directory)
    }

    pub async fn categories(&self) -> Result<()> {
        let directory = self.directory()?;
        for (index, label) in self.categories_list(&directory).await?.iter().enumerate() {
            println!("{index} - {label}");
        }
        Ok(())
    }

    pub async fn schemas(&self) -> Result<()> {
        let db = self.database().await?;
        let repo = Repository::from(&db);
        let schemas = repo.list_schemas(&self.destination()?).await.or_raise(|| ErrorKind::Database)?;
        for (index, schema) in schemas.iter().enumerate() {
            println!("{index} - {}", schema.name);
        }
        db.close().await;
        Ok(())
    }

    pub async fn populate(&self, select: &SelectArgs) -> Result<()> {
        let Some(selection) = select.selection() else {
            println!("{NO_SELECTOR}");
            return Ok(());
        };
        let directory = self.directory()?;
        let categories = self.categories_list(&directory).await?;
        let selected: Vec<String> = selection.pick(&categories)?.into_iter().cloned().collect();

        let db = self.database().await?;
        let repo = Repository::from(&db);
        let result = {
            let events = populate(&directory, &repo, &selected, UtcDateTime::now());
            pin_mut!(events);
            report(events, |event| match event {
                PopulateEvent::Started { schema, categories } => {
                    println!("Populating '{schema}' with {categories} categories");
                },
                PopulateEvent::Fetched { table, stations } => println!("{table}: {stations} stations"),
                PopulateEvent::Written { .. } => {},
                PopulateEvent::Complete { schema, tables } => println!("Saved {tables} tables into '{schema}'"),
            })
            .await
        };
        db.close().await;
        result
    }

    pub async fn update(&self, select: &SelectArgs, dry_run: bool) -> Result<()> {
        let Some(selection) = select.selection() else {
            println!("{NO_SELECTOR}");
            return Ok(());
        };
        let destination = self.destination()?;
        let db = self.database().await?;
        let repo = Repository::from(&db);
        let result = self.update_from(&repo, &destination, &selection, dry_run).await;
        db.close().await;
        result
    }

    async fn update_from(
        &self,
        repo: &Repository,
        destination: &Identifier,
        selection: &Selection,
        dry_run: bool,
    ) -> Result<()> {
        let schemas = repo.list_schemas(destination).await.or_raise(|| ErrorKind::Database)?;
        let sources: Vec<Identifier> = selection.pick(&schemas)?.into_iter().map(|schema| schema.name.clone()).collect();
        let events = update(repo, &sources, destination, dry_run);
        pin_mut!(events);
        report(events, |event| match event {
            UpdateEvent::Started { destination, sources } => {
                println!("Updating '{destination}' from {sources} schemas");
            },
            UpdateEvent::Table(table) => println!("{table}"),
            UpdateEvent::Complete { summary, committed: true } => println!("Done: {summary}"),
            UpdateEvent::Complete { summary, committed: false } => {
                println!("Dry run, nothing saved: {summary}");
            },
        })
        .await
    }
}

/// Drain a run's event stream, handing every event to `show`.
///
/// The first error ends the run; the library has already rolled it back.
async fn report<E, S>(mut events: S, mut show: impl FnMut(E)) -> Result<()>
where
    S: futures::Stream<Item = iradio_library::error::Result<E>> + Unpin,
{
    while let Some(event) = events.next().await {
        show(event.or_raise(|| ErrorKind::Run)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use iradio_library::error::ErrorKind as LibraryErrorKind;

    fn ident(name: &str) -> Identifier {
        Identifier::new(name).unwrap()
    }

    #[tokio::test]
    async fn test_report_shows_every_event() {
        let events = stream::iter(vec![Ok(1), Ok(2), Ok(3)]);
        let mut shown = Vec::new();
        report(events, |event| shown.push(event)).await.unwrap();
        assert_eq!(shown, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_report_stops_at_first_error() {
        let events = stream::iter(vec![
            Ok(1),
            Err(exn::Exn::from(LibraryErrorKind::Store)),
            Ok(2),
        ]);
        let mut shown = Vec::new();
        let err = report(events, |event| shown.push(event)).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Run));
        assert_eq!(shown, vec![1]);
    }

    #[tokio::test]
    async fn test_update_from_copies_snapshot_tables() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        let snapshot = ident("2026-Oct-19 14:05");
        let mut batch = repo.begin().await.unwrap();
        batch.create_schema(&snapshot).await.unwrap();
        batch.write_table(&snapshot, &ident("Rock"), &[]).await.unwrap();
        batch.commit().await.unwrap();

        let app = App::new(Config::default());
        let destination = ident("public");
        app.update_from(&repo, &destination, &Selection::One(0), true).await.unwrap();
        assert!(repo.get_schema(&destination).await.unwrap().is_none());

        app.update_from(&repo, &destination, &Selection::One(0), false).await.unwrap();
        assert_eq!(repo.list_tables(&destination).await.unwrap(), vec![ident("Rock")]);
        db.close().await;
    }

    #[tokio::test]
    async fn test_update_from_without_snapshots() {
        let db = Database::connect_in_memory().await.unwrap();
        let repo = Repository::from(&db);
        let app = App::new(Config::default());
        let err = app.update_from(&repo, &ident("public"), &Selection::All, false).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NothingToSelect));
        db.close().await;
    }
}
