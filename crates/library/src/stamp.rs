use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use iradio_store::Identifier;
use time::UtcDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Snapshot schemas are named after the minute the run started, e.g.
/// `2026-Oct-19 14:05`.
pub const SNAPSHOT_NAME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month repr:short]-[day] [hour]:[minute]");

pub fn snapshot_name(at: UtcDateTime) -> Result<Identifier> {
    let name = at.format(SNAPSHOT_NAME_FORMAT).or_raise(|| ErrorKind::Stamp)?;
    Identifier::new(name).or_raise(|| ErrorKind::Stamp)
}
