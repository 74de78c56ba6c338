use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::BufRead;

/// Read the stream URL out of an M3U playlist.
///
/// The stream URL is the first entry line. Blank lines and `#` directives
/// (such as the `#EXTM3U` header of extended playlists) are skipped, and the
/// line ending is stripped.
pub fn stream_url(reader: impl BufRead) -> Result<String> {
    for line in reader.lines() {
        let line = line.or_raise(|| ErrorKind::Io)?;
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        return Ok(entry.to_string());
    }
    exn::bail!(ErrorKind::EmptyPlaylist)
}
