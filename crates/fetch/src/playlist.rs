//! Resolution of downloaded playlists into stream URLs.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::{BufReader, Seek, SeekFrom, Write};
use std::path::Path;

/// Spool a playlist body into a uniquely named temporary file and read the
/// stream URL back from it.
///
/// The file is removed when this returns, whatever the outcome.
pub(crate) fn stream_url(body: &[u8]) -> Result<String> {
    stream_url_in(body, &std::env::temp_dir())
}

fn stream_url_in(body: &[u8], dir: &Path) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("iradio-")
        .suffix(".m3u")
        .tempfile_in(dir)
        .or_raise(|| ErrorKind::Io)?;
    file.write_all(body).or_raise(|| ErrorKind::Io)?;
    file.flush().or_raise(|| ErrorKind::Io)?;
    file.as_file_mut().seek(SeekFrom::Start(0)).or_raise(|| ErrorKind::Io)?;
    iradio_extract::stream_url(BufReader::new(file.as_file())).or_raise(|| ErrorKind::Playlist)
}
