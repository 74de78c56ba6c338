use derive_more::Display;

/// A station row as it appears on a category page, before its playlist has
/// been resolved into a stream URL.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("{name} ({playlist})")]
pub struct Listing {
    pub name: String,
    /// Playlist location exactly as found in the page, usually root-relative
    /// (`/servers/tools/playlistgenerator/?u=...`).
    pub playlist: String,
}
impl<N: Into<String>, P: Into<String>> From<(N, P)> for Listing {
    fn from((name, playlist): (N, P)) -> Self {
        Self { name: name.into(), playlist: playlist.into() }
    }
}
