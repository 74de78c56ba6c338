use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("could not set up logging")]
    Logging,
    #[display("configuration error")]
    Config,
    #[display("could not open the database")]
    Database,
    #[display("could not read from the radio directory")]
    Directory,
    #[display("index {index} is out of range, expected 0 to {}", len.saturating_sub(1))]
    OutOfRange { index: usize, len: usize },
    #[display("nothing to select from")]
    NothingToSelect,
    #[display("run failed, no changes were made")]
    Run,
}
