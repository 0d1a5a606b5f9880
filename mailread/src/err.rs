use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while reading a message.
///
/// Malformed message content is never an error, only failures of the
/// underlying line source are.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{} - cannot open", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read line")]
    Read(#[source] io::Error),
}
