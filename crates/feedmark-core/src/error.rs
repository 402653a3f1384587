use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading feeds or the delivery archive.
///
/// Markup conversion itself never fails and has no variant here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("feed is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("feed has no <channel> element")]
    MissingChannel,

    #[error("feed item {item} has no <{field}>")]
    MissingField { item: usize, field: &'static str },

    #[error("invalid publication date {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("archive {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
