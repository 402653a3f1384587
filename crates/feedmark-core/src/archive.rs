use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Line-oriented record of item GUIDs that were already handled.
#[derive(Clone, Debug)]
pub struct Archive {
    path: PathBuf,
    seen: HashSet<String>,
    // The file does not end in a newline, so the next append needs one first.
    unterminated: bool,
}

impl Archive {
    /// Reads the archive at `path`. A missing file is an empty archive.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(source) => return Err(Error::Archive { path, source }),
        };
        let seen = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        let unterminated = !contents.is_empty() && !contents.ends_with('\n');
        Ok(Self {
            path,
            seen,
            unterminated,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, guid: &str) -> bool {
        self.seen.contains(guid)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Appends `guid` to the file right away so a crash mid-run keeps
    /// what was already delivered.
    pub fn record(&mut self, guid: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;
        if self.unterminated {
            writeln!(file).map_err(|source| self.io_error(source))?;
            self.unterminated = false;
        }
        writeln!(file, "{guid}").map_err(|source| self.io_error(source))?;
        self.seen.insert(guid.to_string());
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> Error {
        Error::Archive {
            path: self.path.clone(),
            source,
        }
    }
}
