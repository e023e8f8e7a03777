use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::normalize::LineNormalizer;

/// Something records can be read from: a file or any other reader.
///
/// Line endings are normalized as the data is read, so nothing downstream
/// ever sees a carriage return used as a line terminator.
pub struct ReaderSource {
    reader: BufReader<LineNormalizer<Box<dyn Read>>>,
    path: Option<PathBuf>,
}

impl ReaderSource {
    pub fn from_reader<R: Read + 'static>(reader: R) -> ReaderSource {
        ReaderSource {
            reader: BufReader::new(LineNormalizer::new(Box::new(reader))),
            path: None,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<ReaderSource> {
        let file = File::open(&path)?;
        let mut source = ReaderSource::from_reader(file);

        source.path = Some(path.as_ref().to_path_buf());

        Ok(source)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn into_reader(self) -> BufReader<LineNormalizer<Box<dyn Read>>> {
        self.reader
    }
}

impl<'a> From<&'a str> for ReaderSource {
    /// Reads from an in-memory string.
    fn from(data: &'a str) -> ReaderSource {
        ReaderSource::from_reader(std::io::Cursor::new(data.as_bytes().to_vec()))
    }
}
