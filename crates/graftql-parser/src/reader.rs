//! Source readers for schema locators
//!
//! A locator is an opaque string meaningful to [`discover`]: the stdin
//! sentinel `-`, an `http://`/`https://` URL, or a filesystem path. Readers
//! return raw bytes; decoding and locator wrapping happen in
//! [`read_schemas`](crate::read_schemas).

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// One way of obtaining raw schema bytes.
pub trait SourceReader {
    fn read(&self) -> io::Result<Vec<u8>>;
}

/// Pick the reader for a locator.
pub fn discover(locator: &str) -> Box<dyn SourceReader> {
    if locator == "-" {
        Box::new(StdinReader)
    } else if locator.starts_with("http://") || locator.starts_with("https://") {
        Box::new(UrlReader {
            url: locator.to_string(),
        })
    } else {
        Box::new(FileReader {
            path: PathBuf::from(locator),
        })
    }
}

struct FileReader {
    path: PathBuf,
}

impl SourceReader for FileReader {
    fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

struct StdinReader;

impl SourceReader for StdinReader {
    fn read(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    }
}

struct UrlReader {
    url: String,
}

impl SourceReader for UrlReader {
    fn read(&self) -> io::Result<Vec<u8>> {
        let response = reqwest::blocking::get(&self.url)
            .and_then(|r| r.error_for_status())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let bytes = response
            .bytes()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(bytes.to_vec())
    }
}
