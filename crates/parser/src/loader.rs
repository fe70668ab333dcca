//! Content loading with a single decoding fallback.
//!
//! Files are read as raw bytes and classified before any decode attempt:
//! a NUL byte marks the file as binary and it is skipped without decoding.
//! Text decodes as UTF-8 first; anything that is not valid UTF-8 falls back
//! to Latin-1, which maps every byte, so the fallback path cannot fail.

use crate::error::LoadError;
use std::path::Path;

/// Read and decode a file to text.
///
/// # Errors
///
/// - [`LoadError::Unreadable`] if the file cannot be opened or read
/// - [`LoadError::Binary`] if the raw bytes contain a NUL byte
/// - [`LoadError::Undecodable`] is reserved for byte streams no supported
///   decoding accepts; with the Latin-1 fallback in place `load` itself
///   never produces it
pub fn load(path: impl AsRef<Path>) -> Result<String, LoadError> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).map_err(|e| LoadError::unreadable(path.to_path_buf(), e))?;
    decode(bytes, path)
}

fn decode(bytes: Vec<u8>, path: &Path) -> Result<String, LoadError> {
    if bytes.contains(&0) {
        return Err(LoadError::Binary(path.to_path_buf()));
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            log::debug!(
                "{} is not valid UTF-8, falling back to Latin-1",
                path.display()
            );
            Ok(decode_latin1(err.as_bytes()))
        }
    }
}

/// Latin-1 maps each byte to the Unicode code point of the same value.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
