//! Character stream source.
//!
//! Reads a file in fixed-size pieces and decodes each piece into text under
//! one of the supported [`Encoding`]s.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::error::{ImportError, Result};

/// Default read size.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Text encoding used to turn file bytes into characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// UTF-8. Malformed sequences decode to U+FFFD.
    #[default]
    Utf8,
    /// UTF-16 little endian (also accepted as `ucs2`).
    Utf16Le,
    /// ISO-8859-1, one char per byte.
    Latin1,
    /// 7-bit ASCII; the high bit of every byte is dropped.
    Ascii,
    /// The base64 text of the raw bytes.
    Base64,
    /// The lowercase hex text of the raw bytes.
    Hex,
}

impl Encoding {
    /// Canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Utf16Le => "utf16le",
            Self::Latin1 => "latin1",
            Self::Ascii => "ascii",
            Self::Base64 => "base64",
            Self::Hex => "hex",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "ucs2" | "ucs-2" | "utf16le" | "utf-16le" => Ok(Self::Utf16Le),
            "latin1" | "binary" => Ok(Self::Latin1),
            "ascii" => Ok(Self::Ascii),
            "base64" => Ok(Self::Base64),
            "hex" => Ok(Self::Hex),
            _ => Err(ImportError::UnsupportedEncoding(s.to_string())),
        }
    }
}

/// Stateful decoder. Bytes that cannot be decoded yet (a split UTF-8
/// sequence, half a UTF-16 unit, an incomplete base64 group) are held back
/// until the next call.
#[derive(Debug, Clone)]
pub struct ChunkDecoder {
    encoding: Encoding,
    pending: Vec<u8>,
}

impl ChunkDecoder {
    /// Creates a decoder for `encoding`.
    #[must_use]
    pub const fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            pending: Vec::new(),
        }
    }

    /// Decodes the next piece of input.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        match self.encoding {
            Encoding::Utf8 => {
                self.pending.extend_from_slice(bytes);
                self.decode_utf8()
            }
            Encoding::Utf16Le => {
                self.pending.extend_from_slice(bytes);
                self.decode_utf16le()
            }
            Encoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Encoding::Ascii => bytes.iter().map(|&b| char::from(b & 0x7f)).collect(),
            Encoding::Base64 => {
                self.pending.extend_from_slice(bytes);
                let whole = self.pending.len() - self.pending.len() % 3;
                let text = STANDARD.encode(&self.pending[..whole]);
                self.pending.drain(..whole);
                text
            }
            Encoding::Hex => hex::encode(bytes),
        }
    }

    /// Flushes whatever is held back at end of input.
    pub fn finish(&mut self) -> String {
        let rest = std::mem::take(&mut self.pending);
        if rest.is_empty() {
            return String::new();
        }
        match self.encoding {
            Encoding::Base64 => STANDARD.encode(&rest),
            Encoding::Utf16Le => {
                let mut text: String = char::decode_utf16(
                    rest.chunks_exact(2)
                        .map(|pair| u16::from_le_bytes([pair[0], pair[1]])),
                )
                .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect();
                if rest.len() % 2 == 1 {
                    text.push(char::REPLACEMENT_CHARACTER);
                }
                text
            }
            _ => String::from_utf8_lossy(&rest).into_owned(),
        }
    }

    fn decode_utf8(&mut self) -> String {
        let mut text = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    text.push_str(valid);
                    self.pending.clear();
                    return text;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                        None => {
                            self.pending.drain(..valid);
                            return text;
                        }
                    }
                }
            }
        }
    }

    fn decode_utf16le(&mut self) -> String {
        let mut usable = self.pending.len() - self.pending.len() % 2;
        // Keep a trailing high surrogate until its pair arrives.
        if usable >= 2 {
            let last = u16::from_le_bytes([self.pending[usable - 2], self.pending[usable - 1]]);
            if (0xD800..=0xDBFF).contains(&last) {
                usable -= 2;
            }
        }

        let text = char::decode_utf16(
            self.pending[..usable]
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]])),
        )
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
        self.pending.drain(..usable);
        text
    }
}

/// A file opened as a stream of decoded text chunks.
#[derive(Debug)]
pub struct ChunkSource {
    path: PathBuf,
    file: File,
    decoder: ChunkDecoder,
    buf: Vec<u8>,
    done: bool,
}

impl ChunkSource {
    /// Opens `path` for reading in pieces of `chunk_size` bytes.
    pub async fn open(path: &Path, encoding: Encoding, chunk_size: usize) -> Result<Self> {
        let file = File::open(path)
            .await
            .map_err(|source| ImportError::FileAccess {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            decoder: ChunkDecoder::new(encoding),
            buf: vec![0; chunk_size.max(1)],
            done: false,
        })
    }

    /// Returns the next chunk of text, or `None` at end of file.
    pub async fn next_chunk(&mut self) -> Result<Option<String>> {
        while !self.done {
            let n = self
                .file
                .read(&mut self.buf)
                .await
                .map_err(|source| ImportError::Stream {
                    path: self.path.clone(),
                    source,
                })?;

            let text = if n == 0 {
                self.done = true;
                self.decoder.finish()
            } else {
                self.decoder.decode(&self.buf[..n])
            };

            if !text.is_empty() {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    /// The file being read.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
