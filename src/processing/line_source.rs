//! Streaming access to the lines of a gzip-compressed file.
//!
//! The file is never loaded whole: bytes flow from the file handle through
//! an explicit read buffer into the decoder, and from the decoder through a
//! second buffer that is split on newlines as the consumer pulls.

use flate2::bufread::GzDecoder;
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::core::error::{Result, SweepError};

/// Lazy, single-pass sequence of the lines in one gzip file.
///
/// Dropping the value releases the decoder, both buffers and the file
/// handle. To read the file again, open a new source.
pub struct LineSource {
    reader: BufReader<GzipMembers>,
    file_name: String,
    buf: Vec<u8>,
    finished: bool,
}

impl LineSource {
    /// Open `path` and decode its first block.
    ///
    /// Missing files, zero-byte files and invalid gzip headers are reported
    /// here as [`SweepError::Decode`], before any line is produced.
    pub fn open(path: &Path) -> Result<Self> {
        let file_name = display_name(path);

        let file = File::open(path).map_err(|e| SweepError::decode(&file_name, e))?;
        let metadata = file
            .metadata()
            .map_err(|e| SweepError::decode(&file_name, e))?;
        if metadata.len() == 0 {
            return Err(SweepError::decode(
                &file_name,
                io::Error::new(io::ErrorKind::UnexpectedEof, "empty file has no gzip header"),
            ));
        }

        let mut reader = BufReader::new(GzipMembers::new(BufReader::new(file)));
        reader
            .fill_buf()
            .map_err(|e| SweepError::decode(&file_name, e))?;

        debug!("Opened line source for {file_name}");
        Ok(Self {
            reader,
            file_name,
            buf: Vec::new(),
            finished: false,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl Iterator for LineSource {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.finished = true;
                None
            }
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(SweepError::decode(&self.file_name, e)))
            }
        }
    }
}

impl Drop for LineSource {
    fn drop(&mut self) {
        debug!("Closed line source for {}", self.file_name);
    }
}

/// Decodes concatenated gzip members as one stream.
///
/// Once a member has ended, bytes that do not start a valid header (zero
/// padding, trailing garbage) end the stream instead of failing it.
struct GzipMembers {
    decoder: Option<GzDecoder<BufReader<File>>>,
    completed: usize,
}

impl GzipMembers {
    fn new(input: BufReader<File>) -> Self {
        Self {
            decoder: Some(GzDecoder::new(input)),
            completed: 0,
        }
    }

    /// Move past a finished member, starting the next one if bytes remain.
    fn next_member(&mut self) -> io::Result<()> {
        self.completed += 1;
        if let Some(decoder) = self.decoder.take() {
            let mut input = decoder.into_inner();
            if !input.fill_buf()?.is_empty() {
                self.decoder = Some(GzDecoder::new(input));
            }
        }
        Ok(())
    }
}

impl Read for GzipMembers {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            let Some(decoder) = self.decoder.as_mut() else {
                return Ok(0);
            };

            match decoder.read(buf) {
                Ok(0) => self.next_member()?,
                Err(e) if self.completed > 0 && decoder.header().is_none() => {
                    debug!("Ignoring trailing bytes after gzip member {}: {e}", self.completed);
                    self.decoder = None;
                }
                other => return other,
            }
        }
    }
}

/// File name used in reports, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
