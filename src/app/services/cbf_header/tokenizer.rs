//! Header region tokenizer
//!
//! Splits the text header of a CBF file into key/value entries. The header
//! lives in a CIF text field opened and closed by lines holding a single `;`:
//!
//! ```text
//! ###CBF: VERSION 1.5, CBFlib v0.7.8 - SLS/DECTRIS PILATUS detectors
//! _array_data.header_convention "SLS_1.0"
//! _array_data.header_contents
//! ;
//! # Detector: PILATUS 6M-F, S/N 60-0108-F, SLS
//! # 2011-06-22T11:58:09.478
//! # Silicon sensor, thickness 0.000320 m
//! # Wavelength 0.97780 A
//! ;
//! ```
//!
//! Tokenizing stops at the closing delimiter, at the binary section, or when
//! the configured byte budget is spent, so the image payload is never read.
//! The `###CBF:` marker is only accepted within the same leading window the
//! validator sniffs; only lines inside the text field become entries.

use crate::app::models::RawHeaderEntry;
use super::validator::contains_magic;
use crate::constants::{
    ARRAY_DATA_ITEM, BINARY_SECTION_MARKER, DEFAULT_SNIFF_BYTES, HEADER_LINE_PREFIX,
    SENSOR_THICKNESS_KEY, TEXT_FIELD_DELIMITER, TIMESTAMP_KEY,
};
use crate::{Error, Result};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Take};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, trace};

static SENSOR_LINE: OnceLock<Regex> = OnceLock::new();
static TIMESTAMP_LINE: OnceLock<Regex> = OnceLock::new();
static KEY_VALUE_LINE: OnceLock<Regex> = OnceLock::new();

/// `Silicon sensor, thickness 0.000320 m`
fn sensor_regex() -> &'static Regex {
    SENSOR_LINE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9-]*\s+sensor,\s*thickness\s+(?P<value>\S.*)$")
            .expect("Invalid sensor line pattern")
    })
}

/// `2011-06-22T11:58:09.478`
fn timestamp_regex() -> &'static Regex {
    TIMESTAMP_LINE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?$")
            .expect("Invalid timestamp line pattern")
    })
}

/// `Key value`, `Key: value` or `Key = value`
fn key_value_regex() -> &'static Regex {
    KEY_VALUE_LINE.get_or_init(|| {
        Regex::new(r"^(?P<key>[A-Za-z][A-Za-z0-9_]*)\s*[:=]?\s*(?P<value>.*)$")
            .expect("Invalid key/value line pattern")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenizerState {
    /// Skipping lines until the `###CBF:` marker
    AwaitingMagic,
    /// Between the marker and the opening `;`
    Preamble,
    /// Inside the header text field
    Contents,
    Finished,
}

/// Lazy, single-pass iterator over the header entries of one file
///
/// The tokenizer owns its reader; dropping it releases the file handle.
/// I/O failures are yielded once as `Err` and end the iteration.
#[derive(Debug)]
pub struct HeaderTokenizer<R> {
    reader: Take<R>,
    state: TokenizerState,
    line_number: usize,
    buffer: Vec<u8>,
    /// Leading bytes that must contain the marker
    magic_window: usize,
    bytes_consumed: usize,
}

impl HeaderTokenizer<BufReader<File>> {
    /// Open a file for tokenizing, scanning at most `max_header_bytes`
    pub fn open(path: &Path, max_header_bytes: usize) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;

        Ok(Self::new(BufReader::new(file), max_header_bytes))
    }
}

impl<R: BufRead> HeaderTokenizer<R> {
    pub fn new(reader: R, max_header_bytes: usize) -> Self {
        Self {
            reader: reader.take(max_header_bytes as u64),
            state: TokenizerState::AwaitingMagic,
            line_number: 0,
            buffer: Vec::new(),
            magic_window: DEFAULT_SNIFF_BYTES,
            bytes_consumed: 0,
        }
    }

    /// Require the `###CBF:` marker within the first `window` bytes
    pub fn with_magic_window(mut self, window: usize) -> Self {
        self.magic_window = window;
        self
    }

    /// Number of lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    /// True once the end of the header (or of the input) has been reached
    pub fn is_finished(&self) -> bool {
        self.state == TokenizerState::Finished
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buffer)
            .map_err(|e| Error::io("Failed to read header line", e))?;

        if read == 0 {
            return Ok(None);
        }
        self.bytes_consumed += read;

        // A line cut off by the byte budget would yield a truncated value
        if self.reader.limit() == 0 && !self.buffer.ends_with(b"\n") {
            debug!("Header scan budget exhausted at line {}", self.line_number + 1);
            return Ok(None);
        }

        self.line_number += 1;
        let line = String::from_utf8_lossy(&self.buffer);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn process_line(&mut self, line: &str) -> Option<RawHeaderEntry> {
        let trimmed = line.trim();

        match self.state {
            TokenizerState::AwaitingMagic => {
                self.await_magic();
                return None;
            }
            TokenizerState::Finished => return None,
            TokenizerState::Preamble | TokenizerState::Contents => {}
        }

        if trimmed.starts_with(BINARY_SECTION_MARKER) || trimmed.starts_with(ARRAY_DATA_ITEM) {
            debug!("Header ended at line {} (data section)", self.line_number);
            self.state = TokenizerState::Finished;
            return None;
        }

        if trimmed == TEXT_FIELD_DELIMITER {
            self.state = match self.state {
                TokenizerState::Preamble => TokenizerState::Contents,
                _ => {
                    debug!("Header ended at line {}", self.line_number);
                    TokenizerState::Finished
                }
            };
            return None;
        }

        if self.state != TokenizerState::Contents {
            return None;
        }

        parse_header_line(trimmed, self.line_number)
    }

    /// Look for the marker in the part of the current line inside the window
    fn await_magic(&mut self) {
        let line_start = self.bytes_consumed - self.buffer.len();
        let visible = self
            .magic_window
            .saturating_sub(line_start)
            .min(self.buffer.len());

        if contains_magic(&self.buffer[..visible]) {
            self.state = TokenizerState::Preamble;
        } else if self.bytes_consumed >= self.magic_window {
            debug!(
                "No CBF marker within the first {} bytes",
                self.magic_window
            );
            self.state = TokenizerState::Finished;
        }
    }
}

impl<R: BufRead> Iterator for HeaderTokenizer<R> {
    type Item = Result<RawHeaderEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.state != TokenizerState::Finished {
            let line = match self.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    if self.state != TokenizerState::AwaitingMagic {
                        debug!(
                            "Input exhausted after {} lines without an end-of-header marker",
                            self.line_number
                        );
                    }
                    self.state = TokenizerState::Finished;
                    return None;
                }
                Err(e) => {
                    self.state = TokenizerState::Finished;
                    return Some(Err(e));
                }
            };

            if let Some(entry) = self.process_line(&line) {
                return Some(Ok(entry));
            }
        }

        None
    }
}

/// Split one header line into a key and value
///
/// Returns `None` for lines that do not carry a key/value pair: CIF items,
/// `##` comments, bare `#` lines, and keys without a value.
pub fn parse_header_line(line: &str, line_number: usize) -> Option<RawHeaderEntry> {
    let body = line.trim().strip_prefix(HEADER_LINE_PREFIX)?;
    if body.starts_with(HEADER_LINE_PREFIX) {
        return None;
    }
    let body = body.trim();

    if let Some(captures) = sensor_regex().captures(body) {
        return Some(RawHeaderEntry::new(
            SENSOR_THICKNESS_KEY,
            captures["value"].trim(),
            line_number,
        ));
    }

    if timestamp_regex().is_match(body) {
        return Some(RawHeaderEntry::new(TIMESTAMP_KEY, body, line_number));
    }

    let captures = key_value_regex().captures(body)?;
    let value = captures["value"].trim();
    if value.is_empty() {
        trace!("Skipping key without value at line {}: {}", line_number, body);
        return None;
    }

    Some(RawHeaderEntry::new(&captures["key"], value, line_number))
}
