//! Pattern buffer with efficient tail-search optimization.
//!
//! Only the last N bytes of accumulated output are searched for prompt
//! patterns, so large command outputs (full routing tables) stay cheap to
//! scan. Incoming data is stripped of ANSI escape sequences before it is
//! buffered; the VT parser is persistent, so sequences split across read
//! chunks are still removed.

use std::fmt;

use bytes::{Bytes, BytesMut};
use memchr::memchr;
use regex::bytes::Regex;
use vte::{Params, Parser, Perform};

/// Buffer for accumulating device output and searching it for prompts.
pub struct PatternBuffer {
    /// The accumulated, ANSI-stripped output.
    data: BytesMut,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,

    /// Persistent VT parser state for escape stripping.
    ansi: Parser,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(4096),
            search_depth,
            ansi: Parser::new(),
        }
    }

    /// Append new data, stripping ANSI escape sequences.
    pub fn extend(&mut self, chunk: &[u8]) {
        let mut sink = PlainText(&mut self.data);
        self.ansi.advance(&mut sink, chunk);
    }

    /// Check whether the tail of the buffer matches the pattern.
    pub fn tail_contains(&self, pattern: &Regex) -> bool {
        let start = self.data.len().saturating_sub(self.search_depth);
        pattern.is_match(&self.data[start..])
    }

    /// Find the first occurrence of a single byte anywhere in the buffer.
    pub fn find_byte(&self, needle: u8) -> Option<usize> {
        memchr(needle, &self.data)
    }

    /// Take everything buffered so far.
    pub fn take(&mut self) -> Bytes {
        self.data.split().freeze()
    }

    /// Take the buffer contents up to and including `index`, leaving the
    /// remainder in place for the next read.
    pub fn take_through(&mut self, index: usize) -> Bytes {
        self.data.split_to(index + 1).freeze()
    }

    /// Current buffer length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("len", &self.data.len())
            .field("search_depth", &self.search_depth)
            .finish()
    }
}

/// vte sink that keeps printable text and line-shaping controls, dropping
/// every escape sequence.
struct PlainText<'a>(&'a mut BytesMut);

impl Perform for PlainText<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.0.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.0.extend_from_slice(&[byte]);
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

    fn csi_dispatch(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {}
}
