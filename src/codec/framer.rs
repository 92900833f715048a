// Copyright (c) 2024 Mike Tsao

use log::warn;

/// A partial line longer than this is assumed to be garbage and discarded.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Reassembles newline-terminated lines from arbitrarily split chunks of
/// inbound bytes. A chunk may end mid-line, or even mid-character; the tail
/// waits for the next chunk.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: Vec<u8>,
    // Set after an oversized line was dropped, until its terminator shows up.
    discarding: bool,
}
impl LineFramer {
    /// Adds a chunk and returns every line it completed, without terminators.
    /// Blank lines are dropped.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::default();
        let mut rest = chunk;
        while let Some(newline) = rest.iter().position(|&b| b == b'\n') {
            let (head, tail) = rest.split_at(newline);
            rest = &tail[1..];
            if self.discarding {
                self.discarding = false;
                continue;
            }
            self.pending.extend_from_slice(head);
            let line = String::from_utf8_lossy(&self.pending)
                .trim_end_matches('\r')
                .to_string();
            self.pending.clear();
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        if !self.discarding {
            self.pending.extend_from_slice(rest);
            if self.pending.len() > MAX_LINE_LENGTH {
                warn!(
                    "discarding a {}-byte line with no terminator",
                    self.pending.len()
                );
                self.pending.clear();
                self.discarding = true;
            }
        }
        lines
    }

    /// Forgets any partial line, e.g. after the connection drops.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.discarding = false;
    }

    /// How many bytes are waiting for a terminator.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
