//! Incremental text decoding and line splitting for chunked bodies.

/// UTF-8 decoder that keeps incomplete sequences across chunk boundaries.
///
/// Invalid bytes become U+FFFD, one replacement per maximal invalid subpart,
/// so a broken byte never aborts the stream.
#[derive(Debug, Default, Clone)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a decoder with no buffered bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk.
    ///
    /// A multi-byte character cut by the chunk boundary is held back and
    /// emitted once the rest of it arrives.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(chunk);

        let mut out = String::with_capacity(input.len());
        let mut rest: &[u8] = &input;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// End of input: an incomplete trailing sequence becomes one U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }

    /// Number of bytes waiting for the rest of their character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Accumulates decoded text and yields newline-terminated lines.
///
/// The text after the last `\n` stays buffered until more text arrives.
#[derive(Debug, Default, Clone)]
pub struct LineBuffer {
    partial: String,
}

impl LineBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text and return every line it completed, without the `\n`.
    pub fn push(&mut self, text: &str) -> Vec<String> {
        // Only the new text can hold a newline.
        let Some(offset) = text.rfind('\n') else {
            self.partial.push_str(text);
            return Vec::new();
        };
        let last_newline = self.partial.len() + offset;
        self.partial.push_str(text);

        let rest = self.partial.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.partial, rest);
        complete[..last_newline]
            .split('\n')
            .map(str::to_string)
            .collect()
    }

    /// Take the unterminated tail, if any.
    pub fn take_partial(&mut self) -> Option<String> {
        if self.partial.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.partial))
        }
    }

    /// The unterminated tail.
    pub fn partial(&self) -> &str {
        &self.partial
    }
}
