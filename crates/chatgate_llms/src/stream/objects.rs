//! Decoding of a bare sequence of JSON objects.
//!
//! Objects are delimited by brace depth rather than by line, so the same
//! decoder reads newline-delimited JSON and a JSON array whose elements are
//! pretty-printed across many lines. Bytes between top-level objects
//! (whitespace, `[`, `,`, `]`) are ignored.

use super::{ChunkParser, Decoded, Decoder, parse_payload};

pub struct ObjectStreamDecoder<P> {
    parser: P,
    /// Bytes of the object being assembled, from its opening brace.
    object: Vec<u8>,
    depth: usize,
    in_string: bool,
    escaped: bool,
    payloads: usize,
    done: bool,
}

impl<P: ChunkParser> ObjectStreamDecoder<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            object: Vec::new(),
            depth: 0,
            in_string: false,
            escaped: false,
            payloads: 0,
            done: false,
        }
    }

    /// Advance by one byte. Returns the completed object, if this byte
    /// closed one.
    fn step(&mut self, byte: u8) -> Option<Vec<u8>> {
        if self.depth == 0 {
            if byte == b'{' {
                self.object.clear();
                self.object.push(byte);
                self.depth = 1;
            }
            return None;
        }

        self.object.push(byte);
        if self.in_string {
            match byte {
                _ if self.escaped => self.escaped = false,
                b'\\' => self.escaped = true,
                b'"' => self.in_string = false,
                _ => {}
            }
            return None;
        }

        match byte {
            b'"' => self.in_string = true,
            b'{' | b'[' => self.depth += 1,
            b'}' | b']' => {
                self.depth -= 1;
                if self.depth == 0 {
                    return Some(std::mem::take(&mut self.object));
                }
            }
            _ => {}
        }
        None
    }

    fn decode_object(&mut self, object: &[u8], out: &mut Vec<Decoded>) {
        let Ok(text) = std::str::from_utf8(object) else {
            tracing::trace!("Skipping stream object that is not UTF-8");
            return;
        };
        if let Some(done) = parse_payload(&self.parser, text, out) {
            self.payloads += 1;
            self.done = done;
        }
    }
}

impl<P: ChunkParser> Decoder for ObjectStreamDecoder<P> {
    fn feed(&mut self, bytes: &[u8]) -> Vec<Decoded> {
        let mut out = Vec::new();
        for &byte in bytes {
            if self.done {
                break;
            }
            if let Some(object) = self.step(byte) {
                self.decode_object(&object, &mut out);
            }
        }
        out
    }

    fn finish(&mut self) -> Vec<Decoded> {
        if self.depth > 0 && !self.done {
            tracing::trace!(
                bytes = self.object.len(),
                "Discarding unterminated stream object"
            );
        }
        self.object.clear();
        self.depth = 0;
        Vec::new()
    }

    fn payloads(&self) -> usize {
        self.payloads
    }
}
