//! Event-stream decoding.
//!
//! Only `data:` lines are considered. `event:`, `id:`, comment lines and
//! blank separators are ignored, as are data values that fail to parse.

use super::{ChunkParser, Decoded, Decoder, LineBuffer, parse_payload};

pub struct EventStreamDecoder<P> {
    lines: LineBuffer,
    parser: P,
    payloads: usize,
    done: bool,
}

impl<P: ChunkParser> EventStreamDecoder<P> {
    pub fn new(parser: P) -> Self {
        Self {
            lines: LineBuffer::new(),
            parser,
            payloads: 0,
            done: false,
        }
    }

    fn decode_line(&mut self, line: &str, out: &mut Vec<Decoded>) {
        if self.done {
            return;
        }
        let Some(data) = line.strip_prefix("data:") else {
            return;
        };
        let data = data.strip_prefix(' ').unwrap_or(data).trim_end();
        if data.is_empty() {
            return;
        }

        if self.parser.is_sentinel(data) {
            self.payloads += 1;
            self.done = true;
            out.push(Decoded::Done);
            return;
        }
        if let Some(done) = parse_payload(&self.parser, data, out) {
            self.payloads += 1;
            self.done = done;
        }
    }
}

impl<P: ChunkParser> Decoder for EventStreamDecoder<P> {
    fn feed(&mut self, bytes: &[u8]) -> Vec<Decoded> {
        let mut out = Vec::new();
        for line in self.lines.push(bytes) {
            self.decode_line(&line, &mut out);
        }
        out
    }

    fn finish(&mut self) -> Vec<Decoded> {
        let mut out = Vec::new();
        if let Some(line) = self.lines.finish() {
            self.decode_line(&line, &mut out);
        }
        out
    }

    fn payloads(&self) -> usize {
        self.payloads
    }
}
