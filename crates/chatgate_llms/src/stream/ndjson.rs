//! Newline-delimited JSON decoding: every complete line is one object.

use super::{ChunkParser, Decoded, Decoder, LineBuffer, parse_payload};

pub struct NdjsonDecoder<P> {
    lines: LineBuffer,
    parser: P,
    payloads: usize,
    done: bool,
}

impl<P: ChunkParser> NdjsonDecoder<P> {
    pub fn new(parser: P) -> Self {
        Self {
            lines: LineBuffer::new(),
            parser,
            payloads: 0,
            done: false,
        }
    }

    fn decode_line(&mut self, line: &str, out: &mut Vec<Decoded>) {
        let line = line.trim();
        if self.done || line.is_empty() {
            return;
        }
        if let Some(done) = parse_payload(&self.parser, line, out) {
            self.payloads += 1;
            self.done = done;
        }
    }
}

impl<P: ChunkParser> Decoder for NdjsonDecoder<P> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::test_support::{TextField, fragments};

    #[test]
    fn test_object_split_across_reads() {
        let mut decoder = NdjsonDecoder::new(TextField);
        assert!(decoder.feed(b"{\"t\":\"The").is_empty());
        assert_eq!(
            decoder.feed(b" answer\"}\n{\"t\":\" is 4\"}\n"),
            vec![
                Decoded::Fragment("The answer".into()),
                Decoded::Fragment(" is 4".into()),
            ]
        );
    }

    #[test]
    fn test_malformed_lines_skipped_and_done_flag_stops() {
        let mut decoder = NdjsonDecoder::new(TextField);
        let out = decoder.feed(b"{\"t\":\"a\"}\n{oops\n\n{\"t\":\"\",\"end\":true}\n{\"t\":\"late\"}\n");
        assert_eq!(out, vec![Decoded::Fragment("a".into()), Decoded::Done]);
        assert!(decoder.finish().is_empty());
        assert_eq!(decoder.payloads(), 2);
    }

    #[test]
    fn test_trailing_object_without_newline_is_parsed() {
        let mut decoder = NdjsonDecoder::new(TextField);
        let mut out = decoder.feed(b"{\"t\":\"x\"}\n{\"t\":\"y\",\"end\":true}");
        out.extend(decoder.finish());
        assert_eq!(fragments(&out), vec!["x", "y"]);
        assert_eq!(out.last(), Some(&Decoded::Done));
    }

    #[test]
    fn test_data_prefix_is_not_stripped() {
        let mut decoder = NdjsonDecoder::new(TextField);
        assert!(decoder.feed(b"data: {\"t\":\"x\"}\n").is_empty());
    }
}
