//! TYPE A line-ending conversion. Both directions keep state between chunks
//! so a CR/LF pair split across two reads is still handled.

/// LF -> CRLF, for data leaving the server. Existing CRLF pairs are kept.
#[derive(Debug, Default)]
pub struct AsciiEncoder {
    last_was_cr: bool,
}

impl AsciiEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&mut self, input: &[u8], output: &mut Vec<u8>) {
        output.reserve(input.len());
        for &byte in input {
            if byte == b'\n' && !self.last_was_cr {
                output.push(b'\r');
            }
            output.push(byte);
            self.last_was_cr = byte == b'\r';
        }
    }
}

/// CRLF -> LF, for data arriving at the server. A lone CR is kept.
#[derive(Debug, Default)]
pub struct AsciiDecoder {
    pending_cr: bool,
}

impl AsciiDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, input: &[u8], output: &mut Vec<u8>) {
        output.reserve(input.len());
        for &byte in input {
            if self.pending_cr {
                self.pending_cr = false;
                if byte != b'\n' {
                    output.push(b'\r');
                }
            }
            if byte == b'\r' {
                self.pending_cr = true;
            } else {
                output.push(byte);
            }
        }
    }

    /// Emits a CR held back at the end of the last chunk.
    pub fn finish(&mut self, output: &mut Vec<u8>) {
        if std::mem::take(&mut self.pending_cr) {
            output.push(b'\r');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_chunks(chunks: &[&[u8]]) -> Vec<u8> {
        let mut encoder = AsciiEncoder::new();
        let mut output = Vec::new();
        for chunk in chunks {
            encoder.encode(chunk, &mut output);
        }
        output
    }

    fn decode_chunks(chunks: &[&[u8]]) -> Vec<u8> {
        let mut decoder = AsciiDecoder::new();
        let mut output = Vec::new();
        for chunk in chunks {
            decoder.decode(chunk, &mut output);
        }
        decoder.finish(&mut output);
        output
    }

    #[test]
    fn encoder_adds_carriage_returns() {
        assert_eq!(encode_chunks(&[b"a\nb\n"]), b"a\r\nb\r\n");
        assert_eq!(encode_chunks(&[b"a\r\nb"]), b"a\r\nb");
    }

    #[test]
    fn encoder_handles_split_pairs() {
        assert_eq!(encode_chunks(&[b"a\r", b"\nb"]), b"a\r\nb");
        assert_eq!(encode_chunks(&[b"a", b"\n"]), b"a\r\n");
    }

    #[test]
    fn decoder_strips_carriage_returns() {
        assert_eq!(decode_chunks(&[b"a\r\nb\r\n"]), b"a\nb\n");
        assert_eq!(decode_chunks(&[b"a\r", b"\nb"]), b"a\nb");
    }

    #[test]
    fn decoder_keeps_lone_carriage_returns() {
        assert_eq!(decode_chunks(&[b"a\rb"]), b"a\rb");
        assert_eq!(decode_chunks(&[b"a\r", b"b"]), b"a\rb");
        assert_eq!(decode_chunks(&[b"end\r"]), b"end\r");
    }
}
