//! Line ending normalization
use std::io::{self, Read};

/// Wraps a reader and turns every `\r\n` and lone `\r` into `\n`.
///
/// Works on the fly over whatever the inner reader hands out, so a `\r\n`
/// split across two reads is still a single line ending.
pub struct LineNormalizer<R> {
    inner: R,
    after_cr: bool,
}

impl<R: Read> LineNormalizer<R> {
    pub fn new(inner: R) -> LineNormalizer<R> {
        LineNormalizer {
            inner,
            after_cr: false,
        }
    }
}

impl<R: Read> Read for LineNormalizer<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.inner.read(buf)?;

            if n == 0 {
                return Ok(0);
            }

            let mut written = 0;

            for i in 0..n {
                let byte = buf[i];

                match byte {
                    b'\n' if self.after_cr => {
                        self.after_cr = false;
                        continue;
                    }
                    b'\r' => {
                        self.after_cr = true;
                        buf[written] = b'\n';
                    }
                    _ => {
                        self.after_cr = false;
                        buf[written] = byte;
                    }
                }

                written += 1;
            }

            // a lone \n that completed a \r\n from the previous read
            if written > 0 {
                return Ok(written);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LineNormalizer;
    use std::io::{self, Read};

    fn normalize(input: &[u8]) -> String {
        let mut out = String::new();

        LineNormalizer::new(input).read_to_string(&mut out).unwrap();

        out
    }

    /// Hands out one byte per read call.
    struct Trickle<'a>(&'a [u8]);

    impl<'a> Read for Trickle<'a> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }

            buf[0] = self.0[0];
            self.0 = &self.0[1..];

            Ok(1)
        }
    }

    #[test]
    fn all_endings_become_newlines() {
        assert_eq!(normalize(b"a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(normalize(b"\r\r\n\n"), "\n\n\n");
        assert_eq!(normalize(b""), "");
    }

    #[test]
    fn crlf_split_between_reads() {
        let mut out = String::new();

        LineNormalizer::new(Trickle(b"a\r\nb\r\n"))
            .read_to_string(&mut out)
            .unwrap();

        assert_eq!(out, "a\nb\n");
    }
}
