//! Reassembly of logical records out of physical lines
use std::io::{self, BufRead};

use encoding::DecoderTrap;
use log::info;

use crate::{
    error::{Error, Result},
    options::Settings,
};

/// The text of one logical record and the line where it started.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub text: String,
    pub line: usize,
}

/// Reads logical records from a normalized stream.
///
/// A logical record usually is one physical line, but a quoted field may hold
/// record separators, in which case the following lines are absorbed until
/// the quotes balance again.
pub struct Reassembler<R> {
    reader: R,
    /// Record separators consumed so far
    seps: usize,
}

impl<R: BufRead> Reassembler<R> {
    pub fn new(reader: R) -> Reassembler<R> {
        Reassembler { reader, seps: 0 }
    }

    /// Number of the physical line the next read starts on.
    pub fn line(&self) -> usize {
        self.seps + 1
    }

    fn read_until(&mut self, byte: u8, row_sep: u8, buf: &mut Vec<u8>) -> io::Result<usize> {
        let start = buf.len();
        let n = self.reader.read_until(byte, buf)?;

        self.seps += buf[start..].iter().filter(|&&b| b == row_sep).count();

        Ok(n)
    }

    /// Returns the next logical record, or `None` once the stream is over.
    ///
    /// Comment lines are skipped when `skip_comments` is set. The trailing
    /// record separator is not part of the returned text.
    pub fn next_record(
        &mut self,
        settings: &Settings,
        skip_comments: bool,
    ) -> Result<Option<RawRecord>> {
        let quote = settings.quote_char();
        let row_sep = settings.row_sep;
        let verbose = settings.options.verbose;
        let mut bytes = Vec::new();

        loop {
            let line = self.line();

            bytes.clear();

            if self.read_until(row_sep, row_sep, &mut bytes)? == 0 {
                return Ok(None);
            }

            let mut text = decode(&bytes, settings);

            if verbose {
                info!("processing line {:>10}", line);
            }

            if skip_comments && is_comment(&text, settings) {
                continue;
            }

            let mut quotes = text.matches(quote).count();
            let mut absorbed = 0;

            while quotes % 2 == 1 {
                if verbose {
                    info!(
                        "line {} contains an uneven number of quote chars, including the next line",
                        line
                    );
                }

                bytes.clear();

                let before = self.seps;
                let to_quote = self.read_until(settings.quote, row_sep, &mut bytes)?;
                let rest = self.read_until(row_sep, row_sep, &mut bytes)?;

                if to_quote + rest == 0 {
                    return Err(Error::UnclosedQuote { line });
                }

                absorbed += self.seps - before;

                if absorbed > settings.options.max_multiline_rows {
                    return Err(Error::UnclosedQuote { line });
                }

                let chunk = decode(&bytes, settings);

                quotes += chunk.matches(quote).count();
                text.push_str(&chunk);
            }

            if text.ends_with(settings.row_sep_char()) {
                text.pop();
            }

            return Ok(Some(RawRecord { text, line }));
        }
    }
}

fn is_comment(text: &str, settings: &Settings) -> bool {
    settings
        .options
        .comment_regexp
        .as_ref()
        .map_or(false, |re| re.is_match(text))
}

fn decode(data: &[u8], settings: &Settings) -> String {
    settings
        .encoding
        .decode(data, DecoderTrap::Replace)
        .unwrap_or_else(|e| e.into_owned())
}
