use std::io::{BufReader, Read};

use crate::{
    builder::RecordBuilder,
    chunks::Chunks,
    error::Result,
    headers::{self, Headers},
    input::ReaderSource,
    normalize::LineNormalizer,
    options::{Options, Settings},
    reassemble::Reassembler,
    record::Record,
    split::split_fields,
};

type Stream = BufReader<LineNormalizer<Box<dyn Read>>>;

/// Reads records from a source, one logical record at a time.
///
/// Headers are resolved when the reader is created, so configuration errors
/// show up before any data row is read. After the first error the reader is
/// exhausted.
pub struct Reader {
    reassembler: Reassembler<Stream>,
    settings: Settings,
    headers: Headers,
    builder: RecordBuilder,
    done: bool,
}

impl Reader {
    pub fn new(source: ReaderSource, options: Options) -> Result<Reader> {
        let settings = options.validate()?;
        let mut reassembler = Reassembler::new(source.into_reader());
        let headers = headers::resolve(&mut reassembler, &settings)?;

        Ok(Reader {
            reassembler,
            settings,
            headers,
            builder: RecordBuilder::new(),
            done: false,
        })
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Groups the records in batches of at most `size` records.
    pub fn chunks(self, size: usize) -> Chunks<Self> {
        Chunks::new(self, size)
    }

    fn read_record(&mut self) -> Result<Option<Record>> {
        while let Some(raw) = self.reassembler.next_record(&self.settings, true)? {
            let row = split_fields(&raw.text, raw.line, &self.settings)?;
            let built = self
                .builder
                .build(&self.headers, &row, raw.line, &self.settings)?;

            if let Some(record) = built {
                return Ok(Some(record));
            }
        }

        Ok(None)
    }
}

impl Iterator for Reader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Reader;
    use crate::{
        error::Error,
        input::ReaderSource,
        options::Options,
        record::{Record, Value},
    };

    fn read(data: &str, opts: Options) -> Vec<Record> {
        Reader::new(ReaderSource::from(data), opts)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn name_and_age() {
        let records = read("name,age\nAlice,30\nBob,\n", Options::default());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), Some(&Value::from("Alice")));
        assert_eq!(records[0].get("age"), Some(&Value::Int(30)));
        assert_eq!(records[1].get("name"), Some(&Value::from("Bob")));
        assert!(!records[1].contains_key("age"));
    }

    #[test]
    fn one_record_per_plain_line() {
        let data = "a,b\n# skipped\n1,2\n3,4\n#x\n5,6\n";
        let non_comment_lines = data.lines().filter(|l| !l.starts_with('#')).count();

        assert_eq!(
            read(data, Options::default()).len(),
            non_comment_lines - 1
        );
    }

    #[test]
    fn quoted_field_over_two_lines() {
        let records = read(
            "name,street\n\"Highbury\nHighbury House\",Avenell Road\n",
            Options::default(),
        );

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].get("name"),
            Some(&Value::from("Highbury\nHighbury House"))
        );
    }

    #[test]
    fn mixed_line_endings() {
        let records = read("a,b\r\n1,2\r3,4\n5,6", Options::default());

        assert_eq!(records.len(), 3);
        assert_eq!(records[2].get("b"), Some(&Value::Int(6)));
    }

    #[test]
    fn blank_lines_are_dropped() {
        assert_eq!(read("a,b\n1,2\n\n3,4\n", Options::default()).len(), 2);
    }

    #[test]
    fn blank_lines_pass_strict_field_count() {
        let records = read(
            "a,b\n1,2\n\n3,4\n",
            Options {
                strict_field_count: true,
                ..Options::default()
            },
        );

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn stops_after_parse_error() {
        let mut reader =
            Reader::new(ReaderSource::from("a,b\n1,2\n3\"x\",4\n5,6\n"), Options::default())
                .unwrap();

        assert!(reader.next().unwrap().is_ok());

        match reader.next() {
            Some(Err(Error::Parse { line: 3, .. })) => {}
            _ => unreachable!(),
        }

        assert!(reader.next().is_none());
    }

    #[test]
    fn header_errors_happen_on_creation() {
        let opts = Options {
            user_provided_headers: Some(vec!["a".into(), "b".into(), "c".into()]),
            ..Options::default()
        };

        match Reader::new(ReaderSource::from("x,y\n1,2\n"), opts) {
            Err(Error::HeaderSizeMismatch { .. }) => {}
            _ => unreachable!(),
        }
    }
}
