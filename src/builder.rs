//! Turns the fields of a row into a record
use log::debug;
use regex::Regex;

use crate::{
    error::{Error, Result},
    headers::Headers,
    options::Settings,
    record::{Record, Value},
    Row,
};

/// Builds records out of rows, running every configured value filter and
/// conversion.
pub struct RecordBuilder {
    zero: Regex,
    int: Regex,
    float: Regex,
}

impl Default for RecordBuilder {
    fn default() -> RecordBuilder {
        RecordBuilder::new()
    }
}

/// Also catches runs of \r and \n, which a plain `^\s*$` would not.
fn is_blank(value: &Value) -> bool {
    match *value {
        Value::Null => true,
        Value::Str(ref s) => s.chars().all(char::is_whitespace),
        _ => false,
    }
}

impl RecordBuilder {
    pub fn new() -> RecordBuilder {
        RecordBuilder {
            zero: Regex::new(r"^(\d+|\d+\.\d+)$").expect("valid zero pattern"),
            int: Regex::new(r"^[+-]?\d+$").expect("valid integer pattern"),
            float: Regex::new(r"^[+-]?\d+\.\d+$").expect("valid float pattern"),
        }
    }

    fn is_zero(&self, value: &Value) -> bool {
        match *value {
            Value::Str(ref s) if self.zero.is_match(s) => {
                s.parse::<f64>().map(|n| n == 0.0).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Numeric strings become numbers. Anything else, including integers too
    /// large for an `i64`, stays as it was.
    pub fn to_numeric(&self, value: Value) -> Value {
        let parsed = match value {
            Value::Str(ref s) if self.float.is_match(s) => s.parse().ok().map(Value::Float),
            Value::Str(ref s) if self.int.is_match(s) => {
                s.trim_start_matches('+').parse().ok().map(Value::Int)
            }
            _ => None,
        };

        parsed.unwrap_or(value)
    }

    /// Builds a record from a row. Returns `None` when the record ends up
    /// empty and empty records are to be removed.
    pub fn build(
        &self,
        headers: &Headers,
        row: &Row,
        line: usize,
        settings: &Settings,
    ) -> Result<Option<Record>> {
        let opts = &settings.options;

        // blank lines carry no fields and end up as empty records
        if !row.is_empty() && row.len() != headers.len() {
            if opts.strict_field_count {
                return Err(Error::FieldCountMismatch {
                    line,
                    expected: headers.len(),
                    found: row.len(),
                });
            }

            debug!(
                "line {} has {} fields, headers have {}",
                line,
                row.len(),
                headers.len()
            );
        }

        let mut record = Record::with_capacity(headers.len());

        for (index, slot) in headers.iter().enumerate() {
            let key = match slot {
                Some(key) if !key.is_empty() => key,
                _ => continue,
            };

            let value = match row.get(index) {
                Some(field) => Value::Str(field.to_string()),
                None => Value::Null,
            };

            record.insert(key.clone(), value);
        }

        if opts.remove_empty_values {
            record.retain(|_, v| !is_blank(v));
        }

        if opts.remove_zero_values {
            record.retain(|_, v| !self.is_zero(v));
        }

        if let Some(ref re) = opts.remove_values_matching {
            record.retain(|_, v| v.as_str().map_or(true, |s| !re.is_match(s)));
        }

        for (key, value) in record.values_mut() {
            if opts.convert_values_to_numeric.applies_to(key.as_str()) {
                let old = std::mem::replace(value, Value::Null);

                *value = self.to_numeric(old);
            }

            if let Some(converter) = opts.value_converters.get(key.as_str()) {
                let old = std::mem::replace(value, Value::Null);

                *value = converter.convert(old);
            }
        }

        if opts.remove_empty_hashes && record.is_empty() {
            return Ok(None);
        }

        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::RecordBuilder;
    use crate::{
        error::Error,
        headers::Headers,
        options::{NumericConversion, Options},
        record::{Key, Record, Value},
        Row,
    };
    use regex::Regex;

    fn headers(names: &[&str]) -> Headers {
        Headers::from_keys(names.iter().map(|n| Some(Key::symbol(n))).collect())
    }

    fn build(names: &[&str], fields: Vec<&str>, opts: Options) -> Option<Record> {
        let settings = opts.validate().unwrap();

        RecordBuilder::new()
            .build(&headers(names), &Row::from(fields), 2, &settings)
            .unwrap()
    }

    #[test]
    fn numeric_conversion() {
        let b = RecordBuilder::new();

        assert_eq!(b.to_numeric("42".into()), Value::Int(42));
        assert_eq!(b.to_numeric("-7".into()), Value::Int(-7));
        assert_eq!(b.to_numeric("+7".into()), Value::Int(7));
        assert_eq!(b.to_numeric("42.5".into()), Value::Float(42.5));
        assert_eq!(b.to_numeric("42.5.1".into()), Value::from("42.5.1"));
        assert_eq!(b.to_numeric("abc".into()), Value::from("abc"));
        assert_eq!(b.to_numeric(".5".into()), Value::from(".5"));
        assert_eq!(
            b.to_numeric("99999999999999999999".into()),
            Value::from("99999999999999999999")
        );
    }

    #[test]
    fn removes_empty_values() {
        let record = build(&["name", "age"], vec!["Bob", ""], Options::default()).unwrap();

        assert_eq!(record.get("name"), Some(&Value::from("Bob")));
        assert!(!record.contains_key("age"));

        let record = build(&["a", "b"], vec!["x", "\r\n\r\n"], Options::default()).unwrap();

        assert_eq!(record.len(), 1);
    }

    #[test]
    fn keeps_empty_values_when_asked() {
        let record = build(
            &["name", "age"],
            vec!["Bob", ""],
            Options {
                remove_empty_values: false,
                ..Options::default()
            },
        )
        .unwrap();

        assert_eq!(record.get("age"), Some(&Value::from("")));
    }

    #[test]
    fn removes_zero_values() {
        let record = build(
            &["a", "b", "c", "d"],
            vec!["0", "0.00", "1", "-0"],
            Options {
                remove_zero_values: true,
                ..Options::default()
            },
        )
        .unwrap();

        let keys: Vec<_> = record.keys().map(|k| k.as_str()).collect();

        assert_eq!(keys, vec!["c", "d"]);
    }

    #[test]
    fn removes_matching_values() {
        let record = build(
            &["a", "b"],
            vec!["N/A", "ok"],
            Options {
                remove_values_matching: Some(Regex::new("^N/A$").unwrap()),
                ..Options::default()
            },
        )
        .unwrap();

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("b"), Some(&Value::from("ok")));
    }

    #[test]
    fn numeric_only_and_except() {
        let only = build(
            &["a", "b"],
            vec!["1", "2"],
            Options {
                convert_values_to_numeric: NumericConversion::only(&["a"]),
                ..Options::default()
            },
        )
        .unwrap();

        assert_eq!(only.get("a"), Some(&Value::Int(1)));
        assert_eq!(only.get("b"), Some(&Value::from("2")));

        let except = build(
            &["a", "b"],
            vec!["1", "2"],
            Options {
                convert_values_to_numeric: NumericConversion::except(&["a"]),
                ..Options::default()
            },
        )
        .unwrap();

        assert_eq!(except.get("a"), Some(&Value::from("1")));
        assert_eq!(except.get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn converters_run_after_numeric_conversion() {
        let mut opts = Options::default();

        opts.value_converters.insert(
            "price".to_string(),
            Box::new(|v: Value| match v {
                Value::Int(n) => Value::Float(n as f64 / 100.0),
                other => other,
            }),
        );

        let record = build(&["price", "name"], vec!["250", "pen"], opts).unwrap();

        assert_eq!(record.get("price"), Some(&Value::Float(2.5)));
        assert_eq!(record.get("name"), Some(&Value::from("pen")));
    }

    #[test]
    fn empty_records() {
        assert_eq!(build(&["a", "b"], vec!["", " "], Options::default()), None);

        let kept = build(
            &["a", "b"],
            vec!["", " "],
            Options {
                remove_empty_hashes: false,
                ..Options::default()
            },
        );

        assert_eq!(kept, Some(Record::new()));
    }

    #[test]
    fn tolerates_field_count_mismatch() {
        let record = build(
            &["a", "b", "c"],
            vec!["1", "2", "3", "4"],
            Options {
                remove_empty_values: false,
                ..Options::default()
            },
        )
        .unwrap();

        assert_eq!(record.len(), 3);

        let record = build(
            &["a", "b", "c"],
            vec!["1"],
            Options {
                remove_empty_values: false,
                ..Options::default()
            },
        )
        .unwrap();

        assert_eq!(record.get("b"), Some(&Value::Null));
        assert_eq!(record.get("c"), Some(&Value::Null));
    }

    #[test]
    fn strict_field_count() {
        let settings = Options {
            strict_field_count: true,
            ..Options::default()
        }
        .validate()
        .unwrap();

        match RecordBuilder::new().build(&headers(&["a", "b"]), &Row::from(vec!["1"]), 9, &settings) {
            Err(Error::FieldCountMismatch {
                line: 9,
                expected: 2,
                found: 1,
            }) => {}
            _ => unreachable!(),
        }
    }

    #[test]
    fn strict_field_count_ignores_blank_rows() {
        let settings = Options {
            strict_field_count: true,
            ..Options::default()
        }
        .validate()
        .unwrap();

        let built = RecordBuilder::new()
            .build(&headers(&["a", "b"]), &Row::new(), 2, &settings)
            .unwrap();

        assert_eq!(built, None);
    }

    #[test]
    fn skips_removed_and_empty_names() {
        let headers = Headers::from_keys(vec![
            Some(Key::symbol("a")),
            None,
            Some(Key::symbol("")),
        ]);
        let settings = Options::default().validate().unwrap();
        let record = RecordBuilder::new()
            .build(&headers, &Row::from(vec!["1", "2", "3"]), 2, &settings)
            .unwrap()
            .unwrap();

        assert_eq!(record.len(), 1);
        assert_eq!(record.get("a"), Some(&Value::Int(1)));
    }
}
