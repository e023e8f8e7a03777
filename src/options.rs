//! Configuration of a processing run
use std::collections::{HashMap, HashSet};

use encoding::label::encoding_from_whatwg_label;
use encoding::{EncoderTrap, EncodingRef};
use regex::Regex;

use crate::{
    error::{Error, Result},
    record::ValueConverter,
};

/// Which keys take part in numeric conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericConversion {
    Disabled,
    All,
    Only(HashSet<String>),
    Except(HashSet<String>),
}

impl NumericConversion {
    pub fn only(keys: &[&str]) -> NumericConversion {
        NumericConversion::Only(keys.iter().map(|k| k.to_string()).collect())
    }

    pub fn except(keys: &[&str]) -> NumericConversion {
        NumericConversion::Except(keys.iter().map(|k| k.to_string()).collect())
    }

    pub fn applies_to(&self, key: &str) -> bool {
        match *self {
            NumericConversion::Disabled => false,
            NumericConversion::All => true,
            NumericConversion::Only(ref keys) => keys.contains(key),
            NumericConversion::Except(ref keys) => !keys.contains(key),
        }
    }
}

/// Everything that can be tuned in a run. Build it with struct update syntax
/// over `Options::default()`.
pub struct Options {
    /// Group records in batches of this size. `None` or zero disables batching.
    pub chunk_size: Option<usize>,
    pub col_sep: char,
    /// Lines matching this are skipped. Its first match is removed from the
    /// header line.
    pub comment_regexp: Option<Regex>,
    pub convert_values_to_numeric: NumericConversion,
    pub downcase_header: bool,
    /// A WHATWG encoding label, e.g. `utf-8` or `windows-1252`.
    pub file_encoding: String,
    /// Split on the column separator even if the line has quotes.
    pub force_simple_split: bool,
    pub headers_in_file: bool,
    pub keep_original_headers: bool,
    /// Renames header names. Mapping a name to `None` drops that column.
    pub key_mapping: Option<HashMap<String, Option<String>>>,
    pub quote_char: char,
    pub remove_empty_hashes: bool,
    pub remove_empty_values: bool,
    /// With `key_mapping`, drop the columns the mapping does not mention.
    pub remove_unmapped_keys: bool,
    pub remove_values_matching: Option<Regex>,
    pub remove_zero_values: bool,
    pub row_sep: char,
    pub sanitize_chars_in_headers: Regex,
    pub strings_as_keys: bool,
    pub strip_chars_from_headers: Option<Regex>,
    pub strip_whitespace: bool,
    /// Overrides the header found in the file.
    pub user_provided_headers: Option<Vec<String>>,
    pub value_converters: HashMap<String, Box<dyn ValueConverter>>,
    pub verbose: bool,
    /// How many physical lines a single quoted field may span.
    pub max_multiline_rows: usize,
    /// Fail on rows whose field count differs from the header's.
    pub strict_field_count: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            chunk_size: None,
            col_sep: ',',
            comment_regexp: Some(Regex::new("^#").expect("valid comment pattern")),
            convert_values_to_numeric: NumericConversion::All,
            downcase_header: true,
            file_encoding: "utf-8".to_string(),
            force_simple_split: false,
            headers_in_file: true,
            keep_original_headers: false,
            key_mapping: None,
            quote_char: '"',
            remove_empty_hashes: true,
            remove_empty_values: true,
            remove_unmapped_keys: false,
            remove_values_matching: None,
            remove_zero_values: false,
            row_sep: '\n',
            sanitize_chars_in_headers: Regex::new(r"[\s=-]+").expect("valid sanitize pattern"),
            strings_as_keys: false,
            strip_chars_from_headers: None,
            strip_whitespace: true,
            user_provided_headers: None,
            value_converters: HashMap::new(),
            verbose: false,
            max_multiline_rows: 1000,
            strict_field_count: false,
        }
    }
}

impl Options {
    /// Checks the options and resolves what can be resolved up front.
    pub fn validate(self) -> Result<Settings> {
        let col_sep = ascii_byte("col_sep", self.col_sep)?;
        let quote = ascii_byte("quote_char", self.quote_char)?;
        let row_sep = ascii_byte("row_sep", self.row_sep)?;

        if col_sep == quote || col_sep == row_sep || quote == row_sep {
            return Err(Error::InvalidOption(
                "col_sep, quote_char and row_sep must be different".to_string(),
            ));
        }

        // input is normalized to \n before it is read
        if row_sep == b'\r' {
            return Err(Error::InvalidOption(
                "row_sep cannot be a carriage return".to_string(),
            ));
        }

        if self.max_multiline_rows == 0 {
            return Err(Error::InvalidOption(
                "max_multiline_rows must be positive".to_string(),
            ));
        }

        let encoding = encoding_from_whatwg_label(&self.file_encoding).ok_or_else(|| {
            Error::InvalidOption(format!("unknown encoding {}", self.file_encoding))
        })?;

        // separators are searched for as single bytes in the raw input
        for &byte in &[col_sep, quote, row_sep, b'\r'] {
            let text = (byte as char).to_string();

            match encoding.encode(&text, EncoderTrap::Strict) {
                Ok(ref encoded) if encoded[..] == [byte] => {}
                _ => {
                    return Err(Error::InvalidOption(format!(
                        "encoding {} is not ASCII compatible",
                        self.file_encoding
                    )))
                }
            }
        }

        Ok(Settings {
            chunk_size: self.chunk_size.filter(|&n| n > 0),
            col_sep,
            quote,
            row_sep,
            encoding,
            options: self,
        })
    }
}

fn ascii_byte(name: &str, c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(Error::InvalidOption(format!("{} must be an ASCII character", name)))
    }
}

/// Validated options. Never changes once a run started.
pub struct Settings {
    pub(crate) options: Options,
    pub(crate) encoding: EncodingRef,
    pub(crate) chunk_size: Option<usize>,
    pub(crate) col_sep: u8,
    pub(crate) quote: u8,
    pub(crate) row_sep: u8,
}

impl Settings {
    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn chunk_size(&self) -> Option<usize> {
        self.chunk_size
    }

    pub fn encoding_name(&self) -> &str {
        self.encoding.name()
    }

    pub(crate) fn quote_char(&self) -> char {
        self.quote as char
    }

    pub(crate) fn col_sep_char(&self) -> char {
        self.col_sep as char
    }

    pub(crate) fn row_sep_char(&self) -> char {
        self.row_sep as char
    }
}
