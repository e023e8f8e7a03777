use std::collections::HashMap;
use std::io::BufRead;

use log::info;

use crate::{
    error::{Error, Result},
    options::Settings,
    reassemble::Reassembler,
    record::Key,
    split::split_fields,
};

/// Field names of a run and their positions.
///
/// A slot holding `None` is a column that was removed by the key mapping. It
/// stays in place so that data fields keep lining up with the names.
#[derive(Debug, Clone, PartialEq)]
pub struct Headers {
    indexes: HashMap<String, usize>,
    names: Vec<Option<Key>>,
}

impl Headers {
    pub fn from_keys(names: Vec<Option<Key>>) -> Headers {
        let mut indexes = HashMap::new();

        for (index, entry) in names.iter().enumerate() {
            if let Some(key) = entry {
                indexes.insert(key.as_str().to_string(), index);
            }
        }

        Headers { indexes, names }
    }

    /// Number of slots, removed columns included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<usize> {
        self.indexes.get(field).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Option<Key>> {
        self.names.iter()
    }

    /// The names that were not removed, in order.
    pub fn names(&self) -> Vec<&str> {
        self.names.iter().flatten().map(|k| k.as_str()).collect()
    }
}

fn make_key(name: &str, settings: &Settings) -> Key {
    if settings.options.strings_as_keys {
        Key::text(name)
    } else {
        Key::symbol(name)
    }
}

/// Cleans a header name read from the file.
pub fn sanitize(name: &str, settings: &Settings) -> String {
    let opts = &settings.options;
    let mut name = match opts.strip_chars_from_headers {
        Some(ref re) => re.replace_all(name, "").into_owned(),
        None => name.to_string(),
    };

    name = opts
        .sanitize_chars_in_headers
        .replace_all(name.trim(), "_")
        .replace(settings.quote_char(), "");

    if opts.downcase_header {
        name = name.to_lowercase();
    }

    name
}

/// Reads the header line. Returns `None` when the stream is empty.
fn file_headers<R: BufRead>(
    reassembler: &mut Reassembler<R>,
    settings: &Settings,
) -> Result<Option<Vec<String>>> {
    let record = match reassembler.next_record(settings, false)? {
        Some(record) => record,
        None => return Ok(None),
    };

    // the header might be commented out
    let text = match settings.options.comment_regexp {
        Some(ref re) => re.replace(&record.text, "").into_owned(),
        None => record.text,
    };

    let fields = split_fields(&text, record.line, settings)?;

    Ok(Some(fields.iter().map(|f| f.to_string()).collect()))
}

fn apply_key_mapping(keys: Vec<Option<Key>>, settings: &Settings) -> Vec<Option<Key>> {
    let opts = &settings.options;
    let map = match opts.key_mapping {
        Some(ref map) => map,
        None => return keys,
    };

    keys.into_iter()
        .map(|entry| {
            let key = entry?;

            match map.get(key.as_str()) {
                Some(Some(new_name)) => Some(key.renamed(new_name)),
                Some(None) => None,
                None if opts.remove_unmapped_keys => None,
                None => Some(key),
            }
        })
        .collect()
}

/// Works out the headers of a run, consuming the header line from the stream
/// if the file has one.
pub fn resolve<R: BufRead>(
    reassembler: &mut Reassembler<R>,
    settings: &Settings,
) -> Result<Headers> {
    let opts = &settings.options;
    let from_file = if opts.headers_in_file {
        file_headers(reassembler, settings)?
    } else {
        None
    };

    let keys = match (&opts.user_provided_headers, from_file) {
        (None, None) => return Err(Error::HeadersNotProvided),
        (Some(user), file) => {
            if let Some(file) = file {
                if file.len() != user.len() {
                    return Err(Error::HeaderSizeMismatch {
                        expected: user.len(),
                        found: file.len(),
                    });
                }
            }

            user.iter().map(|name| Some(make_key(name, settings))).collect()
        }
        (None, Some(file)) => {
            let keys = file
                .iter()
                .map(|name| {
                    if opts.keep_original_headers {
                        Some(make_key(name, settings))
                    } else {
                        Some(make_key(&sanitize(name, settings), settings))
                    }
                })
                .collect();

            apply_key_mapping(keys, settings)
        }
    };

    let headers = Headers::from_keys(keys);

    if opts.verbose {
        info!("headers: {:?}", headers.names());
    }

    Ok(headers)
}
