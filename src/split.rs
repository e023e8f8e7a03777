//! Splitting of a logical record into fields
use csv::{ReaderBuilder, Terminator};

use crate::{
    error::{Error, ParseErrorKind, Result},
    options::Settings,
    Row,
};

enum State {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Rejects quotes that are neither opening, closing nor escaping a field.
fn check_quoting(text: &str, line: usize, settings: &Settings) -> Result<()> {
    let quote = settings.quote_char();
    let sep = settings.col_sep_char();
    let row_sep = settings.row_sep_char();
    let mut state = State::FieldStart;

    for c in text.chars() {
        state = match state {
            State::FieldStart if c == quote => State::Quoted,
            State::FieldStart | State::Unquoted if c == sep || c == row_sep => State::FieldStart,
            State::FieldStart | State::Unquoted if c == quote => {
                return Err(Error::Parse {
                    line,
                    kind: ParseErrorKind::StrayQuote,
                })
            }
            State::FieldStart | State::Unquoted => State::Unquoted,
            State::Quoted if c == quote => State::QuoteInQuoted,
            State::Quoted => State::Quoted,
            State::QuoteInQuoted if c == quote => State::Quoted,
            State::QuoteInQuoted if c == sep || c == row_sep => State::FieldStart,
            State::QuoteInQuoted => {
                return Err(Error::Parse {
                    line,
                    kind: ParseErrorKind::TrailingGarbage,
                })
            }
        };
    }

    match state {
        State::Quoted => Err(Error::UnclosedQuote { line }),
        _ => Ok(()),
    }
}

fn clean(field: &str, settings: &Settings) -> String {
    let unquoted = field.replace(settings.quote_char(), "");

    if settings.options.strip_whitespace {
        unquoted.trim().to_string()
    } else {
        unquoted
    }
}

/// Splits the text of a logical record into its fields.
///
/// Text holding the quote character goes through the `csv` reader so that
/// separators inside quoted fields are kept as content. Anything else is a
/// plain split on the column separator.
pub fn split_fields(text: &str, line: usize, settings: &Settings) -> Result<Row> {
    let mut row = Row::new();

    if text.is_empty() {
        return Ok(row);
    }

    if text.contains(settings.quote_char()) && !settings.options.force_simple_split {
        check_quoting(text, line, settings)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(settings.col_sep)
            .quote(settings.quote)
            .terminator(Terminator::Any(settings.row_sep))
            .from_reader(text.as_bytes());

        for result in reader.records() {
            let record = result.map_err(|source| Error::Csv { line, source })?;

            for field in record.iter() {
                row.push_field(&clean(field, settings));
            }
        }
    } else {
        for field in text.split(settings.col_sep_char()) {
            row.push_field(&clean(field, settings));
        }
    }

    Ok(row)
}
