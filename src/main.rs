use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record as LogRecord};
use regex::Regex;
use serde_json::{Map, Number, Value as Json};

use csvmap::{process_with, NumericConversion, Options, ReaderSource, Record, Value};

#[derive(Parser)]
#[command(
    name = "csvmap",
    version,
    about = "Reads a delimited text file and prints its records as JSON lines"
)]
struct Args {
    /// Input file, `-` for stdin
    input: PathBuf,

    /// Print batches of this many records as JSON arrays
    #[arg(short, long)]
    chunk_size: Option<usize>,

    #[arg(long, default_value_t = ',')]
    col_sep: char,

    #[arg(long, default_value_t = '"')]
    quote_char: char,

    #[arg(long, default_value = "utf-8")]
    encoding: String,

    /// Header names to use instead of the file's, comma separated
    #[arg(long, value_delimiter = ',')]
    headers: Option<Vec<String>>,

    /// The file has no header line
    #[arg(long)]
    no_headers_in_file: bool,

    #[arg(long)]
    keep_original_headers: bool,

    #[arg(long)]
    keep_numbers_as_strings: bool,

    #[arg(long)]
    keep_empty_values: bool,

    #[arg(long)]
    remove_zero_values: bool,

    /// Drop values matching this pattern
    #[arg(long)]
    remove_matching: Option<Regex>,

    /// Rename a column, `old=new`, or drop it with `old=`
    #[arg(long = "map", value_name = "OLD=NEW")]
    key_mapping: Vec<String>,

    #[arg(long)]
    force_simple_split: bool,

    #[arg(long)]
    strict: bool,

    #[arg(short, long)]
    verbose: bool,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &LogRecord) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn key_mapping(pairs: &[String]) -> Option<HashMap<String, Option<String>>> {
    if pairs.is_empty() {
        return None;
    }

    Some(
        pairs
            .iter()
            .map(|pair| match pair.find('=') {
                Some(i) if i + 1 < pair.len() => {
                    (pair[..i].to_string(), Some(pair[i + 1..].to_string()))
                }
                Some(i) => (pair[..i].to_string(), None),
                None => (pair.clone(), Some(pair.clone())),
            })
            .collect(),
    )
}

fn to_json(value: &Value) -> Json {
    match *value {
        Value::Null => Json::Null,
        Value::Str(ref s) => Json::String(s.clone()),
        Value::Int(n) => Json::from(n),
        Value::Float(n) => Number::from_f64(n).map_or(Json::Null, Json::Number),
    }
}

fn record_to_json(record: &Record) -> Json {
    let mut map = Map::new();

    for (key, value) in record.iter() {
        map.insert(key.to_string(), to_json(value));
    }

    Json::Object(map)
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        log::set_logger(&LOGGER)
            .map(|()| log::set_max_level(LevelFilter::Info))
            .ok();
    }

    let options = Options {
        chunk_size: args.chunk_size,
        col_sep: args.col_sep,
        quote_char: args.quote_char,
        file_encoding: args.encoding,
        user_provided_headers: args.headers,
        headers_in_file: !args.no_headers_in_file,
        keep_original_headers: args.keep_original_headers,
        convert_values_to_numeric: if args.keep_numbers_as_strings {
            NumericConversion::Disabled
        } else {
            NumericConversion::All
        },
        remove_empty_values: !args.keep_empty_values,
        remove_zero_values: args.remove_zero_values,
        remove_values_matching: args.remove_matching,
        key_mapping: key_mapping(&args.key_mapping),
        force_simple_split: args.force_simple_split,
        strict_field_count: args.strict,
        verbose: args.verbose,
        ..Options::default()
    };

    let source = if args.input.as_os_str() == "-" {
        Ok(ReaderSource::from_reader(io::stdin()))
    } else {
        ReaderSource::from_path(&args.input)
    };

    let source = match source {
        Ok(source) => source,
        Err(e) => {
            eprintln!("cannot open {}: {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let chunked = options.chunk_size.map_or(false, |n| n > 0);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = process_with(source, options, |batch| {
        let line = if chunked {
            Json::Array(batch.iter().map(record_to_json).collect())
        } else {
            batch.first().map_or(Json::Null, record_to_json)
        };

        if writeln!(out, "{}", line).is_err() {
            process::exit(1);
        }
    });

    match result {
        Ok(count) => log::info!("{} batches written", count),
        Err(e) => {
            eprintln!("failed: {}", e);
            process::exit(1);
        }
    }
}
