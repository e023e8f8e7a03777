//! Reads delimited text into records of field names and values.
//!
//! Lines are reassembled into logical records first, so quoted fields holding
//! line breaks survive, no matter if the file ends its lines with `\n`, `\r\n`
//! or `\r`.
//!
//! ```no_run
//! use csvmap::{process, Options, Output, ReaderSource};
//!
//! let source = ReaderSource::from_path("stadiums.csv").unwrap();
//!
//! if let Output::Records(records) = process(source, Options::default()).unwrap() {
//!     println!("{} records", records.len());
//! }
//! ```
mod builder;
mod chunks;
mod error;
mod headers;
mod input;
mod normalize;
mod options;
mod process;
mod reader;
mod reassemble;
mod record;
mod split;

pub use builder::RecordBuilder;
pub use chunks::Chunks;
pub use error::{Error, ParseErrorKind, Result};
pub use headers::Headers;
pub use input::ReaderSource;
pub use normalize::LineNormalizer;
pub use options::{NumericConversion, Options, Settings};
pub use process::{process, process_with, Output};
pub use reader::Reader;
pub use reassemble::{RawRecord, Reassembler};
pub use record::{Key, Record, Value, ValueConverter};
pub use split::split_fields;

type Row = csv::StringRecord;
