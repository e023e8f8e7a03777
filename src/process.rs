//! Entry points that run a whole source through the pipeline
use crate::{
    error::Result,
    input::ReaderSource,
    options::Options,
    reader::Reader,
    record::Record,
};

/// What `process` gives back when no callback consumes the records.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Records(Vec<Record>),
    Batches(Vec<Vec<Record>>),
}

/// Reads every record of `source`.
///
/// Records are returned flat, or grouped in batches when `chunk_size` is set.
pub fn process(source: ReaderSource, options: Options) -> Result<Output> {
    let reader = Reader::new(source, options)?;

    match reader.settings().chunk_size() {
        Some(size) => Ok(Output::Batches(
            reader.chunks(size).collect::<Result<_>>()?,
        )),
        None => Ok(Output::Records(reader.collect::<Result<_>>()?)),
    }
}

/// Hands the records of `source` to `f` and returns how many batches were
/// delivered.
///
/// Without `chunk_size` every record is delivered alone in a one element batch.
/// Batches delivered before an error stay delivered.
pub fn process_with<F>(source: ReaderSource, options: Options, mut f: F) -> Result<usize>
where
    F: FnMut(Vec<Record>),
{
    let reader = Reader::new(source, options)?;
    let size = reader.settings().chunk_size().unwrap_or(1);
    let mut count = 0;

    for batch in reader.chunks(size) {
        f(batch?);
        count += 1;
    }

    Ok(count)
}
