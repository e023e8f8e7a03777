//! Batching of records
use crate::{error::Result, record::Record};

/// Groups the records of a stream in batches of at most `size` records.
///
/// The last batch may be smaller. An error is handed out as soon as it is
/// found; the records gathered for the unfinished batch are dropped and the
/// stream ends.
pub struct Chunks<I> {
    iter: I,
    size: usize,
    done: bool,
}

impl<I> Chunks<I>
where
    I: Iterator<Item = Result<Record>>,
{
    pub fn new(iter: I, size: usize) -> Chunks<I> {
        Chunks {
            iter,
            size: size.max(1),
            done: false,
        }
    }
}

impl<I> Iterator for Chunks<I>
where
    I: Iterator<Item = Result<Record>>,
{
    type Item = Result<Vec<Record>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut chunk = Vec::with_capacity(self.size);

        while chunk.len() < self.size {
            match self.iter.next() {
                Some(Ok(record)) => chunk.push(record),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        if chunk.is_empty() {
            None
        } else {
            Some(Ok(chunk))
        }
    }
}
