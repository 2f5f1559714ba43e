use super::{chunk::Chunk, B3dParseError, Result};
use nom::error::{ErrorKind, ParseError};

/// Accumulates sibling records whose count is only known once their chunk has been fully read.
#[derive(Debug)]
pub struct RecordCollector<T> {
    records: Vec<T>,
}

impl<T> RecordCollector<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn append(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records in the order they were appended.
    pub fn finalize(mut self) -> Vec<T> {
        self.records.shrink_to_fit();
        self.records
    }
}

impl<T> Default for RecordCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies `record` until `cursor` reaches the end of `chunk`. A record parser that doesn't consume anything is
/// an error, otherwise this would never end.
pub fn collect_within<'a, T, F>(
    chunk: &Chunk<'a>,
    mut cursor: &'a [u8],
    mut record: F,
) -> Result<'a, Vec<T>>
where
    F: FnMut(&'a [u8]) -> Result<'a, T>,
{
    let mut collector = RecordCollector::new();

    while chunk.within(cursor) {
        let (rest, value) = record(cursor)?;
        if rest.len() == cursor.len() {
            return Err(nom::Err::Failure(B3dParseError::from_error_kind(
                cursor,
                ErrorKind::Many0,
            )));
        }
        collector.append(value);
        cursor = rest;
    }

    log::trace!("{} chunk: {} records", chunk.tag, collector.len());
    Ok((cursor, collector.finalize()))
}
