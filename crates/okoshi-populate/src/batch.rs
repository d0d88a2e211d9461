//! Chunk partitioning and bulk INSERT construction.

use okoshi_core::ConfigError;
use okoshi_generator::{GenerateError, RetryObserver, RowSynthesizer};

/// Chunk sizes for `total` rows in steps of `step`: full chunks followed by
/// one smaller remainder chunk, never an empty one.
///
/// ```
/// use okoshi_populate::chunk_sizes;
///
/// let sizes: Vec<u64> = chunk_sizes(125, 20).unwrap().collect();
/// assert_eq!(sizes, vec![20, 20, 20, 20, 20, 20, 5]);
/// ```
pub fn chunk_sizes(total: u64, step: u64) -> Result<ChunkSizes, ConfigError> {
    if step == 0 {
        return Err(ConfigError::InvalidStep);
    }
    Ok(ChunkSizes {
        remaining: total,
        step,
    })
}

/// Iterator over chunk sizes, see [`chunk_sizes`].
#[derive(Debug, Clone)]
pub struct ChunkSizes {
    remaining: u64,
    step: u64,
}

impl Iterator for ChunkSizes {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let size = self.remaining.min(self.step);
        self.remaining -= size;
        Some(size)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let chunks = self.remaining.div_ceil(self.step) as usize;
        (chunks, Some(chunks))
    }
}

impl ExactSizeIterator for ChunkSizes {}

/// Builds one multi-row INSERT statement per chunk.
#[derive(Debug, Clone)]
pub struct BatchInsertBuilder {
    prefix: String,
}

impl BatchInsertBuilder {
    pub fn new<S: AsRef<str>>(table: &str, columns: &[S]) -> Self {
        let columns: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
        Self {
            prefix: format!("INSERT INTO {}({}) VALUES ", table, columns.join(", ")),
        }
    }

    /// Render already-synthesized rows into one statement.
    pub fn build<R: AsRef<[String]>>(&self, rows: &[R]) -> String {
        let mut statement = self.prefix.clone();
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                statement.push(',');
            }
            push_tuple(&mut statement, row.as_ref());
        }
        statement
    }

    /// Synthesize `size` rows and render them straight into one statement.
    ///
    /// Rows are rendered as they are produced, so only the statement text
    /// for the current chunk is held in memory.
    pub fn build_chunk(
        &self,
        synthesizer: &mut RowSynthesizer,
        size: u64,
        observer: &mut dyn RetryObserver,
    ) -> Result<String, GenerateError> {
        let mut statement = self.prefix.clone();
        for i in 0..size {
            let row = synthesizer.next_row(observer)?;
            if i > 0 {
                statement.push(',');
            }
            push_tuple(&mut statement, &row);
        }
        Ok(statement)
    }
}

fn push_tuple(statement: &mut String, values: &[String]) {
    statement.push('(');
    statement.push_str(&values.join(", "));
    statement.push(')');
}
