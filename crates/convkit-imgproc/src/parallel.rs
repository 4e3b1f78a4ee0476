use std::ops::Range;

use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),

    /// The buffer length is not a whole number of rows.
    #[error("buffer of length {0} is not a multiple of the row stride {1}")]
    SizeMismatch(usize, usize),

    /// A row range reaches past the end of the buffer.
    #[error("row range [{0}, {1}) exceeds the {2} rows of the buffer")]
    RangeOutOfBounds(usize, usize, usize),

    /// The row ranges do not tile the buffer in order.
    #[error("row range [{1}, {2}) does not start at the expected row {0}")]
    NonContiguousRanges(usize, usize, usize),
}

/// Controls how a filtering pass is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// One worker per thread of the global Rayon thread pool.
    ///
    /// The global pool is sized after the available parallelism of the host.
    #[default]
    Auto,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run `n` workers on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which is torn down once the pass is joined.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Number of row partitions the strategy splits the image into.
    pub fn num_workers(&self) -> usize {
        match self {
            ExecutionStrategy::Auto => rayon::current_num_threads(),
            ExecutionStrategy::Serial => 1,
            ExecutionStrategy::Fixed(n) => *n,
        }
    }
}

/// A half-open range of image rows `[start, end)` assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    /// First row of the range.
    pub start: usize,
    /// One past the last row of the range.
    pub end: usize,
}

impl RowRange {
    /// Create a new row range.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "row range [{start}, {end}) is reversed");
        Self { start, end }
    }

    /// Number of rows in the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the range holds no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over the row indices of the range.
    pub fn iter(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `[0, height)` into one row range per worker.
///
/// Every worker receives `height / num_workers` rows and the last one also takes the
/// remainder, so it may hold up to `num_workers - 1` extra rows. Choose a worker count that
/// divides `height` for balanced work. When there are more workers than rows each worker
/// gets a single row and the ones past the end receive the empty range `[height, height)`.
///
/// # Arguments
///
/// * `height` - The number of rows to split.
/// * `num_workers` - The number of workers.
///
/// # Returns
///
/// `num_workers` ordered, disjoint ranges whose union is exactly `[0, height)`.
///
/// # Examples
///
/// ```
/// use convkit_imgproc::parallel::{partition_rows, RowRange};
///
/// let ranges = partition_rows(10, 3).unwrap();
/// assert_eq!(
///     ranges,
///     vec![RowRange::new(0, 3), RowRange::new(3, 6), RowRange::new(6, 10)]
/// );
/// ```
pub fn partition_rows(height: usize, num_workers: usize) -> Result<Vec<RowRange>, ParallelError> {
    if num_workers == 0 {
        return Err(ParallelError::InvalidThreadCount(num_workers));
    }

    let rows_per_worker = (height / num_workers).max(1);

    let ranges = (0..num_workers)
        .map(|i| {
            let start = (i * rows_per_worker).min(height);
            let end = if i == num_workers - 1 {
                height
            } else {
                ((i + 1) * rows_per_worker).min(height)
            };
            RowRange::new(start, end)
        })
        .collect();

    Ok(ranges)
}

/// Split a row-major buffer into one mutable chunk per row range.
///
/// The ranges must be ordered and contiguous starting at row zero, as produced by
/// [`partition_rows`]. Each chunk holds exactly the rows of its range, so the chunks can
/// be handed to different workers without any synchronization.
///
/// # Arguments
///
/// * `data` - The buffer to split.
/// * `row_stride` - Number of elements per row.
/// * `ranges` - The row ranges.
pub fn split_rows_mut<'a, T>(
    data: &'a mut [T],
    row_stride: usize,
    ranges: &[RowRange],
) -> Result<Vec<(RowRange, &'a mut [T])>, ParallelError> {
    if row_stride == 0 {
        return Err(ParallelError::InvalidRowStride(row_stride));
    }

    let num_rows = data.len() / row_stride;
    let mut chunks = Vec::with_capacity(ranges.len());
    let mut rest = data;
    let mut next_row = 0;

    for &range in ranges {
        if range.start != next_row {
            return Err(ParallelError::NonContiguousRanges(
                next_row,
                range.start,
                range.end,
            ));
        }

        if range.end > num_rows {
            return Err(ParallelError::RangeOutOfBounds(
                range.start,
                range.end,
                num_rows,
            ));
        }

        let len = range.len() * row_stride;
        let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(len);
        chunks.push((range, chunk));
        rest = tail;
        next_row = range.end;
    }

    Ok(chunks)
}

/// Run `f` once per worker over disjoint row chunks of `dst`, then join.
///
/// The rows of `dst` are partitioned with [`partition_rows`] according to the strategy.
/// Each worker receives its [`RowRange`] together with the mutable slice holding exactly
/// those rows. The call returns once every worker has finished; if the thread pool cannot
/// be created the pass is aborted before `f` runs on any row.
///
/// # Arguments
///
/// * `dst` - The row-major destination buffer.
/// * `row_stride` - Number of elements per row, i.e. `width * channels`.
/// * `strategy` - The execution strategy.
/// * `f` - The per worker operation.
pub fn par_iter_row_ranges<T, F>(
    dst: &mut [T],
    row_stride: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(RowRange, &mut [T]) + Send + Sync,
{
    if row_stride == 0 {
        return Err(ParallelError::InvalidRowStride(row_stride));
    }

    if dst.len() % row_stride != 0 {
        return Err(ParallelError::SizeMismatch(dst.len(), row_stride));
    }

    let ranges = partition_rows(dst.len() / row_stride, strategy.num_workers())?;
    let chunks = split_rows_mut(dst, row_stride, &ranges)?;

    match strategy {
        ExecutionStrategy::Serial => {
            for (range, chunk) in chunks {
                f(range, chunk);
            }
        }
        ExecutionStrategy::Auto => {
            rayon::scope(|s| spawn_workers(s, chunks, &f));
        }
        ExecutionStrategy::Fixed(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.scope(|s| spawn_workers(s, chunks, &f));
        }
    }

    Ok(())
}

fn spawn_workers<'scope, T, F>(
    scope: &rayon::Scope<'scope>,
    chunks: Vec<(RowRange, &'scope mut [T])>,
    f: &'scope F,
) where
    T: Send,
    F: Fn(RowRange, &mut [T]) + Sync,
{
    for (worker, (range, chunk)) in chunks.into_iter().enumerate() {
        log::debug!(
            "worker {} rows [{}, {}) ({} rows)",
            worker,
            range.start,
            range.end,
            range.len()
        );
        scope.spawn(move |_| f(range, chunk));
    }
}
