use std::ops::Range;
use std::sync::Arc;

use tracing::warn;

use super::error::{ComputeError, InvalidConfigurationError};
use super::fanout::dispatch_all;
use crate::runtime::Runtime;
use crate::unit::{Reply, Request, UnitHandle};

/// A contiguous slice of the input assigned to one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
    pub data: Vec<i64>,
}

/// Splits `input` into `workers` chunks of `input.len() / workers` elements.
///
/// Chunk `i` covers `[i * chunk_size, (i + 1) * chunk_size)`. Elements past
/// `chunk_size * workers` belong to no chunk and are reported in
/// [`Partition::dropped`]; they are never handed to a worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    chunk_size: usize,
    chunks: Vec<Chunk>,
    dropped: Range<usize>,
}

impl Partition {
    pub fn new(
        input: &[i64],
        workers: usize,
    ) -> Result<Self, InvalidConfigurationError> {
        if workers == 0 {
            return Err(InvalidConfigurationError::NoWorkers);
        }

        let chunk_size = input.len() / workers;
        // end never exceeds chunk_size * workers <= input.len()
        let chunks = (0..workers)
            .map(|i| {
                let start = i * chunk_size;
                let end = (start + chunk_size).min(input.len());
                Chunk {
                    start,
                    end,
                    data: input[start..end].to_vec(),
                }
            })
            .collect();

        Ok(Self {
            chunk_size,
            chunks,
            dropped: chunk_size * workers..input.len(),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of input elements that were assigned to a worker.
    pub fn processed(&self) -> usize {
        self.chunk_size * self.chunks.len()
    }

    /// Input indices no worker received.
    pub fn dropped(&self) -> Range<usize> {
        self.dropped.clone()
    }

    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }
}

/// Result of a partitioned reduction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reduction {
    pub sum: i64,
    pub chunk_size: usize,
    pub processed: usize,
    pub dropped: Range<usize>,
}

/// Computes `Σ x²` over `input` by handing worker `i` the `i`-th chunk of a
/// [`Partition`] and summing the partial results as they arrive.
///
/// Fails with [`InvalidConfigurationError::NoWorkers`] before anything is
/// sent when `workers` is empty. Otherwise the fan-out failure policy of
/// [`dispatch_all`] applies.
pub async fn compute_sum_of_squares<R: Runtime>(
    runtime: &Arc<R>,
    input: &[i64],
    workers: &[UnitHandle<R::Address>],
) -> Result<Reduction, ComputeError> {
    let partition = Partition::new(input, workers.len())?;
    let chunk_size = partition.chunk_size();
    let processed = partition.processed();
    let dropped = partition.dropped();
    if !dropped.is_empty() {
        warn!(
            input = input.len(),
            workers = workers.len(),
            chunk_size,
            dropped = ?dropped,
            "input does not divide evenly, trailing elements are not computed"
        );
    }

    let mut chunks = partition.into_chunks().into_iter();
    let partials = dispatch_all(
        runtime,
        workers,
        |_| {
            Request::SumOfSquares(
                chunks.next().map(|c| c.data).unwrap_or_default(),
            )
        },
        Reply::into_partial_sum,
    )
    .await?;

    // a worker that overflowed its own chunk replied None
    let sum = partials
        .into_iter()
        .try_fold(0i64, |acc, partial| acc.checked_add(partial?))
        .ok_or(ComputeError::Overflow { processed })?;

    Ok(Reduction {
        sum,
        chunk_size,
        processed,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::error::DispatchError;
    use crate::bench::population::create_population;
    use crate::runtime::LocalRuntime;
    use crate::testing::FaultyRuntime;

    fn one_to(n: i64) -> Vec<i64> {
        (1..=n).collect()
    }

    fn sum_of_squares_to(n: i64) -> i64 {
        n * (n + 1) * (2 * n + 1) / 6
    }

    async fn workers<R: Runtime>(
        runtime: &Arc<R>,
        count: usize,
    ) -> Vec<UnitHandle<R::Address>> {
        let system = runtime.create_system("compute", "cookie").await.unwrap();
        create_population(&**runtime, &system, count).await.into_parts().0
    }

    #[test]
    fn even_split_covers_the_whole_input() {
        let partition = Partition::new(&one_to(1000), 10).unwrap();
        assert_eq!(partition.chunk_size(), 100);
        assert_eq!(partition.chunks().len(), 10);
        assert_eq!(partition.processed(), 1000);
        assert!(partition.dropped().is_empty());

        let mut next = 0;
        for chunk in partition.chunks() {
            assert_eq!(chunk.start, next);
            assert_eq!(chunk.end - chunk.start, 100);
            assert_eq!(chunk.data.len(), 100);
            next = chunk.end;
        }
        assert_eq!(next, 1000);
    }

    #[test]
    fn uneven_split_drops_the_remainder() {
        let partition = Partition::new(&one_to(1000), 7).unwrap();
        assert_eq!(partition.chunk_size(), 142);
        assert_eq!(partition.processed(), 994);
        assert_eq!(partition.dropped(), 994..1000);

        let last = partition.chunks().last().unwrap();
        assert_eq!((last.start, last.end), (852, 994));
        assert_eq!(last.data.first(), Some(&853));
        assert_eq!(last.data.last(), Some(&994));
    }

    #[test]
    fn more_workers_than_elements_leaves_chunks_empty() {
        let partition = Partition::new(&one_to(3), 5).unwrap();
        assert_eq!(partition.chunk_size(), 0);
        assert_eq!(partition.chunks().len(), 5);
        assert!(partition.chunks().iter().all(|c| c.data.is_empty()));
        assert_eq!(partition.dropped(), 0..3);
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert_eq!(
            Partition::new(&one_to(10), 0),
            Err(InvalidConfigurationError::NoWorkers)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn exact_division_reduces_the_full_range() {
        let runtime = Arc::new(LocalRuntime::default());
        let workers = workers(&runtime, 10).await;

        let input = one_to(1000);
        let reduction = compute_sum_of_squares(&runtime, &input, &workers)
            .await
            .unwrap();
        assert_eq!(reduction.sum, 333_833_500);
        assert_eq!(reduction.processed, 1000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn truncated_reduction_matches_the_covered_prefix() {
        let runtime = Arc::new(LocalRuntime::default());
        let workers = workers(&runtime, 7).await;

        let input = one_to(1000);
        let reduction = compute_sum_of_squares(&runtime, &input, &workers)
            .await
            .unwrap();
        assert_eq!(reduction.sum, sum_of_squares_to(994));
        assert_ne!(reduction.sum, sum_of_squares_to(1000));
        assert_eq!(reduction.dropped, 994..1000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sum_past_i64_is_an_overflow_error() {
        let runtime = Arc::new(LocalRuntime::default());
        let workers = workers(&runtime, 10).await;

        // every partial fits, their total does not
        let input = one_to(3_100_000);
        let error = compute_sum_of_squares(&runtime, &input, &workers)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ComputeError::Overflow {
                processed: 3_100_000
            }
        ));
    }

    #[tokio::test]
    async fn overflow_inside_one_chunk_is_an_overflow_error() {
        let runtime = Arc::new(LocalRuntime::default());
        let workers = workers(&runtime, 2).await;

        let error =
            compute_sum_of_squares(&runtime, &[1, i64::MAX], &workers)
                .await
                .unwrap_err();
        assert!(matches!(error, ComputeError::Overflow { processed: 2 }));
    }

    #[tokio::test]
    async fn zero_workers_dispatches_nothing() {
        let runtime = Arc::new(FaultyRuntime::new());
        let error = compute_sum_of_squares(&runtime, &one_to(100), &[])
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ComputeError::InvalidConfiguration(
                InvalidConfigurationError::NoWorkers
            )
        ));
        assert_eq!(runtime.sends(), 0);
    }

    #[tokio::test]
    async fn worker_failure_fails_the_reduction() {
        let runtime = Arc::new(FaultyRuntime::new().fail_send(2));
        let workers = workers(&runtime, 4).await;

        let error = compute_sum_of_squares(&runtime, &one_to(100), &workers)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ComputeError::Dispatch(DispatchError::Send { index: 2, .. })
        ));
    }
}
