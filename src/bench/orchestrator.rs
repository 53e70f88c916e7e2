use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, info_span, warn, Instrument};

use super::compute::compute_sum_of_squares;
use super::config::BenchConfig;
use super::error::BenchError;
use super::fanout::ping_all;
use super::population::create_population;
use super::report::{BenchmarkReport, ComputeReport, SweepReport, Trial};
use crate::memory::{MemorySampler, SysinfoSampler};
use crate::runtime::Runtime;

/// Sequences the benchmark phases against a runtime.
///
/// Every phase is bracketed by two [`Instant`] readings taken right around
/// the awaited work. Logging and memory sampling happen outside of those
/// brackets.
pub struct Benchmark<R: Runtime> {
    runtime: Arc<R>,
    config: BenchConfig,
    memory: Box<dyn MemorySampler>,
    system: Option<Arc<R::System>>,
}

impl<R: Runtime> Benchmark<R> {
    pub fn new(runtime: R, config: BenchConfig) -> Self {
        Self {
            runtime: Arc::new(runtime),
            config,
            memory: Box::new(SysinfoSampler::new()),
            system: None,
        }
    }

    pub fn with_memory_sampler(
        mut self,
        sampler: impl MemorySampler + 'static,
    ) -> Self {
        self.memory = Box::new(sampler);
        self
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn runtime(&self) -> &Arc<R> {
        &self.runtime
    }

    /// Runs one trial: a fresh handshake, then the creation phase, then one
    /// ping to every created unit.
    ///
    /// Units that fail to come into existence are counted in the report and
    /// skipped by the messaging phase. A failed handshake or a failed ping
    /// fails the trial.
    pub async fn run_benchmark(
        &mut self,
        num_units: usize,
    ) -> Result<BenchmarkReport, BenchError> {
        let span = info_span!("trial", units = num_units);
        async move {
            let system = Arc::new(
                self.runtime
                    .create_system(&self.config.system_name, &self.config.cookie)
                    .await?,
            );
            self.system = Some(Arc::clone(&system));
            debug!("starting creation phase");

            let started = Instant::now();
            let population =
                create_population(&*self.runtime, &system, num_units).await;
            let creation = started.elapsed();

            let resident = self.memory.resident_bytes();
            if let Some((index, error)) = population.failures().first() {
                warn!(
                    failed = population.failures().len(),
                    first = index,
                    %error,
                    "some units could not be created"
                );
            }
            let (units, _) = population.into_parts();
            debug!(created = units.len(), "starting messaging phase");

            let started = Instant::now();
            let responses = ping_all(&self.runtime, &units)
                .await
                .map_err(BenchError::Messaging)?;
            let messaging = started.elapsed();

            let report = BenchmarkReport::new(
                num_units,
                units.len(),
                creation,
                resident,
                responses.len(),
                messaging,
            );
            info!(
                created = report.created(),
                creation_ms = report.creation_duration_ms(),
                messages = report.message_count(),
                messaging_ms = report.message_duration_ms(),
                "trial complete"
            );
            Ok::<_, BenchError>(report)
        }
        .instrument(span)
        .await
    }

    /// Runs [`Self::run_benchmark`] at the configured `default_units`.
    pub async fn run_default_benchmark(
        &mut self,
    ) -> Result<BenchmarkReport, BenchError> {
        self.run_benchmark(self.config.default_units).await
    }

    /// Runs [`Self::run_benchmark`] once per configured sweep size, smallest
    /// first. A failed size is recorded and the sweep moves on.
    pub async fn scaling_test(&mut self) -> SweepReport {
        let sizes = self.config.sweep_sizes.clone();
        let mut trials = Vec::with_capacity(sizes.len());
        for size in sizes {
            let outcome = self.run_benchmark(size).await;
            if let Err(error) = &outcome {
                warn!(size, phase = error.phase(), %error, "trial failed");
            }
            trials.push(Trial { size, outcome });
        }
        SweepReport { trials }
    }

    /// Attempts the configured (by default one million unit) population.
    pub async fn million_unit_challenge(
        &mut self,
    ) -> Result<BenchmarkReport, BenchError> {
        self.run_benchmark(self.config.challenge_units).await
    }

    /// Runs [`Self::concurrent_computation_demo_with`] across the configured
    /// `compute_workers`.
    pub async fn concurrent_computation_demo(
        &mut self,
    ) -> Result<ComputeReport, BenchError> {
        self.concurrent_computation_demo_with(self.config.compute_workers)
            .await
    }

    /// Creates `num_workers` worker units and reduces `1..=compute_input_len`
    /// to its sum of squares across them.
    ///
    /// Reuses the system from the last trial if there was one, handshaking a
    /// dedicated compute system otherwise. A sum that does not fit an `i64`
    /// fails the demo with [`ComputeError::Overflow`].
    ///
    /// [`ComputeError::Overflow`]: super::error::ComputeError::Overflow
    pub async fn concurrent_computation_demo_with(
        &mut self,
        num_workers: usize,
    ) -> Result<ComputeReport, BenchError> {
        let span = info_span!("compute", workers = num_workers);
        async move {
            let system = match &self.system {
                Some(system) => Arc::clone(system),
                None => {
                    let system = Arc::new(
                        self.runtime
                            .create_system(
                                &self.config.compute_system_name,
                                &self.config.compute_cookie,
                            )
                            .await?,
                    );
                    self.system = Some(Arc::clone(&system));
                    system
                }
            };
            let input: Vec<i64> =
                (1..).take(self.config.compute_input_len).collect();

            let started = Instant::now();
            let population =
                create_population(&*self.runtime, &system, num_workers).await;
            let worker_creation = started.elapsed();

            if !population.is_complete() {
                warn!(
                    failed = population.failures().len(),
                    "computing with fewer workers than requested"
                );
            }
            let (workers, _) = population.into_parts();
            debug!(workers = workers.len(), "starting reduction");

            let started = Instant::now();
            let reduction =
                compute_sum_of_squares(&self.runtime, &input, &workers).await?;
            let compute = started.elapsed();

            let report = ComputeReport {
                workers_requested: num_workers,
                workers_created: workers.len(),
                input_len: input.len(),
                chunk_size: reduction.chunk_size,
                processed: reduction.processed,
                dropped: reduction.dropped,
                worker_creation,
                compute,
                result: reduction.sum,
            };
            info!(
                result = report.compute_result(),
                compute_ms = report.compute_duration_ms(),
                "reduction complete"
            );
            Ok::<_, BenchError>(report)
        }
        .instrument(span)
        .await
    }
}
