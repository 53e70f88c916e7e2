use std::fmt;
use std::ops::Range;
use std::time::Duration;

use super::error::BenchError;
use crate::fmt::{GroupedDisplayExt, Megabytes};

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.
}

/// `count / elapsed` in units per second, 0 when either side is zero.
fn per_second(count: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if count == 0 || secs == 0. {
        0.
    } else {
        count as f64 / secs
    }
}

fn rounded(rate: f64) -> u64 {
    rate.round() as u64
}

/// Measurements of one create-then-message trial.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkReport {
    population_size: usize,
    created: usize,
    creation_failures: usize,
    creation: Duration,
    resident_memory_bytes: Option<u64>,
    message_count: usize,
    messaging: Duration,
}

impl BenchmarkReport {
    pub(crate) fn new(
        population_size: usize,
        created: usize,
        creation: Duration,
        resident_memory_bytes: Option<u64>,
        message_count: usize,
        messaging: Duration,
    ) -> Self {
        Self {
            population_size,
            created,
            creation_failures: population_size.saturating_sub(created),
            creation,
            resident_memory_bytes,
            message_count,
            messaging,
        }
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn creation_failures(&self) -> usize {
        self.creation_failures
    }

    /// Whether fewer units exist than were requested.
    pub fn underflowed(&self) -> bool {
        self.creation_failures > 0
    }

    pub fn creation_duration_ms(&self) -> f64 {
        millis(self.creation)
    }

    pub fn resident_memory_bytes(&self) -> Option<u64> {
        self.resident_memory_bytes
    }

    pub fn message_count(&self) -> usize {
        self.message_count
    }

    pub fn message_duration_ms(&self) -> f64 {
        millis(self.messaging)
    }

    pub fn units_per_second(&self) -> f64 {
        per_second(self.population_size, self.creation)
    }

    pub fn messages_per_second(&self) -> f64 {
        per_second(self.message_count, self.messaging)
    }

    pub fn average_response_ms(&self) -> f64 {
        if self.message_count == 0 {
            0.
        } else {
            self.message_duration_ms() / self.message_count as f64
        }
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "✓ Created {} units in {:.2}ms",
            self.created.grouped(),
            self.creation_duration_ms()
        )?;
        if self.underflowed() {
            writeln!(
                f,
                "✗ Only {} of {} units could be created ({} failed)",
                self.created.grouped(),
                self.population_size.grouped(),
                self.creation_failures.grouped()
            )?;
        }
        writeln!(f, "Memory usage: {}", Megabytes(self.resident_memory_bytes))?;
        writeln!(
            f,
            "✓ Sent and received {} messages in {:.2}ms",
            self.message_count.grouped(),
            self.message_duration_ms()
        )?;
        writeln!(
            f,
            "Average response time per message: {:.4}ms",
            self.average_response_ms()
        )?;
        writeln!(
            f,
            "Units created per second: {}",
            rounded(self.units_per_second()).grouped()
        )?;
        write!(
            f,
            "Messages processed per second: {}",
            rounded(self.messages_per_second()).grouped()
        )
    }
}

/// Measurements of one partitioned reduction.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputeReport {
    pub(crate) workers_requested: usize,
    pub(crate) workers_created: usize,
    pub(crate) input_len: usize,
    pub(crate) chunk_size: usize,
    pub(crate) processed: usize,
    pub(crate) dropped: Range<usize>,
    pub(crate) worker_creation: Duration,
    pub(crate) compute: Duration,
    pub(crate) result: i64,
}

impl ComputeReport {
    pub fn workers_requested(&self) -> usize {
        self.workers_requested
    }

    pub fn compute_workers(&self) -> usize {
        self.workers_created
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn dropped(&self) -> Range<usize> {
        self.dropped.clone()
    }

    pub fn worker_creation_duration_ms(&self) -> f64 {
        millis(self.worker_creation)
    }

    pub fn compute_duration_ms(&self) -> f64 {
        millis(self.compute)
    }

    pub fn compute_result(&self) -> i64 {
        self.result
    }
}

impl fmt::Display for ComputeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "✓ Created {} worker units in {:.2}ms",
            self.workers_created.grouped(),
            self.worker_creation_duration_ms()
        )?;
        writeln!(f, "✓ Computed sum of squares: {}", self.result.grouped())?;
        if !self.dropped.is_empty() {
            writeln!(
                f,
                "! Elements {}..{} of {} were not assigned to any worker",
                self.dropped.start,
                self.dropped.end,
                self.input_len.grouped()
            )?;
        }
        write!(
            f,
            "✓ Time taken: {:.2}ms using {} units",
            self.compute_duration_ms(),
            self.workers_created.grouped()
        )
    }
}

/// One population size of a scaling sweep.
#[derive(Debug)]
pub struct Trial {
    pub size: usize,
    pub outcome: Result<BenchmarkReport, BenchError>,
}

impl fmt::Display for Trial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Testing with {} units ---", self.size.grouped())?;
        match &self.outcome {
            Ok(report) => write!(f, "{report}"),
            Err(error) => write!(f, "✗ {} units: {error}", self.size.grouped()),
        }
    }
}

#[derive(Debug)]
pub struct SweepReport {
    pub trials: Vec<Trial>,
}

impl SweepReport {
    pub fn reports(&self) -> impl Iterator<Item = &BenchmarkReport> {
        self.trials.iter().filter_map(|trial| trial.outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &BenchError)> {
        self.trials
            .iter()
            .filter_map(|trial| trial.outcome.as_ref().err().map(|e| (trial.size, e)))
    }
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, trial) in self.trials.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{trial}")?;
        }
        Ok(())
    }
}
