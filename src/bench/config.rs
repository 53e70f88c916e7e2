use typed_builder::TypedBuilder;

/// Knobs for a benchmark session. The defaults reproduce the standard run:
/// a 10-unit benchmark, a sweep from 10 to 100,000 units, the
/// million-unit challenge and a 10-worker reduction over `1..=1000`.
#[derive(Clone, Debug, TypedBuilder)]
pub struct BenchConfig {
    #[builder(default = "swarm_benchmark".into(), setter(into))]
    pub system_name: String,
    #[builder(default = "benchmark_cookie".into(), setter(into))]
    pub cookie: String,
    /// Used for the compute demo when no benchmark system exists yet.
    #[builder(default = "swarm_compute".into(), setter(into))]
    pub compute_system_name: String,
    #[builder(default = "compute_cookie".into(), setter(into))]
    pub compute_cookie: String,
    #[builder(default = 10)]
    pub default_units: usize,
    #[builder(default = vec![10, 50, 100, 1_000, 10_000, 100_000])]
    pub sweep_sizes: Vec<usize>,
    #[builder(default = 1_000_000)]
    pub challenge_units: usize,
    /// The compute input is `1..=compute_input_len`.
    #[builder(default = 1_000)]
    pub compute_input_len: usize,
    #[builder(default = 10)]
    pub compute_workers: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
