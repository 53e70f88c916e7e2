use argh::FromArgs;
use swarm::bench::{BenchConfig, Benchmark};
use swarm::fmt::GroupedDisplayExt;
use swarm::runtime::{LocalRuntime, LocalRuntimeConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Scalability benchmark for actor-style units.
#[derive(FromArgs)]
struct Args {
    /// population of the first benchmark
    #[argh(option, default = "10")]
    units: usize,

    /// number of worker units for the computation demo
    #[argh(option, default = "10")]
    workers: usize,

    /// cap on units per system, past which creation fails
    #[argh(option)]
    max_units: Option<usize>,

    /// skip the scaling sweep
    #[argh(switch)]
    skip_sweep: bool,

    /// skip the million-unit challenge
    #[argh(switch)]
    skip_challenge: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Args = argh::from_env();

    let runtime = LocalRuntime::new(LocalRuntimeConfig {
        max_units: args.max_units,
    });
    let config = BenchConfig::builder()
        .default_units(args.units)
        .compute_workers(args.workers)
        .build();
    let mut bench = Benchmark::new(runtime, config);

    println!("=== Swarm Benchmark ===\n");

    println!(
        "Starting benchmark with {} units...",
        bench.config().default_units.grouped()
    );
    match bench.run_default_benchmark().await {
        Ok(report) => println!("{report}"),
        Err(e) => {
            error!(phase = e.phase(), "benchmark failed");
            println!("Benchmark failed: {e}");
            return;
        }
    }

    if !args.skip_sweep {
        println!("\n=== Scaling Test ===");
        println!("{}", bench.scaling_test().await);
    }

    if !args.skip_challenge {
        let target = bench.config().challenge_units;
        println!("\n=== Million Unit Challenge ===");
        println!("Attempting to create {} units...", target.grouped());
        match bench.million_unit_challenge().await {
            Ok(report) => {
                if report.underflowed() {
                    println!(
                        "✗ Failed to create {} units: only {} came into existence",
                        target.grouped(),
                        report.created().grouped()
                    );
                }
                println!("{report}");
            }
            Err(e) => println!("✗ Failed to create {} units: {e}", target.grouped()),
        }
    }

    println!("\n=== Concurrent Computation Demo ===");
    println!(
        "Computing sum of squares using {} worker units",
        bench.config().compute_workers.grouped()
    );
    match bench.concurrent_computation_demo().await {
        Ok(report) => println!("{report}"),
        Err(e) => println!("Computation failed: {e}"),
    }
}
