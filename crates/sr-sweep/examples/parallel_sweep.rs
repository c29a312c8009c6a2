use rand::Rng;
use sr_sweep::{seeding, SweepRunner};
use sr_types::{ConcreteConfig, SweepSpace};

fn train(config: &ConcreteConfig) -> sr_types::SweepResult<()> {
    let lr = config.get_f64("lr").unwrap_or(1e-3);
    let batch_size = config.get_int("batch_size").unwrap_or(32);
    let augment = config.get_bool("augment").unwrap_or(false);

    // Stand-in for a real training run: a seeded draw per job.
    let noise: f64 = seeding::with_rng(|rng| rng.random());
    let score = 1.0 / lr.log10().abs() + noise * 0.01;

    println!("lr={lr} batch_size={batch_size} augment={augment} -> score {score:.4}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let space = SweepSpace::new()
        .add_floats("lr", [1e-3, 1e-2, 1e-1])
        .add_ints("batch_size", [32, 64, 128, 256])
        .add_bools("augment", [true, false]);

    let report = SweepRunner::new(space)
        .with_repeat(2)
        .with_workers(4)
        .run_parallel(train)?;

    println!(
        "dispatched {} runs on {} workers ({} filtered out)",
        report.dispatched, report.workers, report.skipped
    );
    Ok(())
}
