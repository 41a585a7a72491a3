//! Offline fixture tool (ยง10.5): loads a map fixture, runs the evolutionary
//! engine to convergence (or a generation cap), and prints diagnostics.

use std::time::Instant;

use anyhow::Context;
use lunar_lander::driver::Driver;
use lunar_lander::map::load_fixture;
use lunar_lander::parameters::Parameters;
use lunar_lander::physics::TerminalStatus;

fn main() {
    if let Err(e) = fallible_main() {
        eprintln!("fatal: {e:?}");
        std::process::exit(1);
    }
}

fn fallible_main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let fixture_path = args
        .get(1)
        .context("usage: lander_offline <fixture-path> [--seed <n>]")?;
    let seed = parse_seed_flag(&args)?;

    let (initial, terrain) = load_fixture(fixture_path)?;
    let params = Parameters::load("ga_params.ini")?;
    let generation_cap = params.generation_cap;

    let mut driver = Driver::new(terrain, initial, params, seed);

    let started = Instant::now();
    let summary = driver.run_offline(generation_cap);
    let elapsed = started.elapsed();

    eprintln!(
        "generation {}: best score {:.3}, status {:?}, elapsed {:?}",
        summary.generation_index, summary.best_score, summary.best_trajectory.status, elapsed
    );

    if summary.best_trajectory.status == TerminalStatus::Landed {
        eprintln!("landed with {:.1} fuel remaining", summary.best_trajectory.last().fuel);
    } else {
        eprintln!("no landing found within the generation budget");
    }

    for decision in &summary.best_trajectory.decisions {
        println!("{} {}", decision.rotate, decision.power);
    }

    Ok(())
}

/// Reads an optional `--seed <n>` flag. Without it the RNG draws from OS
/// entropy (ยง4.B); the flag exists for reproducing a specific run.
fn parse_seed_flag(args: &[String]) -> anyhow::Result<Option<u64>> {
    let Some(index) = args.iter().position(|a| a == "--seed") else {
        return Ok(None);
    };
    let raw = args.get(index + 1).context("--seed requires a value")?;
    let seed = raw.parse::<u64>().context("--seed value must be a non-negative integer")?;
    Ok(Some(seed))
}
