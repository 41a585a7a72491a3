//! Contest I/O binary (ยง10.5): runs the online turn-by-turn driver mode
//! against stdin/stdout.

use std::io::{BufReader, Write, stdin, stdout};
use std::time::Duration;

use anyhow::Context;
use lunar_lander::contest_io::{read_terrain, read_turn, write_decision};
use lunar_lander::driver::Driver;
use lunar_lander::parameters::Parameters;

/// Spent evolving before the first decision is due.
const INITIAL_BUDGET: Duration = Duration::from_millis(1000);
/// Spent evolving before each subsequent decision.
const PER_TURN_BUDGET: Duration = Duration::from_millis(100);

fn main() {
    if let Err(e) = fallible_main() {
        eprintln!("fatal: {e:?}");
        std::process::exit(1);
    }
}

fn fallible_main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let seed = parse_seed_flag(&args)?;
    let params = Parameters::load("ga_params.ini")?;

    let stdin = stdin();
    let mut reader = BufReader::new(stdin.lock());
    let stdout = stdout();
    let mut writer = stdout.lock();

    let terrain = read_terrain(&mut reader)?;

    let Some(first_state) = read_turn(&mut reader)? else {
        eprintln!("contest stdin closed before the first turn");
        return Ok(());
    };

    let mut driver = Driver::new(terrain, first_state, params, seed);
    let mut budget = INITIAL_BUDGET;
    let mut state = first_state;

    loop {
        let decision = driver.run_online_turn(state, budget);
        write_decision(&mut writer, decision)?;
        writer.flush()?;

        budget = PER_TURN_BUDGET;
        match read_turn(&mut reader)? {
            Some(next_state) => state = next_state,
            None => break,
        }
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
