use std::time::Duration;

use anyhow::Context;
use anyhow::bail;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lifeboard::config::Config;
use lifeboard::config::DEFAULT_DENSITY;
use lifeboard::rule_set::RuleSet;
use lifeboard::simulation::Simulation;

const USAGE: &str = "usage: lifeboard [width] [height] [generations] [steps_per_second] [density] [rule]";

/// Boards at most this wide get printed when the run ends
const PRINT_WIDTH: u32 = 120;

struct Args {
    width: u32,
    height: u32,
    generations: u64,
    rate: f64,
    density: f64,
    rule_set: RuleSet,
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        std::process::exit(0);
    }

    if args.len() > 6 {
        bail!("too many arguments\n{USAGE}");
    }

    let arg = |i: usize| args.get(i).map(String::as_str);

    Ok(Args {
        width: arg(0)
            .map_or(Ok(50), str::parse::<u32>)
            .context("Invalid width")?,
        height: arg(1)
            .map_or(Ok(50), str::parse::<u32>)
            .context("Invalid height")?,
        generations: arg(2)
            .map_or(Ok(100), str::parse::<u64>)
            .context("Invalid generation count")?,
        rate: arg(3)
            .map_or(Ok(10.0), str::parse::<f64>)
            .context("Invalid rate")?,
        density: arg(4)
            .map_or(Ok(DEFAULT_DENSITY), str::parse::<f64>)
            .context("Invalid density")?,
        rule_set: arg(5)
            .map_or(Ok(RuleSet::default()), str::parse::<RuleSet>)
            .context("Invalid rule, expected something like b3/s23")?,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args()?;

    let config = Config::new(args.width, args.height).with_rule_set(args.rule_set);
    let mut sim = Simulation::new(config).context("Failed to build the board")?;

    let interval = sim.set_update_interval(args.rate);
    sim.randomize(args.density);

    info!(
        bounds = ?sim.bounds(),
        rule = %args.rule_set,
        population = sim.population(),
        ?interval,
        "starting"
    );

    let generations = sim.subscribe();
    sim.start();

    // generous, so a slow machine doesn't cut the run short
    let timeout = interval * 4 + Duration::from_secs(1);

    while sim.generation() < args.generations {
        let generation = generations
            .recv_timeout(timeout)
            .context("Simulation stopped producing generations")?;

        info!(
            index = generation.index,
            born = generation.born.len(),
            died = generation.died.len(),
            population = sim.population(),
            "generation"
        );

        if generation.is_still() {
            info!(index = generation.index, "board is stable");
            break;
        }
    }

    sim.stop();

    let board = sim.snapshot();
    info!(
        generation = board.generation(),
        population = board.population(),
        "done"
    );

    if board.bounds().width() <= PRINT_WIDTH {
        println!("{board}");
    }

    Ok(())
}
