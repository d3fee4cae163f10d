//! Command line front end: load a maze image, solve it, write the solution.
//!
//! Exit status is 0 when solved, 1 when the maze cannot be solved and 2 on any error.

mod options;

use std::process::ExitCode;

use anyhow::Context;
use log::{error, info, warn, LevelFilter};
use options::Options;
use solver::{
    solve,
    util::{format_for, save_image},
    MazeImage, Outcome,
};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match Options::parse_from_args(&args) {
        Ok(options) => options,
        Err(e) => match e.downcast::<clap::Error>() {
            // prints help/version or usage and exits with clap's own status
            Ok(clap_error) => clap_error.exit(),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                return ExitCode::from(2);
            }
        },
    };

    let env = env_logger::Env::default().default_filter_or("info");
    let mut logger = env_logger::Builder::from_env(env);
    match options.verbosity {
        0 => {}
        1 => {
            logger.filter_level(LevelFilter::Debug);
        }
        _ => {
            logger.filter_level(LevelFilter::Trace);
        }
    }
    logger.init();

    match run(&options) {
        Ok(Outcome::Solved) => ExitCode::SUCCESS,
        Ok(Outcome::Unsolvable) => {
            println!("This maze cannot be solved");
            ExitCode::from(1)
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(options: &Options) -> anyhow::Result<Outcome> {
    let maze = MazeImage::open(&options.source)?;
    let start = maze.grid().find_start()?;
    info!("starting at {} in {:?}", start, options.source);

    let solution = solve(maze.grid(), start, &options.config)
        .context("the wall follower hit an internal error")?;
    let format = options.format.unwrap_or_else(|| format_for(&options.dest));

    match solution.outcome {
        Outcome::Solved => {
            save_image(maze.render(&solution.overlay), &options.dest, format)?;
            info!(
                "solved, {} path cells written to {:?}",
                solution.overlay.marked().count(),
                options.dest
            );
        }
        Outcome::Unsolvable if options.save_partial => {
            save_image(maze.render(&solution.overlay), &options.dest, format)?;
            warn!(
                "no solution; partial walk written to {:?} for inspection",
                options.dest
            );
        }
        Outcome::Unsolvable => {}
    }

    Ok(solution.outcome)
}
