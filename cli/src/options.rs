//! Command line options.
//! `mazesolve <SOURCE> <DEST> [--format ext] [--config file] [--max-iterations n] [--save-partial] [-v]`

use std::path::PathBuf;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use image::ImageFormat;
use solver::SolverConfig;

fn make_options_parser() -> clap::Command {
    Command::new("mazesolve")
        .no_binary_name(true)
        .version("v0.1.0")
        .about("Solves a maze image by following its walls")
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .help("Maze image: black walls, one red start pixel, one blue goal pixel")
                .required(true),
        )
        .arg(
            Arg::new("dest")
                .value_name("DEST")
                .help("Where to write the solved image")
                .required(true),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("EXT")
                .help("Output image format by extension, e.g. png or bmp (default: from DEST)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("JSON file with solver settings"),
        )
        .arg(
            Arg::new("max-iterations")
                .long("max-iterations")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Hard cap on solve loop iterations"),
        )
        .arg(
            Arg::new("save-partial")
                .long("save-partial")
                .action(ArgAction::SetTrue)
                .help("Also write the explored path when the maze cannot be solved"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("More log output (-v debug, -vv trace)"),
        )
}

#[derive(Debug)]
pub struct Options {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub format: Option<ImageFormat>,
    pub config: SolverConfig,
    pub save_partial: bool,
    pub verbosity: u8,
}

impl Options {
    pub fn parse_from_args(flags: &[String]) -> anyhow::Result<Self> {
        let matches = make_options_parser().try_get_matches_from(flags.iter())?;

        let path = |id: &str| matches.get_one::<String>(id).map(PathBuf::from);
        let source = path("source").context("missing SOURCE")?;
        let dest = path("dest").context("missing DEST")?;

        let format = matches
            .get_one::<String>("format")
            .map(|ext| {
                ImageFormat::from_extension(ext)
                    .with_context(|| format!("unsupported image format: {}", ext))
            })
            .transpose()?;

        let mut config = match path("config") {
            Some(file) => {
                let text = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read config {:?}", file))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid config {:?}", file))?
            }
            None => SolverConfig::default(),
        };
        if let Some(max) = matches.get_one::<usize>("max-iterations") {
            config.max_iterations = Some(*max);
        }

        Ok(Options {
            source,
            dest,
            format,
            config,
            save_partial: matches.get_flag("save-partial"),
            verbosity: matches.get_count("verbose"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn test_parse_positionals() {
        let options = Options::parse_from_args(&args("maze.png solved.png")).unwrap();

        assert_eq!(options.source, PathBuf::from("maze.png"));
        assert_eq!(options.dest, PathBuf::from("solved.png"));
        assert_eq!(options.format, None);
        assert_eq!(options.config, SolverConfig::default());
        assert!(!options.save_partial);
        assert_eq!(options.verbosity, 0);
    }

    #[test]
    fn test_parse_flags() {
        let options = Options::parse_from_args(&args(
            "maze.png out -f bmp --max-iterations 50 --save-partial -vv",
        ))
        .unwrap();

        assert_eq!(options.format, Some(ImageFormat::Bmp));
        assert_eq!(options.config.max_iterations, Some(50));
        assert!(options.save_partial);
        assert_eq!(options.verbosity, 2);
    }

    #[test]
    fn test_parse_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("solver.json");
        std::fs::write(&file, r#"{"iterations_per_cell": 9}"#).unwrap();

        let options = Options::parse_from_args(&[
            "maze.png".to_owned(),
            "out.png".to_owned(),
            "--config".to_owned(),
            file.to_string_lossy().into_owned(),
        ])
        .unwrap();

        assert_eq!(options.config.iterations_per_cell, 9);
        assert_eq!(options.config.max_iterations, None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Options::parse_from_args(&args("maze.png")).is_err());
        assert!(Options::parse_from_args(&args("maze.png out.png -f nope")).is_err());
        assert!(Options::parse_from_args(&args("maze.png out.png --max-iterations many")).is_err());
        assert!(Options::parse_from_args(&args(
            "maze.png out.png --config /nonexistent/mazesolve.json"
        ))
        .is_err());
    }
}
