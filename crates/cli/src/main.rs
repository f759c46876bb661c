//! replikit CLI: apply deltas to documents, compare documents and verify
//! replicated state offline.
//!
//! Commands:
//! - `replikit apply --doc doc.json --delta delta.json`
//! - `replikit compare expected.json actual.json`
//! - `replikit verify --before b.json --changes c.json --after a.json`
//! - `replikit init [path]`

mod commands;
mod format;
mod parse;
mod run;

use std::path::{Path, PathBuf};
use std::process;

use clap::ArgMatches;
use replikit_engine::{init_logging, ServerConfig, CONFIG_FILE_NAME};

use commands::build_cli;
use format::{format_error, OutputMode};
use parse::matches_to_action;

fn main() {
    let matches = build_cli().get_matches();

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(1);
        }
    };
    init_logging(&config);

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match run::run(action, config, output_mode) {
        Ok(outcome) => {
            println!("{}", outcome.output);
            if !outcome.success {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(1);
        }
    }
}

/// Load `--config`, else `./replikit.toml` if present, else defaults.
fn load_config(matches: &ArgMatches) -> anyhow::Result<ServerConfig> {
    let explicit = matches.get_one::<String>("config").map(PathBuf::from);
    let path = match explicit {
        Some(path) => path,
        None if Path::new(CONFIG_FILE_NAME).exists() => PathBuf::from(CONFIG_FILE_NAME),
        None => return Ok(ServerConfig::default()),
    };
    Ok(ServerConfig::from_file(&path)?)
}
