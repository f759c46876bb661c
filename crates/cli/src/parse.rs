//! ArgMatches → CliAction conversion.

use std::path::PathBuf;

use clap::ArgMatches;

/// A parsed CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Apply {
        doc: Option<PathBuf>,
        delta: PathBuf,
        dataset: Option<PathBuf>,
    },
    Compare {
        expected: PathBuf,
        actual: PathBuf,
    },
    Verify {
        before: PathBuf,
        changes: PathBuf,
        after: PathBuf,
        dataset: Option<PathBuf>,
    },
    Init {
        path: Option<PathBuf>,
    },
}

/// Convert top-level matches into an action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| "No command given".to_string())?;
    match name {
        "apply" => Ok(CliAction::Apply {
            doc: optional_path(sub, "doc"),
            delta: required_path(sub, "delta")?,
            dataset: optional_path(sub, "dataset"),
        }),
        "compare" => Ok(CliAction::Compare {
            expected: required_path(sub, "expected")?,
            actual: required_path(sub, "actual")?,
        }),
        "verify" => Ok(CliAction::Verify {
            before: required_path(sub, "before")?,
            changes: required_path(sub, "changes")?,
            after: required_path(sub, "after")?,
            dataset: optional_path(sub, "dataset"),
        }),
        "init" => Ok(CliAction::Init {
            path: optional_path(sub, "path"),
        }),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn optional_path(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
    matches.get_one::<String>(id).map(PathBuf::from)
}

fn required_path(matches: &ArgMatches, id: &str) -> Result<PathBuf, String> {
    optional_path(matches, id).ok_or_else(|| format!("Missing required argument: {}", id))
}
