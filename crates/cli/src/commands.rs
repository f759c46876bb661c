//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("replikit")
        .about("Apply, compare and verify replicated documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .help("Config file (default: ./replikit.toml if present)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_apply())
        .subcommand(build_compare())
        .subcommand(build_verify())
        .subcommand(build_init())
}

fn dataset_arg() -> Arg {
    Arg::new("dataset")
        .long("dataset")
        .help("Dataset directory holding blobs/ (overrides config)")
}

fn build_apply() -> Command {
    Command::new("apply")
        .about("Apply a delta to a document and print the result")
        .arg(
            Arg::new("doc")
                .long("doc")
                .help("Document JSON file (default: empty document)"),
        )
        .arg(
            Arg::new("delta")
                .long("delta")
                .required(true)
                .help("Delta JSON file with updatedProperties/removedProperties/updatedBlobs"),
        )
        .arg(dataset_arg())
}

fn build_compare() -> Command {
    Command::new("compare")
        .about("Compare two documents; exits 1 on mismatch")
        .arg(Arg::new("expected").required(true).help("Expected document JSON file"))
        .arg(Arg::new("actual").required(true).help("Actual document JSON file"))
}

fn build_verify() -> Command {
    Command::new("verify")
        .about("Verify an after-state against a before-state and changes; exits 1 on failure")
        .arg(
            Arg::new("before")
                .long("before")
                .required(true)
                .help("JSON object of document id to document (or null) before the changes"),
        )
        .arg(
            Arg::new("changes")
                .long("changes")
                .required(true)
                .help("JSON array of update items"),
        )
        .arg(
            Arg::new("after")
                .long("after")
                .required(true)
                .help("JSON object of document id to document (or null) after replication"),
        )
        .arg(dataset_arg())
}

fn build_init() -> Command {
    Command::new("init")
        .about("Write a default replikit.toml if none exists")
        .arg(Arg::new("path").help("Config file path (default: ./replikit.toml)"))
}
