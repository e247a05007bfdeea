//! Command dispatch for the `nameof` CLI.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use super::args::{Arguments, CheckCommand, Command, CommonArgs, TransformCommand};
use super::exit_status::ExitStatus;
use super::report;
use crate::config::{CONFIG_FILE_NAME, Config, default_config_json, load_config};
use crate::files::{BatchResult, replace_in_files, scan_files};
use crate::transform::TransformOptions;

/// Main entry point for the CLI. Dispatches to the command handlers and
/// maps their results to an exit status.
pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match args.command {
        Some(Command::Check(cmd)) => check(cmd),
        Some(Command::Transform(cmd)) => transform(cmd),
        Some(Command::Init) => {
            init()?;
            println!("Created {}", CONFIG_FILE_NAME);
            Ok(ExitStatus::Success)
        }
        None => unreachable!("with_command_or_help guarantees a command"),
    }
}

fn check(cmd: CheckCommand) -> Result<ExitStatus> {
    let config = resolve_config(&cmd.args.common)?;
    let (result, files_checked) = run_batch(&config, cmd.args.common.verbose, false)?;

    if result.error_count() == 0 {
        report::print_success(files_checked, result.files_replaced);
        Ok(ExitStatus::Success)
    } else {
        report::report(&result);
        Ok(ExitStatus::IssuesFound)
    }
}

fn transform(cmd: TransformCommand) -> Result<ExitStatus> {
    let apply = cmd.args.apply;
    let config = resolve_config(&cmd.args.common)?;
    let (result, _) = run_batch(&config, cmd.args.common.verbose, apply)?;

    if result.error_count() > 0 {
        report::report(&result);
        report::print_transform_summary(&result, apply);
        return Ok(ExitStatus::IssuesFound);
    }

    report::print_transform_summary(&result, apply);
    Ok(ExitStatus::Success)
}

fn run_batch(config: &Config, verbose: bool, apply: bool) -> Result<(BatchResult, usize)> {
    let scan = scan_files(&config.source_root, config, verbose);
    if verbose && scan.skipped_count > 0 {
        eprintln!("warning: {} path(s) could not be accessed", scan.skipped_count);
    }

    let options = TransformOptions::with_macro_name(&config.macro_name);
    let result = replace_in_files(&scan.files, &options, apply)?;
    Ok((result, scan.files.len()))
}

fn resolve_config(common: &CommonArgs) -> Result<Config> {
    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    let mut config = load_config(&cwd)?.config;

    // CLI arguments take precedence over the config file
    if let Some(macro_name) = &common.macro_name {
        config.macro_name = macro_name.clone();
    }
    if let Some(source_root) = &common.source_root {
        config.source_root = source_root.to_string_lossy().into_owned();
    }

    config.validate()?;
    Ok(config)
}

fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(config_path, default_config_json()?)?;
    Ok(())
}
