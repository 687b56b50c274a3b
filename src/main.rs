use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use std::process::ExitCode;

mod cmd;
mod utils;

use cmd::format::{Role, StyleOptions, diagnostic};
use cmd::{CommandNode, ExecutionOutcome, registry};

/// kcompose - dispatch topic commands to external tools
///
/// Command layout (from `cmd/registry.rs`):
///   kcompose topic list
///
/// Each leaf runs a fixed, built-in command line with stdin/stdout/stderr
/// passed straight through; the child's exit status becomes ours.
///
/// Global flags:
///   --verbose       Increase diagnostic output on stderr (repeatable)
///   -q / --quiet    Errors only
///   -n / --dry-run  Print the bound command instead of running it
///   --json          Dry-run output as JSON
///
/// Exit status:
///   child's own code | 1 launch failure | 2 usage | 128+N killed by signal N
#[derive(Parser, Debug)]
#[command(
    name = "kcompose",
    version,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (--verbose, --verbose --verbose)
    #[arg(long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print the bound command line instead of running it
    #[arg(short = 'n', long = "dry-run", global = true)]
    dry_run: bool,

    /// With --dry-run, print the resolved request as JSON
    #[arg(long, global = true)]
    json: bool,
}

/// Full clap command: global flags from `Cli`, tree from the registry.
fn build_command(root: &CommandNode) -> clap::Command {
    let command = Cli::command().arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .action(ArgAction::Version)
            .help("Print version"),
    );
    cmd::attach(command, root)
}

fn main() -> ExitCode {
    let root = registry::build();
    let matches = build_command(&root).get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    utils::init_logging(utils::derive_level(cli.verbose, cli.quiet));

    match run(&cli, &root, &matches) {
        Ok(code) => code,
        Err(e) => {
            report(Role::Error, "error", format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, root: &CommandNode, matches: &ArgMatches) -> Result<ExitCode> {
    let (path, node) =
        cmd::resolve(root, matches).context("Matched command is not in the registry")?;
    log_trace!("registered leaves: {:?}", root.leaves());
    log_trace!("resolved command path: {:?}", path);

    let request = cmd::leaf_request(node)?;

    if cli.dry_run {
        println!("{}", cmd::render_dry_run(&path, &request, cli.json)?);
        log_info!("dry run: '{}' not executed", path.join(" "));
        return Ok(ExitCode::SUCCESS);
    }

    log_debug!("dispatching `{}` for '{}'", request.command_line(), path.join(" "));
    let outcome = cmd::dispatch(&request)?;
    log_debug!("`{}` {}", request.program(), outcome);

    match &outcome {
        ExecutionOutcome::LaunchFailed { .. } => report(Role::Error, "error", outcome.to_string()),
        ExecutionOutcome::Signaled(_) => {
            report(Role::Warning, "warn", format!("'{}' {}", request.program(), outcome))
        }
        ExecutionOutcome::Exited(_) if !outcome.is_success() => {
            log_debug!("propagating child exit status {}", outcome.exit_code())
        }
        ExecutionOutcome::Exited(_) => {}
    }

    Ok(ExitCode::from(outcome.exit_code()))
}

/// User-facing diagnostic on stderr, regardless of log level.
fn report(role: Role, tag: &str, message: impl AsRef<str>) {
    eprintln!("{}", diagnostic(role, tag, message, &StyleOptions::detect()));
}
