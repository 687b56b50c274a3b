/*!
Command layer: registry -> clap tree -> resolved leaf -> dispatch.

Layout:
  src/cmd/
    mod.rs        (this file: clap tree construction, resolution, dry-run)
    registry.rs   (static command tree, bound argument vectors)
    dispatch.rs   (child process execution + outcome)
    format.rs     (stderr styling)

The clap `Command` is derived from the registry, never written by hand, so a
new leaf in `registry.rs` shows up in parsing and help automatically.
*/

pub mod dispatch;
pub mod format;
pub mod registry;

use anyhow::{Context, Result};
use clap::{ArgMatches, Command};
use serde::Serialize;

pub use dispatch::{DispatchRequest, ExecutionOutcome, dispatch};
pub use registry::CommandNode;

/// Attach `node`'s usage and children to an existing clap command.
///
/// Groups require a subcommand and print their help when invoked bare;
/// leaves take no arguments of their own.
pub fn attach(command: Command, node: &CommandNode) -> Command {
    let command = command.about(node.usage);
    if node.is_leaf() {
        return command;
    }
    node.children().iter().fold(
        command
            .subcommand_required(true)
            .arg_required_else_help(true),
        |cmd, child| cmd.subcommand(node_command(child)),
    )
}

/// Standalone clap command for a single node (and its subtree).
pub fn node_command(node: &CommandNode) -> Command {
    attach(Command::new(node.name), node)
}

/// Follow the chain of matched subcommands and return the path taken
/// together with the registry node it names.
pub fn resolve<'a>(
    root: &'a CommandNode,
    matches: &ArgMatches,
) -> Option<(Vec<String>, &'a CommandNode)> {
    let mut path = Vec::new();
    let mut current = matches;
    while let Some((name, sub)) = current.subcommand() {
        path.push(name.to_string());
        current = sub;
    }
    root.find(&path).map(|node| (path, node))
}

/// Dispatch request for a resolved leaf.
///
/// Groups never get here through the CLI (clap requires a subcommand and
/// shows help instead), so a group is reported as an error.
pub fn leaf_request(node: &CommandNode) -> Result<DispatchRequest> {
    let bound = node
        .bound_args()
        .with_context(|| format!("'{}' is a command group, not a runnable command", node.name))?;
    Ok(DispatchRequest::new(bound.iter().copied())?)
}

#[derive(Serialize)]
struct DryRun<'a> {
    command: &'a [String],
    argv: &'a [String],
}

/// What `--dry-run` prints: the shell-quoted command line, or JSON.
pub fn render_dry_run(path: &[String], request: &DispatchRequest, json: bool) -> Result<String> {
    if json {
        let payload = DryRun {
            command: path,
            argv: request.argv(),
        };
        return serde_json::to_string_pretty(&payload).context("Failed to render dry-run JSON");
    }
    Ok(request.command_line())
}

/* ---- Tests ---- */
