//! Command dispatch: bridges CLI args -> coordinator -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod util;
pub mod validate;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a monitor command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Check(args) => check::handle(args, global).await,
        Command::Watch(args) => watch::handle(args, global).await,
        Command::Validate => validate::handle(global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
