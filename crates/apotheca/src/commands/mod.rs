//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod diseases;
pub mod medicines;
pub mod mirror;
pub mod stats;
pub mod util;

use apotheca_core::{Controller, StoreConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Run a store-bound command against a freshly initialized controller.
///
/// The controller is shut down (flushing the mirror) whether or not the
/// handler succeeds. Any advisory raised during load or by the command
/// itself is reported on stderr.
pub async fn dispatch(
    cmd: Command,
    config: StoreConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    Controller::oneshot(config, |controller| async move {
        let on_load = controller.advisory();
        if let Some(ref advisory) = on_load {
            output::print_advisory(advisory, global);
        }

        let result = match cmd {
            Command::Medicines(args) => medicines::handle(&controller, args, global).await,
            Command::Diseases(args) => diseases::handle(&controller, args, global).await,
            Command::Stats => stats::handle(&controller, global),
            // Config, Mirror and Completions are handled before dispatch
            Command::Config(_) | Command::Mirror(_) | Command::Completions(_) => Err(
                CliError::Internal("command does not run against the store".into()),
            ),
        };

        let after = controller.advisory();
        if after != on_load {
            if let Some(ref advisory) = after {
                output::print_advisory(advisory, global);
            }
        }
        result
    })
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    #[tokio::test]
    async fn storeless_commands_are_refused() {
        let data = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(
            "http://127.0.0.1:1/api/medicines".parse().unwrap(),
            data.path(),
        )
        .with_timeout(Duration::from_secs(1));
        let cli = Cli::try_parse_from(["apotheca", "-q", "config", "path"]).unwrap();

        let err = dispatch(cli.command, config, &cli.global).await.unwrap_err();
        assert!(matches!(err, CliError::Internal(_)), "got: {err:?}");
    }
}
