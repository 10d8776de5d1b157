use lspnav_core::config::LspConfig;
use lspnav_core::error::ProviderError;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info};

pub(crate) struct LaunchedServer {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
}

/// Spawn the configured language server with piped stdio. Its stderr is forwarded
/// to the debug log line by line.
pub(crate) fn spawn_language_server(
    config: &LspConfig,
    workspace: &Path,
) -> Result<LaunchedServer, ProviderError> {
    let mut child = build_server_command(config, workspace)
        .spawn()
        .map_err(|e| ProviderError::Spawn {
            command: config.command.clone(),
            reason: e.to_string(),
        })?;

    let missing = |stream: &str| ProviderError::Spawn {
        command: config.command.clone(),
        reason: format!("{stream} was not captured"),
    };
    let stdin = child.stdin.take().ok_or_else(|| missing("stdin"))?;
    let stdout = child.stdout.take().ok_or_else(|| missing("stdout"))?;

    if let Some(stderr) = child.stderr.take() {
        let command = config.command.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(server = %command, "{line}");
            }
        });
    }

    info!(
        command = %config.command,
        args = ?config.args,
        pid = child.id(),
        "Started language server"
    );
    Ok(LaunchedServer {
        child,
        stdin,
        stdout,
    })
}

fn build_server_command(config: &LspConfig, workspace: &Path) -> Command {
    let mut cmd = Command::new(&config.command);
    cmd.args(&config.args)
        .current_dir(workspace)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let config = LspConfig {
            command: "lspnav-definitely-not-installed".into(),
            ..LspConfig::default()
        };
        let tmp = tempfile::tempdir().unwrap();
        let err = spawn_language_server(&config, tmp.path())
            .err()
            .unwrap();
        assert!(matches!(err, ProviderError::Spawn { .. }));
        assert!(err.to_string().contains("lspnav-definitely-not-installed"));
    }

    #[test]
    fn command_carries_args_and_workspace() {
        let config = LspConfig {
            command: "typescript-language-server".into(),
            args: vec!["--stdio".into()],
            ..LspConfig::default()
        };
        let cmd = build_server_command(&config, Path::new("/work"));
        let std_cmd = cmd.as_std();
        assert_eq!(std_cmd.get_program(), "typescript-language-server");
        assert_eq!(std_cmd.get_args().collect::<Vec<_>>(), vec!["--stdio"]);
        assert_eq!(std_cmd.get_current_dir(), Some(Path::new("/work")));
    }
}
