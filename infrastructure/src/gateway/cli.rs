//! Generation gateway backed by external CLI agents
//!
//! Each backend is a command that reads the prompt on stdin and writes the
//! reply to stdout.

use async_trait::async_trait;
use colloquy_application::{GatewayError, Generation, GenerationGateway, GenerationRequest};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Stderr kept in error messages
const MAX_STDERR_CHARS: usize = 500;

/// How to invoke one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliBackend {
    pub command: String,
    pub args: Vec<String>,
    /// Flag placed before the model name; the model is dropped without one
    pub model_flag: Option<String>,
}

impl CliBackend {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            model_flag: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_model_flag(mut self, flag: impl Into<String>) -> Self {
        self.model_flag = Some(flag.into());
        self
    }

    fn command_for(&self, request: &GenerationRequest) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args);
        if let (Some(flag), Some(model)) = (&self.model_flag, &request.model) {
            cmd.arg(flag).arg(model);
        }
        if let Some(dir) = &request.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the call future (cancellation, timeout) kills the process
            .kill_on_drop(true);
        cmd
    }
}

/// Gateway running each backend as a subprocess
pub struct CliGenerationGateway {
    backends: BTreeMap<String, CliBackend>,
}

impl CliGenerationGateway {
    pub fn new(backends: BTreeMap<String, CliBackend>) -> Self {
        Self { backends }
    }

    pub fn backend_ids(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    fn backend(&self, id: &str) -> Result<&CliBackend, GatewayError> {
        self.backends
            .get(id)
            .ok_or_else(|| GatewayError::UnknownBackend(id.to_string()))
    }
}

#[async_trait]
impl GenerationGateway for CliGenerationGateway {
    async fn execute(
        &self,
        backend: &str,
        request: GenerationRequest,
    ) -> Result<Generation, GatewayError> {
        let cli = self.backend(backend)?;
        let started = Instant::now();
        debug!(
            "Running {} ({} prompt bytes, model {:?})",
            cli.command,
            request.prompt.len(),
            request.model
        );

        let mut child = cli.command_for(&request).spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                GatewayError::Unavailable(format!("{}: command '{}' not found", backend, cli.command))
            } else {
                GatewayError::RequestFailed(format!("{}: failed to spawn: {}", backend, e))
            }
        })?;

        let stdin = child.stdin.take();
        let prompt = request.prompt.into_bytes();
        let write = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&prompt).await?;
                stdin.shutdown().await?;
            }
            Ok::<_, std::io::Error>(())
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());

        let output = output
            .map_err(|e| GatewayError::RequestFailed(format!("{}: {}", backend, e)))?;
        if let Err(e) = written {
            // A backend may exit before reading everything; its exit status decides
            debug!("{}: writing prompt failed: {}", backend, e);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr: String = stderr.trim().chars().take(MAX_STDERR_CHARS).collect();
            warn!("{} exited with {}", backend, output.status);
            return Err(GatewayError::RequestFailed(format!(
                "{} exited with {}: {}",
                backend, output.status, stderr
            )));
        }

        let content = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if content.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }

        let elapsed = started.elapsed();
        debug!("{} replied with {} bytes in {:?}", backend, content.len(), elapsed);
        Ok(Generation {
            content,
            metadata: Some(serde_json::json!({
                "backend": backend,
                "command": cli.command,
                "duration_ms": elapsed.as_millis() as u64,
            })),
        })
    }

    fn knows_backend(&self, backend: &str) -> bool {
        self.backends.contains_key(backend)
    }

    async fn is_available(&self, backend: &str) -> bool {
        self.backends
            .get(backend)
            .is_some_and(|cli| which::which(&cli.command).is_ok())
    }
}
