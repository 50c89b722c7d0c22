//! Gateway to the external analyzer process.
//!
//! One call spawns one child, captures stdout and stderr under a fixed cap,
//! and waits for exit. The gateway holds no mutable state, so concurrent
//! calls for different requests are independent.

use std::ffi::OsString;
use std::fmt;
use std::future::Future;
use std::process::Stdio;

use governor_types::AnalysisRequest;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Per-stream capture cap. Exceeding it fails the invocation.
pub const OUTPUT_LIMIT_BYTES: usize = 1024 * 1024;

/// Format flag value requesting the structured result contract.
const OUTPUT_FORMAT: &str = "json";

const READ_CHUNK_BYTES: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The process could not run, or exited abnormally without stdout.
    #[error("{message}")]
    ProcessFailure { message: String },
    #[error("analyzer {stream} exceeded the {limit}-byte capture limit")]
    OutputLimitExceeded { stream: OutputStream, limit: usize },
}

impl GatewayError {
    fn process(message: impl Into<String>) -> Self {
        Self::ProcessFailure {
            message: message.into(),
        }
    }
}

/// Text captured from the analyzer's stdout. May or may not be JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnalysisOutput {
    text: String,
    exit_code: Option<i32>,
    success: bool,
}

impl RawAnalysisOutput {
    #[must_use]
    pub fn new(text: impl Into<String>, exit_code: Option<i32>, success: bool) -> Self {
        Self {
            text: text.into(),
            exit_code,
            success,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// False when the process failed but still produced stdout.
    #[must_use]
    pub fn exited_cleanly(&self) -> bool {
        self.success
    }
}

/// Anything that can turn an [`AnalysisRequest`] into raw analyzer output.
///
/// [`AnalyzerGateway`] is the process-backed implementation; the seam exists
/// so orchestration can be driven without a real analyzer.
pub trait Analyzer: Send + Sync + 'static {
    fn invoke(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = Result<RawAnalysisOutput, GatewayError>> + Send;
}

/// Program plus the arguments that precede the document path.
///
/// For the Python analyzer this is `python -m api_governor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerCommand {
    program: String,
    leading_args: Vec<String>,
}

impl AnalyzerCommand {
    #[must_use]
    pub fn new(program: impl Into<String>, leading_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            leading_args,
        }
    }

    /// `<python> -m <module>`.
    #[must_use]
    pub fn python_module(python: impl Into<String>, module: impl Into<String>) -> Self {
        Self::new(python, vec!["-m".to_string(), module.into()])
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument vector for one request.
    ///
    /// Mode-specific flags only appear for their mode: `--baseline` for diff,
    /// `--output-dir` for report.
    #[must_use]
    pub fn args_for(&self, request: &AnalysisRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.leading_args.iter().map(OsString::from).collect();
        args.push(request.document_path().as_os_str().to_owned());
        args.push("--policy".into());
        args.push(request.policy().into());
        args.push("--output-format".into());
        args.push(OUTPUT_FORMAT.into());
        if let Some(baseline) = request.baseline_path() {
            args.push("--baseline".into());
            args.push(baseline.as_os_str().to_owned());
        }
        if let Some(output_dir) = request.output_dir() {
            args.push("--output-dir".into());
            args.push(output_dir.as_os_str().to_owned());
        }
        args
    }
}

/// Process-backed [`Analyzer`].
#[derive(Debug, Clone)]
pub struct AnalyzerGateway {
    command: AnalyzerCommand,
    output_limit: usize,
}

impl AnalyzerGateway {
    #[must_use]
    pub fn new(command: AnalyzerCommand) -> Self {
        Self {
            command,
            output_limit: OUTPUT_LIMIT_BYTES,
        }
    }

    #[must_use]
    pub fn with_output_limit(mut self, limit: usize) -> Self {
        self.output_limit = limit.max(1);
        self
    }

    pub async fn run(&self, request: &AnalysisRequest) -> Result<RawAnalysisOutput, GatewayError> {
        let program_name = self.command.program();
        let program = which::which(program_name)
            .map_err(|_| GatewayError::process(format!("{program_name} not found in PATH")))?;
        let args = self.command.args_for(request);

        tracing::debug!(
            program = %program.display(),
            args = args.len(),
            mode = %request.mode(),
            document = %request.document_path().display(),
            "Spawning analyzer"
        );

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GatewayError::process(format!("failed to spawn {}: {e}", program.display()))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GatewayError::process("failed to capture analyzer stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| GatewayError::process("failed to capture analyzer stderr"))?;

        let captured = tokio::try_join!(
            read_to_end_limited(stdout, self.output_limit, OutputStream::Stdout),
            read_to_end_limited(stderr, self.output_limit, OutputStream::Stderr),
        );
        let (stdout_bytes, stderr_bytes) = match captured {
            Ok(captured) => captured,
            Err(e) => {
                let _ = child.kill().await;
                tracing::warn!(error = %e, "Analyzer output capture failed");
                return Err(e);
            }
        };

        let status = child
            .wait()
            .await
            .map_err(|e| GatewayError::process(format!("failed to wait for analyzer: {e}")))?;

        let stdout = String::from_utf8_lossy(&stdout_bytes).into_owned();
        tracing::debug!(
            status = %status,
            stdout_bytes = stdout_bytes.len(),
            stderr_bytes = stderr_bytes.len(),
            "Analyzer finished"
        );

        if !status.success() && stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            let message = if stderr.trim().is_empty() {
                format!("{program_name} exited with {status}")
            } else {
                stderr.trim_end().to_string()
            };
            tracing::warn!(status = %status, "Analyzer failed without output");
            return Err(GatewayError::process(message));
        }

        Ok(RawAnalysisOutput::new(
            stdout,
            status.code(),
            status.success(),
        ))
    }
}

impl Analyzer for AnalyzerGateway {
    fn invoke(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = Result<RawAnalysisOutput, GatewayError>> + Send {
        self.run(request)
    }
}

async fn read_to_end_limited<R: AsyncRead + Unpin>(
    mut reader: R,
    max_bytes: usize,
    stream: OutputStream,
) -> Result<Vec<u8>, GatewayError> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; READ_CHUNK_BYTES];

    loop {
        let n = reader
            .read(&mut tmp)
            .await
            .map_err(|e| GatewayError::process(format!("failed to read analyzer {stream}: {e}")))?;
        if n == 0 {
            break;
        }
        if buf.len() + n > max_bytes {
            return Err(GatewayError::OutputLimitExceeded {
                stream,
                limit: max_bytes,
            });
        }
        buf.extend_from_slice(&tmp[..n]);
    }

    Ok(buf)
}
