//! certbind - APISIX certificate deployment plugin
//!
//! Reads one request from stdin, writes one response to stdout. Logs go to
//! stderr.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use certbind::{handle_input, PluginResponse};
use certbind_common::logging::{init_tracing, LogFormat};
use certbind_config::ClientSettings;

/// certbind - keep one APISIX certificate object per certificate and domain set
#[derive(Parser, Debug)]
#[command(name = "certbind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(long = "verbose", env = "CERTBIND_VERBOSE")]
    verbose: bool,

    /// Log format: pretty or json
    #[arg(long = "log-format", env = "CERTBIND_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format).context("Failed to initialize logging")?;

    let response = match ClientSettings::from_env() {
        Ok(settings) => match read_stdin().await {
            Ok(input) => handle_input(&input, &settings).await,
            Err(e) => PluginResponse::error("failed to read input", e),
        },
        Err(e) => PluginResponse::error("failed to load settings", e),
    };

    debug!(status = ?response.status, "Writing response");
    write_response(&response).await
}

async fn read_stdin() -> std::io::Result<Vec<u8>> {
    let mut input = Vec::new();
    tokio::io::stdin().read_to_end(&mut input).await?;
    Ok(input)
}

async fn write_response(response: &PluginResponse) -> Result<()> {
    let mut out = serde_json::to_vec(response).context("Failed to serialize response")?;
    out.push(b'\n');

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(&out)
        .await
        .context("Failed to write response")?;
    stdout.flush().await.context("Failed to flush stdout")?;
    Ok(())
}
