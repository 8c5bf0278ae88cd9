//! Chrome Native Messaging Host for DeepFocus
//!
//! This binary runs as a standalone native messaging host for the DeepFocus extension.
//! It communicates via stdin/stdout using Chrome's native messaging protocol, so all
//! logging goes to stderr.

use chrono::Utc;
use log::{error, info};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deepfocus_lib=info,deepfocus_native_host=info".into()),
        )
        .init();

    let host = match deepfocus_lib::open_host(Utc::now()) {
        Ok(host) => host,
        Err(e) => {
            error!("Initialization error: {e}");
            std::process::exit(1);
        }
    };

    info!("Native host started");
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();

    if let Err(e) = host.run(&mut stdin, &mut stdout) {
        error!("Native host error: {e}");
        std::process::exit(1);
    }
    info!("Connection closed");
}
