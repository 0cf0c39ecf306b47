//! Checklist terminal front end
//!
//! With arguments, runs them as a single command and exits. Without, reads
//! commands from standard input until `quit` or end of input.

use anyhow::Context;
use checklist::config::RUST_LOG_VAR;
use checklist::{Config, Shell, TodoController, open_store};
use checklist_core::environment::SystemClock;
use checklist_storage::FileStore;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("Failed to load configuration")?;

    // Logs go to stderr so the list on stdout stays clean
    let rust_log = std::env::var(RUST_LOG_VAR).ok();
    let directives = config.select_log_filter(rust_log.as_deref());
    tracing_subscriber::registry()
        .with(EnvFilter::new(directives))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    if let Some(rejected) = rust_log.as_deref().filter(|value| *value != directives) {
        tracing::warn!(rust_log = rejected, filter = directives, "Ignoring unparseable RUST_LOG");
    }

    tracing::info!(
        data_dir = %config.data_dir.display(),
        slot = %config.slot_key,
        "Starting checklist"
    );

    let backend = Arc::new(FileStore::new(&config.data_dir));
    let store = open_store(Arc::new(SystemClock), backend, config.slot_key.clone());
    let controller = TodoController::new(store.clone());
    controller.start().await.context("Failed to load todo list")?;

    let mut shell = Shell::new(controller);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        shell
            .run(BufReader::new(tokio::io::stdin()), &mut std::io::stdout())
            .await?;
    } else {
        let reply = shell.handle_line(&args.join(" ")).await?;
        println!("{}", reply.output);
    }

    store.shutdown().await;
    Ok(())
}
