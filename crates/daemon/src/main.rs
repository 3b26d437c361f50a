// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reelworks daemon (rwd)
//!
//! Queue consumer that turns submitted YouTube URLs into short vertical
//! videos. Typically supervised by systemd; logs go to stderr for the
//! journal, readiness and watchdog pings go over `NOTIFY_SOCKET`.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use rw_daemon::{build, Settings};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("rwd {}", env!("CARGO_PKG_VERSION"));
                return std::process::ExitCode::SUCCESS;
            }
            "--help" | "-h" => {
                print_help();
                return std::process::ExitCode::SUCCESS;
            }
            other => {
                eprintln!("error: unexpected argument '{other}'");
                eprintln!("Usage: rwd [--help | --version]");
                return std::process::ExitCode::from(2);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "configuration error");
            eprintln!("rwd: configuration error: {err}");
            return std::process::ExitCode::from(2);
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "starting rwd");
    let consumer = build(&settings);
    consumer.run(shutdown_signal()).await;
    std::process::ExitCode::SUCCESS
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let mut interrupt = match signal(SignalKind::interrupt()) {
        Ok(signal) => signal,
        Err(err) => {
            error!(error = %err, "failed to install SIGINT handler");
            return std::future::pending::<()>().await;
        }
    };
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(signal) => signal,
        Err(err) => {
            error!(error = %err, "failed to install SIGTERM handler");
            return std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = interrupt.recv() => info!("received SIGINT"),
        _ = terminate.recv() => info!("received SIGTERM"),
    }
}

fn print_help() {
    println!("rwd {}", env!("CARGO_PKG_VERSION"));
    println!("Reelworks daemon - queue consumer for the reels pipeline");
    println!();
    println!("USAGE:");
    println!("    rwd");
    println!();
    println!("Submissions arrive through the chat channel or by dropping");
    println!("JSON files into the queue inbox; there are no subcommands.");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print help information");
    println!("    -V, --version    Print version information");
    println!();
    println!("ENVIRONMENT:");
    println!("    CHAT_TOKEN, CHAT_CHAT_ID    Chat credentials (both or neither)");
    println!("    WORKSPACE_DIR               Run workspaces (default: workspace)");
    println!("    QUEUE_DIR                   FIFO queue (default: queue)");
    println!("    WORKFLOWS_DIR               Stage definitions (default: workflows)");
    println!("    AGENT_TIMEOUT_SECONDS       Agent deadline (default: 300, floor 30)");
    println!("    MIN_QA_SCORE                Escalation floor (default: 40)");
}
