mod app;
mod commands;
mod config;
mod views;
mod workspace;

use std::{path::PathBuf, sync::Arc, time::Instant};

use anyhow::Result;
use clap::Parser;
use shell_core::{ShellSignal, SystemClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    app::{App, Outcome},
    commands::Command,
};

#[derive(Parser, Debug)]
#[command(about = "Headless workbench shell driven by line commands on stdin")]
struct Args {
    /// Settings file; defaults to ./workbench.toml when it exists.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address-bar fragment the session starts from.
    #[arg(long, default_value = "")]
    fragment: String,
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending().await,
    }
}

fn print_signals(signals: &mut tokio::sync::broadcast::Receiver<ShellSignal>) {
    while let Ok(signal) = signals.try_recv() {
        match signal {
            ShellSignal::OverlayChanged { visible: true, label } => {
                println!("overlay shown: {}", label.unwrap_or_default());
            }
            ShellSignal::OverlayChanged { visible: false, .. } => println!("overlay hidden"),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = config::load_settings(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(fragment = %args.fragment, "starting workbench");
    let mut app = App::new(&settings, &args.fragment, Arc::new(SystemClock));
    let mut signals = app.subscribe();
    if let Err(err) = app.start() {
        error!(error = %err, "startup failed");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(err) => {
                        warn!(error = %err, "ignoring input");
                        continue;
                    }
                };
                match app.execute(command) {
                    Ok(Outcome::Continue) => {}
                    Ok(Outcome::Print(text)) => println!("{text}"),
                    Ok(Outcome::Quit) => break,
                    Err(err) => error!(error = %err, "unhandled client error"),
                }
            }
            _ = sleep_until(app.next_deadline()) => {
                if let Err(err) = app.tick() {
                    error!(error = %err, "unhandled client error");
                }
            }
        }
        print_signals(&mut signals);
    }

    // Let pending renders and fades land before exiting.
    while let Some(deadline) = app.next_deadline() {
        sleep_until(Some(deadline)).await;
        if let Err(err) = app.tick() {
            error!(error = %err, "unhandled client error");
        }
        print_signals(&mut signals);
    }
    println!("{}", app.status());
    info!("workbench stopped");
    Ok(())
}
