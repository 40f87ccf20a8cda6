//! Fairway - GPS distances, club recommendations and handicap tracking
//! from the terminal.

mod app;
mod commands;

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, Flow};
use commands::parse;

/// Log file name prefix inside `<data dir>/logs`
const LOG_FILE_PREFIX: &str = "fairway.log";

const PROMPT: &str = "fairway> ";

/// Initialize the tracing subscriber. Logs go to a daily file so they never
/// interleave with console output.
fn init_tracing(data_dir: &Path) -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let appender = tracing_appender::rolling::daily(data_dir.join("logs"), LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("{}", commands::HELP);
        return Ok(());
    }

    let mut app = App::new()?;
    let _guard = init_tracing(&app.config.data_dir()?);
    info!("Fairway starting");

    print_lines(&app.restore_session().await);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", PROMPT);
        stdout.flush()?;

        let Some(line) = lines.next() else {
            // EOF behaves like quit so pending shots get a last save
            print_lines(&app.shutdown().await);
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse(&line) {
            Ok(command) => {
                let (flow, output) = app.execute(command).await;
                print_lines(&output);
                if flow == Flow::Quit {
                    break;
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    Ok(())
}
