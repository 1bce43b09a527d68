use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use vinyl_catalog::session::COMMANDS_HELP;
use vinyl_catalog::{init_tracing, FilterCommand, RenderPolicy, SessionDriver, SourceArgs};

#[derive(Parser, Debug)]
#[clap(about = "Interactively search and filter the merged vinyl collection")]
struct CliArgs {
    #[clap(flatten)]
    pub source: SourceArgs,
}

/// Reads commands from stdin on a dedicated thread. EOF quits.
fn spawn_stdin_reader(commands: mpsc::Sender<FilterCommand>) {
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    error!("Failed to read from stdin: {}", err);
                    break;
                }
            };
            match FilterCommand::parse(&line) {
                Ok(command) => {
                    let quit = command == FilterCommand::Quit;
                    if commands.blocking_send(command).is_err() || quit {
                        return;
                    }
                }
                Err(err) => eprintln!("{}", err),
            }
        }
        let _ = commands.blocking_send(FilterCommand::Quit);
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    init_tracing()?;

    let config = cli_args.source.resolve()?;

    let mut driver = SessionDriver::new(config.seed_loader()?, config.renderer(io::stdout()))
        .with_render_policy(RenderPolicy::EveryEvent);
    if let Some(live_source) = config.live_source(true) {
        driver = driver.with_live_source(live_source);
    }

    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    eprintln!("{}", COMMANDS_HELP);
    let (command_tx, commands) = mpsc::channel(16);
    spawn_stdin_reader(command_tx);

    let session = driver.run(commands, shutdown).await;
    info!("Leaving with filter {}", session.filter());
    Ok(())
}
