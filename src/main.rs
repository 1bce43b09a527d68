use anyhow::Result;
use clap::Parser;
use std::io;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use vinyl_catalog::{
    init_tracing, FilterCommand, FilterUpdate, RenderPolicy, SessionDriver, SourceArgs,
};

#[derive(Parser, Debug)]
#[clap(about = "Merge seed and live vinyl records and print the filtered collection")]
struct CliArgs {
    #[clap(flatten)]
    pub source: SourceArgs,

    /// Case-insensitive search on artist and title.
    #[clap(long)]
    pub search: Option<String>,

    /// Lowest original release year to show.
    #[clap(long)]
    pub year_from: Option<i32>,

    /// Highest original release year to show.
    #[clap(long)]
    pub year_to: Option<i32>,

    /// Exact format to show, e.g. LP.
    #[clap(long)]
    pub format: Option<String>,

    /// Keep running and re-render whenever the live data changes.
    #[clap(long)]
    pub watch: bool,
}

impl CliArgs {
    fn initial_filter(&self) -> FilterUpdate {
        FilterUpdate {
            search_term: self.search.clone(),
            year_from: self.year_from,
            year_to: self.year_to,
            format: self.format.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    init_tracing()?;

    let config = cli_args.source.resolve()?;

    let mut driver = SessionDriver::new(config.seed_loader()?, config.renderer(io::stdout()))
        .with_filter(cli_args.initial_filter());
    if let Some(live_source) = config.live_source(cli_args.watch) {
        driver = driver.with_live_source(live_source);
    }

    let shutdown = CancellationToken::new();
    let (command_tx, commands) = mpsc::channel::<FilterCommand>(1);
    // Watch mode only ends on Ctrl-C, so the command channel stays open.
    let _command_tx = cli_args.watch.then_some(command_tx);

    if cli_args.watch {
        driver = driver.with_render_policy(RenderPolicy::EveryEvent);
        let token = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, shutting down");
                    token.cancel();
                }
                Err(err) => error!("Failed to listen for Ctrl-C: {}", err),
            }
        });
    }

    let session = driver.run(commands, shutdown).await;
    info!(
        "Done: {} records, {} live updates",
        session.merged().len(),
        session.live_updates()
    );
    Ok(())
}
