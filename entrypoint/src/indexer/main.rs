use clap::Parser;
use server::{ServerState, config::Config, errors::StartupError, logger::configure_logger};
use tracing::{error, info, warn};

/// One-shot sync of price tables and allotments into the configured store
#[derive(Parser, Debug)]
struct IndexerArgs {
    #[command(flatten)]
    config: Config,

    /// Region to sync, repeat for several; every region when omitted
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Also refresh the allotment rules
    #[arg(long)]
    allotments: bool,
}

async fn run(args: IndexerArgs) -> Result<bool, StartupError> {
    let state = ServerState::from_config(&args.config).await?;

    let outcomes = match args.regions.is_empty() {
        true => state.sync.sync_all_regions().await,
        false => {
            let mut outcomes = Vec::with_capacity(args.regions.len());
            for region in &args.regions {
                outcomes.push(state.sync.sync_pricing(region).await);
            }
            outcomes
        }
    };

    let mut all_succeeded = true;

    for outcome in outcomes {
        match outcome.success {
            true => info!("{}: {}", outcome.region, outcome.message),
            false => {
                all_succeeded = false;
                warn!("{}: {}", outcome.region, outcome.message);
            }
        }
    }

    if args.allotments {
        let outcome = state.sync.sync_allotments().await;
        all_succeeded &= outcome.success;
        info!("{}", outcome.message);
    }

    Ok(all_succeeded)
}

#[tokio::main]
async fn main() {
    configure_logger();

    let args = IndexerArgs::parse();

    match run(args).await {
        Ok(true) => info!("Process complete"),
        Ok(false) => {
            warn!("Process complete with failures");
            std::process::exit(1);
        }
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}
