use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use forex_calendar::config::Config;
use forex_calendar::error::Result;
use forex_calendar::{export, fetcher};

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    info!(
        "Fetching {} from {} (format={:?})",
        cfg.period, cfg.base_url, cfg.output_format
    );

    let extraction = fetcher::load_period(&cfg, cfg.period).await?;

    let stats = &extraction.stats;
    if !stats.skipped.is_empty() {
        warn!(
            "[WALKER] skipped {} of {} rows: {:?}",
            stats.skipped.len(),
            stats.rows_seen,
            stats.skip_counts(),
        );
        for s in stats.skipped.iter().take(10) {
            warn!("[WALKER]   row {} (eventid {:?}): {}", s.index, s.eventid, s.error);
        }
    }
    if stats.year_rollovers > 0 {
        info!("[WALKER] window crossed a year boundary ({} rollover)", stats.year_rollovers);
    }

    match export::save(
        &extraction.events,
        cfg.output_format,
        cfg.output_path.as_deref(),
        cfg.output_append,
    )? {
        Some(path) => info!("Saved {} events to {}", extraction.events.len(), path.display()),
        None => warn!("No events found for {}", cfg.period),
    }

    Ok(())
}
