use leasing_engine::config::{Config, SelectionMode};
use leasing_engine::{AppError, FileOfferSource, ListingSession, ResolverStatus, SelectionResolver};
use std::sync::Arc;

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match Config::from_env().map_err(AppError::from).and_then(|config| run(&config)) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run(config: &Config) -> Result<String, AppError> {
    let source = Arc::new(FileOfferSource::new(&config.offers_path));
    tracing::info!(path = %source.path().display(), "Loading offers");
    let resolver = SelectionResolver::with_preferred_periods(config.preferred_periods.clone());
    let mut session = ListingSession::new(source, resolver).with_retail_price(config.retail_price);

    let target = match config.selection_mode {
        SelectionMode::Target => Some(config.target),
        SelectionMode::Cheapest | SelectionMode::BestScore => None,
    };

    match session.refresh(target) {
        ResolverStatus::Initialized => {}
        ResolverStatus::Error => {
            let message = session.resolver().last_error().unwrap_or("unknown error");
            return Err(AppError::Unavailable(format!("offer fetch failed: {}", message)));
        }
        other => {
            return Err(AppError::Unavailable(format!(
                "no valid offers in {} (status {})",
                config.offers_path, other
            )));
        }
    }

    match config.selection_mode {
        SelectionMode::Target => {}
        SelectionMode::Cheapest => {
            session.resolver_mut().reset_to_cheapest();
        }
        SelectionMode::BestScore => {
            if session.resolver_mut().reset_to_best_score().is_none() {
                tracing::warn!("No retail price available, keeping default selection");
            }
        }
    }

    let quote = session
        .quote()
        .ok_or_else(|| AppError::Unavailable("no selection resolved".to_string()))??;

    tracing::info!(
        option = %quote.option,
        score = ?quote.lease_score,
        version = %quote.version,
        "Resolved lease quote"
    );

    Ok(serde_json::to_string_pretty(&quote)?)
}
