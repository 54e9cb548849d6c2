use bigfive_check::bulk::{read_bulk, score_all, write_scores};
use bigfive_check::config::AppConfig;
use bigfive_check::{telemetry, Aggregation, AppError, Scorer};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use tracing::{info, warn};

/// Score every respondent in a `respondent,questionId,score` CSV
#[derive(Parser)]
struct Args {
    path: String,
    /// Aggregation policy: mean or weighted
    #[arg(long)]
    aggregation: Option<Aggregation>,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let catalog = config.scoring.load_catalog()?;
    let aggregation = args.aggregation.unwrap_or(config.scoring.aggregation);
    let scorer = Scorer::new(&catalog, aggregation);

    let reader = BufReader::new(File::open(&args.path)?);
    let respondents = read_bulk(reader)?;
    let outcomes = score_all(&scorer, &respondents);

    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            warn!(respondent = %outcome.respondent, error = %e, "skipped respondent");
        }
    }

    let written = write_scores(std::io::stdout().lock(), &outcomes)?;
    info!(
        respondents = outcomes.len(),
        written,
        %aggregation,
        "bulk scoring finished"
    );
    Ok(())
}
