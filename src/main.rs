use bigfive_check::config::AppConfig;
use bigfive_check::{server, telemetry};
use bigfive_check::{validate, AppError, Aggregation, Catalog, Response, Scorer, TraitScores};
use clap::{Args, Parser, Subcommand};
use std::io::{stdin, ErrorKind};

#[derive(Parser, Debug)]
#[command(
    name = "bigfive_check",
    about = "Score Big Five personality traits over HTTP or interactively",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Answer the questionnaire on the terminal
    Ask(AskArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Aggregation policy: mean or weighted
    #[arg(long)]
    aggregation: Option<Aggregation>,
}

#[derive(Args, Debug)]
struct AskArgs {
    /// Aggregation policy: mean or weighted
    #[arg(long)]
    aggregation: Option<Aggregation>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Ask(args) => run_questionnaire(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(aggregation) = args.aggregation.take() {
        config.scoring.aggregation = aggregation;
    }

    telemetry::init(&config.telemetry)?;
    server::run(config).await
}

fn run_questionnaire(args: AskArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = config.scoring.load_catalog()?;
    let aggregation = args.aggregation.unwrap_or(config.scoring.aggregation);

    let mut buffer = String::new();
    let mut responses = Vec::with_capacity(catalog.questions().len());
    let total = catalog.questions().len();

    println!("以下の設問について、最もあてはまるものを1〜5で答えてください。");
    for (index, question) in catalog.questions().iter().enumerate() {
        println!();
        println!("[{}/{}] {}", index + 1, total, question.text);
        for choice in catalog.choices() {
            print!("  {} => {}", choice.score, choice.text);
        }
        loop {
            println!();
            buffer.clear();
            if stdin().read_line(&mut buffer)? == 0 {
                return Err(std::io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "questionnaire ended before every question was answered",
                )
                .into());
            }
            match parse_answer(&catalog, question.id, buffer.trim()) {
                Some(response) => {
                    responses.push(response);
                    break;
                }
                None => println!("回答は半角数字1〜5で入力してください。"),
            }
        }
    }

    let scores = Scorer::new(&catalog, aggregation).evaluate(&responses)?;
    println!();
    render_scores(&scores);
    Ok(())
}

fn parse_answer(catalog: &Catalog, question_id: i64, value: &str) -> Option<Response> {
    let score = value.parse::<i64>().ok()?;
    let response = Response::new(question_id, score);
    validate(catalog, std::slice::from_ref(&response)).ok()?;
    Some(response)
}

fn render_scores(scores: &TraitScores) {
    println!("分析結果");
    for (category, value) in scores.iter() {
        let filled = (value * 4.0).round() as usize;
        println!(
            "{:<8} {:>4.1} {}{}",
            category.label(),
            value,
            "#".repeat(filled),
            ".".repeat(20usize.saturating_sub(filled))
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_answer_accepts_only_likert_values() {
        let catalog = Catalog::builtin().expect("builtin catalog");
        assert_eq!(parse_answer(&catalog, 1, "3"), Some(Response::new(1, 3)));
        assert_eq!(parse_answer(&catalog, 1, "0"), None);
        assert_eq!(parse_answer(&catalog, 1, "6"), None);
        assert_eq!(parse_answer(&catalog, 1, "three"), None);
        assert_eq!(parse_answer(&catalog, 1, ""), None);
    }
}
