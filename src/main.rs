use clap::Parser as _;
use futures::stream::{self, Stream, StreamExt};
use immo_predict::config::load_config;
use immo_predict::{PriceEstimator, ScoreLine};
use std::path::PathBuf;
use std::pin::pin;
use std::process::ExitCode;
use tokio::fs::File;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tracing::{error, info};

/// Scores JSON-lines property records, one price (or rejection) per line.
#[derive(Debug, clap::Parser)]
#[command(name = "immo-predict", version, about)]
struct Cli {
    /// Service configuration file.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// JSON-lines input; reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the scored lines.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let estimator = match PriceEstimator::from_config(&config) {
        Ok(estimator) => estimator,
        Err(e) => {
            error!("Failed to initialize estimator: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let input: Box<dyn AsyncRead + Unpin + Send> = match &cli.input {
        Some(path) => match File::open(path).await {
            Ok(file) => Box::new(file),
            Err(e) => {
                error!("Failed to open {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(io::stdin()),
    };

    info!("Scoring records (concurrency {})...", config.max_concurrency);

    let estimator = &estimator;
    let scored = numbered_records(BufReader::new(input))
        .map(move |record| async move {
            let (number, payload) = record?;
            Ok::<_, io::Error>(estimator.score_line(number, &payload).await)
        })
        .buffered(config.max_concurrency);
    let mut scored = pin!(scored);

    let mut stdout = io::stdout();
    let (mut priced, mut rejected) = (0usize, 0usize);
    while let Some(result) = scored.next().await {
        let line = match result {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read input: {}", e);
                return ExitCode::FAILURE;
            }
        };
        if line.price.is_some() {
            priced += 1;
        } else {
            rejected += 1;
        }
        if let Err(e) = write_line(&mut stdout, &line).await {
            error!("Failed to write output: {}", e);
            return ExitCode::FAILURE;
        }
    }
    if let Err(e) = stdout.flush().await {
        error!("Failed to flush output: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Finished: {} priced, {} rejected", priced, rejected);
    ExitCode::SUCCESS
}

/// Non-blank input lines with their 1-based line numbers, yielded as soon as
/// each line arrives.
fn numbered_records<R: AsyncBufRead + Unpin>(
    reader: R,
) -> impl Stream<Item = io::Result<(usize, String)>> {
    stream::unfold((reader.lines(), 0usize), |(mut lines, mut number)| async move {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    number += 1;
                    if !line.trim().is_empty() {
                        return Some((Ok((number, line)), (lines, number)));
                    }
                }
                Ok(None) => return None,
                Err(e) => return Some((Err(e), (lines, number))),
            }
        }
    })
}

async fn write_line(stdout: &mut io::Stdout, line: &ScoreLine) -> io::Result<()> {
    let mut json = serde_json::to_string(line)?;
    json.push('\n');
    stdout.write_all(json.as_bytes()).await
}
