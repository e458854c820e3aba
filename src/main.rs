use anyhow::{bail, Context, Result};
use olympic_medals::{
    fetch_reference_table, FeedConfig, FileFeed, HttpMedalFeed, MedalFeed, MedalService,
    ReferenceStore, ServerConfig, TotalsFilter, DEFAULT_TOP_N,
};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage:
  olympic-medals summary [--feed-dir DIR] [CODE...]
  olympic-medals top [--feed-dir DIR] [N]
  olympic-medals refresh-codes <CSV_URL|CSV_PATH> [OUT_JSON]";

const DEFAULT_SNAPSHOT_PATH: &str = "data/countries.json";

enum Query {
    Summary(Vec<String>),
    Top(usize),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pipeable JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("{}", USAGE);
    };

    match command.as_str() {
        "summary" => {
            let (feed_dir, rest) = split_feed_dir(&args[1..])?;
            run_query(feed_dir, Query::Summary(rest)).await
        }
        "top" => {
            let (feed_dir, rest) = split_feed_dir(&args[1..])?;
            let n = match rest.first() {
                Some(n) => n
                    .parse()
                    .with_context(|| format!("N must be a non-negative integer, got {:?}", n))?,
                None => DEFAULT_TOP_N,
            };
            run_query(feed_dir, Query::Top(n)).await
        }
        "refresh-codes" => {
            let Some(source) = args.get(1) else {
                bail!("{}", USAGE);
            };
            let out = args
                .get(2)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH));
            refresh_codes(source, &out).await
        }
        other => bail!("Unknown command {:?}\n{}", other, USAGE),
    }
}

/// Pull `--feed-dir DIR` out of the argument list
fn split_feed_dir(args: &[String]) -> Result<(Option<PathBuf>, Vec<String>)> {
    let mut feed_dir = None;
    let mut rest = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--feed-dir" {
            let dir = iter.next().context("--feed-dir needs a directory")?;
            feed_dir = Some(PathBuf::from(dir));
        } else {
            rest.push(arg.clone());
        }
    }

    Ok((feed_dir, rest))
}

async fn run_query(feed_dir: Option<PathBuf>, query: Query) -> Result<()> {
    let feed_config = FeedConfig::from_env();
    let server_config = ServerConfig::from_env();
    let reference = Arc::new(ReferenceStore::load_or_bundled(
        server_config.reference_path.as_deref(),
    )?);
    let totals = TotalsFilter::from(&feed_config);

    match feed_dir {
        Some(dir) => {
            let service = MedalService::new(FileFeed::from_dir(&dir), reference, totals);
            print_query(&service, query).await
        }
        None => {
            let service = MedalService::new(HttpMedalFeed::new(feed_config)?, reference, totals);
            print_query(&service, query).await
        }
    }
}

async fn print_query<F: MedalFeed>(service: &MedalService<F>, query: Query) -> Result<()> {
    let response = match query {
        Query::Summary(codes) => service.summary(&codes).await,
        Query::Top(n) => service.top_n(n).await,
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn refresh_codes(source: &str, out: &Path) -> Result<()> {
    let store = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_reference_table(source, &FeedConfig::from_env().user_agent).await?
    } else {
        ReferenceStore::from_csv_path(Path::new(source))?
    };

    if store.is_empty() {
        bail!("No country code records found in {}", source);
    }

    store.save(out)?;
    println!("✓ Wrote {} country code records to {}", store.len(), out.display());
    Ok(())
}
