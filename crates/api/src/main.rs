//! DocPulse - cloud drive activity reconciliation
//!
//! Command-line entry point. Prints JSON to stdout; logs go to stderr.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use docpulse_domain::{
    FileQuery, FileTypeLabel, RiskLevel, ShareDirection, SizeRange, SortMode, TimeRange, View,
};
use docpulse_infra::{config, init_tracing};
use docpulse_lib::{commands, AppContext, DEFAULT_CONNECTION_ID};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "docpulse", version, about = "Reconciled file activity across linked drives")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Files for one connection
    Files {
        #[arg(short, long, default_value = DEFAULT_CONNECTION_ID)]
        connection: String,
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Files merged across every linked connection
    Across {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Dashboard counters
    Summary {
        #[arg(short, long, default_value = DEFAULT_CONNECTION_ID)]
        connection: String,
    },
    /// Likely duplicate files
    Duplicates {
        #[arg(short, long, default_value = DEFAULT_CONNECTION_ID)]
        connection: String,
    },
    /// Refresh storage usage and print the aggregate
    Quota {
        /// Accounts to include (default: all)
        #[arg(short, long = "account")]
        accounts: Vec<String>,
    },
}

#[derive(Args)]
struct QueryArgs {
    #[arg(long, default_value = "recent", value_parser = parse_view)]
    view: View,
    #[arg(short, long, default_value_t = docpulse_domain::constants::DEFAULT_RESULT_LIMIT)]
    limit: usize,
    /// 1h, 24h, 7d, 4w, 1y or all
    #[arg(long, default_value = "all", value_parser = parse_time_range)]
    range: TimeRange,
    /// 0.5-1, 1-5, 5-10 or 10+ (GB); repeatable
    #[arg(long = "size", value_parser = parse_size_range)]
    sizes: Vec<SizeRange>,
    #[arg(long = "type", value_enum)]
    types: Vec<TypeArg>,
    #[arg(long, value_enum, default_value_t = SortArg::Size)]
    sort: SortArg,
    #[arg(long = "risk", value_enum)]
    risks: Vec<RiskArg>,
    #[arg(long = "direction", value_enum)]
    directions: Vec<DirectionArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    Pdf,
    Image,
    Folder,
    Doc,
    Sheet,
    Slides,
    Video,
    Audio,
    Archive,
    File,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Size,
    Oldest,
}

#[derive(Clone, Copy, ValueEnum)]
enum RiskArg {
    Risk,
    Attention,
    Sensitive,
    #[value(name = "none")]
    NoRisk,
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    ByMe,
    WithMe,
}

fn parse_view(s: &str) -> Result<View, String> {
    s.parse().map_err(|e: docpulse_domain::DocPulseError| e.to_string())
}

fn parse_time_range(s: &str) -> Result<TimeRange, String> {
    s.parse().map_err(|e: docpulse_domain::DocPulseError| e.to_string())
}

fn parse_size_range(s: &str) -> Result<SizeRange, String> {
    s.parse().map_err(|e: docpulse_domain::DocPulseError| e.to_string())
}

impl QueryArgs {
    fn into_query(self) -> FileQuery {
        let sort = match self.sort {
            SortArg::Size => SortMode::SizeDesc,
            SortArg::Oldest => SortMode::OldestFirst,
        };
        let mut query = FileQuery::new(self.view).limit(self.limit).time_range(self.range).sort(sort);

        for size in self.sizes {
            query = query.with_size_range(size);
        }
        for kind in self.types {
            query = query.with_type(match kind {
                TypeArg::Pdf => FileTypeLabel::Pdf,
                TypeArg::Image => FileTypeLabel::Image,
                TypeArg::Folder => FileTypeLabel::Folder,
                TypeArg::Doc => FileTypeLabel::Doc,
                TypeArg::Sheet => FileTypeLabel::Sheet,
                TypeArg::Slides => FileTypeLabel::Presentation,
                TypeArg::Video => FileTypeLabel::Video,
                TypeArg::Audio => FileTypeLabel::Audio,
                TypeArg::Archive => FileTypeLabel::Archive,
                TypeArg::File => FileTypeLabel::File,
            });
        }
        for risk in self.risks {
            query = query.with_risk_level(match risk {
                RiskArg::Risk => RiskLevel::Risk,
                RiskArg::Attention => RiskLevel::Attention,
                RiskArg::Sensitive => RiskLevel::Sensitive,
                RiskArg::NoRisk => RiskLevel::NoRisk,
            });
        }
        for direction in self.directions {
            query = query.with_direction(match direction {
                DirectionArg::ByMe => ShareDirection::ByMe,
                DirectionArg::WithMe => ShareDirection::WithMe,
            });
        }
        query
    }
}

#[allow(clippy::print_stdout)]
fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dotenv = dotenvy::dotenv();

    let config = config::load().context("failed to load configuration")?;
    init_tracing(&config.logging).context("failed to initialize logging")?;

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) => debug!(error = %e, "no .env file loaded"),
    }

    let ctx = AppContext::new(config).context("failed to initialize application context")?;
    let linked = ctx.seed_connections_from_env()?;
    info!(linked, "DocPulse starting");

    match cli.command {
        Command::Files { connection, query } => {
            emit(&commands::list_files(&ctx, &connection, &query.into_query()).await?)
        }
        Command::Across { query } => emit(&commands::recent_across(&ctx, &query.into_query()).await?),
        Command::Summary { connection } => emit(&commands::summary(&ctx, &connection).await?),
        Command::Duplicates { connection } => emit(&commands::duplicates(&ctx, &connection).await?),
        Command::Quota { accounts } => {
            let report = commands::refresh_quotas(&ctx).await;
            let summary = commands::quota_summary(&ctx, &accounts).await?;
            emit(&serde_json::json!({ "refresh": report, "summary": summary }))
        }
    }
}
