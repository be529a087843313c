mod analysis;
mod config;
mod pr;
mod report;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use crate::analysis::CommentAnalyzer;
use crate::pr::{FixtureSource, GitHubClient, PullRequestSource};

/// Repository the bundled fixture was recorded from.
const MOCK_REPO: &str = "octo-org/widgets";

/// PR Comments Analyzer — fetches the most recent pull requests of a GitHub
/// repository and reports how much, how long and how gratefully people comment.
#[derive(Parser, Debug)]
#[command(name = "pr-comments-analyzer", version, about)]
struct Cli {
    /// Repository as owner/name or https://github.com/owner/name
    /// (defaults to TARGET_REPO, then facebook/react)
    #[arg(short, long)]
    repo: Option<String>,

    /// Number of most recently created PRs to fetch (1-100)
    #[arg(short, long)]
    limit: Option<u32>,

    /// Directory for results.csv, report.md and summary.json
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Config file (defaults to .pr-comments-analyzer.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use a built-in recorded response for demo purposes (no GitHub token needed)
    #[arg(long)]
    r#mock: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "loaded .env");
    }

    let cli = Cli::parse();

    info!("loading configuration");
    let mut config = config::Config::load(cli.config.as_deref())?;
    apply_cli_overrides(&mut config, &cli);
    config.validate()?;

    let source: Box<dyn PullRequestSource> = if cli.r#mock {
        info!("using bundled PR data for demo");
        Box::new(FixtureSource::bundled())
    } else {
        Box::new(GitHubClient::new(&config)?)
    };

    let (report, artifacts) = run(&config, source.as_ref()).await?;
    report::print_terminal_summary(&report, &artifacts);
    info!(repo = %report.repo, "finished analyzing repository");

    Ok(())
}

/// Flags win over the config file and environment. `--mock` without
/// `--repo` always reports as the repository the fixture was recorded from.
fn apply_cli_overrides(config: &mut config::Config, cli: &Cli) {
    if let Some(repo) = &cli.repo {
        config.target.repo = Some(repo.clone());
    } else if cli.r#mock {
        config.target.repo = Some(MOCK_REPO.to_string());
    }
    if let Some(limit) = cli.limit {
        config.target.pr_limit = limit;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.clone();
    }
}

/// Fetch, flatten, aggregate and export one batch of pull requests.
async fn run(
    config: &config::Config,
    source: &dyn PullRequestSource,
) -> Result<(report::Report, report::Artifacts), Box<dyn std::error::Error>> {
    let analyzer = CommentAnalyzer::new(&config.keywords)?;
    let repo = pr::parse_repo_slug(config.target_repo())?;
    let limit = config.target.pr_limit;

    info!(repo = %repo, limit, source = source.name(), "fetching pull requests");
    let prs = source
        .fetch_pull_requests(&repo, limit)
        .instrument(info_span!("fetch", repo = %repo))
        .await?;
    info!(pull_requests = prs.len(), "fetched pull requests");

    let comments = analyzer.extract(&prs);
    info!(comments = comments.len(), "extracted comments");

    let stats = analyzer.analyze(&comments, &prs);
    let built_report = report::build(&repo, &prs, stats, &config.keywords);

    info!(dir = %config.output.dir.display(), "writing artifacts");
    let artifacts = report::write_artifacts(&built_report, &comments, &prs, &config.output.dir)?;
    info!(
        csv = %artifacts.csv.display(),
        markdown = %artifacts.markdown.display(),
        json = %artifacts.json.display(),
        "artifacts written"
    );

    Ok((built_report, artifacts))
}
