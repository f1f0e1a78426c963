use std::collections::BTreeSet;
use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use orgpulse_analytics::classify::{Classifier, Label};
use orgpulse_analytics::filter::{self, FilterSpec, FilteredView};
use orgpulse_analytics::{content, contributors, insights, overlap, repos, temporal};
use orgpulse_core::{OutputFormat, PulseConfig};
use orgpulse_store::RecordStore;

#[derive(Parser)]
#[command(
    name = "orgpulse",
    version,
    about = "Organization development analytics from normalized GitHub records",
    long_about = "orgpulse derives analytical views from repository, commit, and contributor\n\
                   records: temporal trends, contributor concentration, cross-repository\n\
                   collaboration, and commit-content classification.\n\n\
                   Examples:\n  \
                     orgpulse summary --org acme             Key metrics and highlights\n  \
                     orgpulse activity --series trend        7-day rolling commit trend\n  \
                     orgpulse contributors --analysis pareto Contribution concentration\n  \
                     orgpulse overlap --repo api --repo web  Shared contributors\n  \
                     orgpulse content --report breakdown     Commit types by message\n  \
                     orgpulse init                           Create default configuration"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .orgpulse.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Filter flags shared by every analytics subcommand.
#[derive(clap::Args)]
struct FilterArgs {
    /// Organization to analyze (default: data.default_org from config)
    #[arg(long)]
    org: Option<String>,

    /// Directory holding the record files (default: data.dir from config)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Inclusive start of the date range (YYYY-MM-DD)
    #[arg(long)]
    since: Option<NaiveDate>,

    /// Inclusive end of the date range (YYYY-MM-DD)
    #[arg(long)]
    until: Option<NaiveDate>,

    /// Restrict to this repository (repeatable)
    #[arg(long = "repo")]
    repos: Vec<String>,

    /// Restrict to repositories with this language (case-sensitive;
    /// "Unknown" matches repositories without one)
    #[arg(long)]
    language: Option<String>,

    /// Restrict to commits carrying this label
    /// (feature|bugfix|refactor|docs|test|style|merge)
    #[arg(long)]
    commit_type: Option<Label>,
}

impl FilterArgs {
    fn data_dir(&self, config: &PulseConfig) -> PathBuf {
        self.data.clone().unwrap_or_else(|| config.data.dir.clone())
    }

    fn spec(&self, config: &PulseConfig) -> Result<FilterSpec> {
        let org = self
            .org
            .clone()
            .or_else(|| config.data.default_org.clone())
            .ok_or_else(|| {
                miette::miette!(
                    help = "pass --org, or set default_org under [data] in .orgpulse.toml",
                    "no organization selected"
                )
            })?;
        let mut spec = FilterSpec::for_org(org);
        spec.since = self.since;
        spec.until = self.until;
        if !self.repos.is_empty() {
            spec.repos = Some(self.repos.iter().cloned().collect::<BTreeSet<_>>());
        }
        spec.language = self.language.clone();
        spec.commit_type = self.commit_type;
        Ok(spec)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Key metrics and most-active highlights
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Commit activity over time: daily, trend, monthly, cumulative, and
    /// weekday/hour patterns
    Activity {
        #[command(flatten)]
        filter: FilterArgs,

        /// Which series to compute
        #[arg(long, default_value = "all")]
        series: ActivitySeries,
    },
    /// Contributor rankings, concentration, and trends
    Contributors {
        #[command(flatten)]
        filter: FilterArgs,

        /// Which analysis to run
        #[arg(long, default_value = "all")]
        analysis: ContributorAnalysis,

        /// Maximum contributors to show (default: from config)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Contributor overlap between the selected repositories
    Overlap {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Commit-content reports from message classification
    Content {
        #[command(flatten)]
        filter: FilterArgs,

        /// Which report to produce
        #[arg(long, default_value = "all")]
        report: ContentReport,
    },
    /// Repository statistics and comparison
    Repos {
        #[command(flatten)]
        filter: FilterArgs,

        /// Which metric to compute
        #[arg(long, default_value = "all")]
        metric: RepoMetric,
    },
    /// Create a default .orgpulse.toml configuration file
    #[command(long_about = "Create a default .orgpulse.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .orgpulse.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ActivitySeries {
    /// Commits per day and repository
    Daily,
    /// Rolling moving average of daily commits
    Trend,
    /// Commits per month and repository
    Monthly,
    /// Running commit totals per repository
    Cumulative,
    /// Commits by weekday, with the weekday/weekend split
    Weekday,
    /// Commits by hour, with the business-hours split
    Hours,
    /// The weekday x hour activity matrix
    Matrix,
    /// Everything
    All,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ContributorAnalysis {
    /// Top contributors by commit count
    Ranking,
    /// Contribution concentration (Pareto) curve
    Pareto,
    /// Distinct contributors per repository
    Repos,
    /// Weekly activity of the top contributors
    Weekly,
    /// Everything
    All,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ContentReport {
    /// Commit counts per label, plus Unclassified
    Breakdown,
    /// Development-focus trend by month
    Trends,
    /// Development focus per repository
    Focus,
    /// The most recent commit messages
    Recent,
    /// Everything
    All,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RepoMetric {
    /// Commit counts and development intensity
    Activity,
    /// Star ranking
    Stars,
    /// Fork ranking
    Forks,
    /// Language distribution
    Languages,
    /// Creation timeline
    Timeline,
    /// Everything
    All,
}

const DEFAULT_CONFIG: &str = r#"# orgpulse configuration
# See: https://github.com/orgpulse/orgpulse

[data]
# Directory holding repositories.json, commits.json, contributors.json
# dir = "github_data"
# Organization assumed when --org is omitted
# default_org = "acme"

[analytics]
# Window width for the rolling commit trend
# rolling_window_days = 7
# Size of the top-contributor projection
# top_contributors = 20
# How many contributors get a weekly activity series
# trend_contributors = 5
# Inclusive [start, end] hours counted as business hours
# business_hours = [9, 17]
"#;

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!("\x1b[1m\x1b[33m~\x1b[0m \x1b[1morgpulse\x1b[0m v{version} — organization development analytics\n");

        println!("Quick start:");
        println!("  \x1b[36morgpulse init\x1b[0m                 Create a .orgpulse.toml config file");
        println!("  \x1b[36morgpulse summary --org acme\x1b[0m   Key metrics for an organization");
        println!("  \x1b[36morgpulse activity --org acme\x1b[0m  Commit activity over time\n");

        println!("All commands:");
        println!("  \x1b[32msummary\x1b[0m       Key metrics and most-active highlights");
        println!("  \x1b[32mactivity\x1b[0m      Daily/monthly series, rolling trend, time patterns");
        println!("  \x1b[32mcontributors\x1b[0m  Rankings, Pareto concentration, weekly trends");
        println!("  \x1b[32moverlap\x1b[0m       Shared contributors between repositories");
        println!("  \x1b[32mcontent\x1b[0m       Commit types from message classification");
        println!("  \x1b[32mrepos\x1b[0m         Repository statistics and comparison");
        println!("  \x1b[32minit\x1b[0m          Create default configuration\n");
    } else {
        println!("orgpulse v{version} — organization development analytics\n");

        println!("Quick start:");
        println!("  orgpulse init                 Create a .orgpulse.toml config file");
        println!("  orgpulse summary --org acme   Key metrics for an organization");
        println!("  orgpulse activity --org acme  Commit activity over time\n");

        println!("All commands:");
        println!("  summary       Key metrics and most-active highlights");
        println!("  activity      Daily/monthly series, rolling trend, time patterns");
        println!("  contributors  Rankings, Pareto concentration, weekly trends");
        println!("  overlap       Shared contributors between repositories");
        println!("  content       Commit types from message classification");
        println!("  repos         Repository statistics and comparison");
        println!("  init          Create default configuration\n");
    }

    println!("Run 'orgpulse <command> --help' for details.");
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let filter_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => PulseConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = std::path::Path::new(".orgpulse.toml");
            if default_path.exists() {
                PulseConfig::from_file(default_path).into_diagnostic()?
            } else {
                PulseConfig::default()
            }
        }
    };

    let Some(command) = cli.command else {
        let use_color = std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err();
        print_welcome(use_color);
        return Ok(());
    };

    match command {
        Command::Summary { ref filter } => {
            let (view_store, spec) = load_inputs(filter, &config)?;
            let mut classifier = Classifier::new();
            let view = filter::apply(&view_store, &spec, &mut classifier);
            run_summary(&view, cli.format)
        }
        Command::Activity { ref filter, series } => {
            let (view_store, spec) = load_inputs(filter, &config)?;
            let mut classifier = Classifier::new();
            let view = filter::apply(&view_store, &spec, &mut classifier);
            run_activity(&view, series, &config, cli.format)
        }
        Command::Contributors {
            ref filter,
            analysis,
            limit,
        } => {
            let (view_store, spec) = load_inputs(filter, &config)?;
            let mut classifier = Classifier::new();
            let view = filter::apply(&view_store, &spec, &mut classifier);
            let limit = limit.unwrap_or(config.analytics.top_contributors);
            run_contributors(&view, analysis, limit, &config, cli.format)
        }
        Command::Overlap { ref filter } => {
            let (view_store, spec) = load_inputs(filter, &config)?;
            let mut classifier = Classifier::new();
            let view = filter::apply(&view_store, &spec, &mut classifier);
            run_overlap(&view, cli.format)
        }
        Command::Content { ref filter, report } => {
            let (view_store, spec) = load_inputs(filter, &config)?;
            let mut classifier = Classifier::new();
            let view = filter::apply(&view_store, &spec, &mut classifier);
            run_content(&view, &mut classifier, report, cli.format)
        }
        Command::Repos { ref filter, metric } => {
            let (view_store, spec) = load_inputs(filter, &config)?;
            let mut classifier = Classifier::new();
            let view = filter::apply(&view_store, &spec, &mut classifier);
            run_repos(&view, metric, cli.format)
        }
        Command::Init => {
            let path = std::path::Path::new(".orgpulse.toml");
            if path.exists() {
                miette::bail!(".orgpulse.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .orgpulse.toml with default configuration");
            Ok(())
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "orgpulse", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load_inputs(filter: &FilterArgs, config: &PulseConfig) -> Result<(RecordStore, FilterSpec)> {
    let dir = filter.data_dir(config);
    let store = RecordStore::load(&dir).into_diagnostic()?;
    let spec = filter.spec(config)?;
    Ok((store, spec))
}

fn run_summary(view: &FilteredView, format: OutputFormat) -> Result<()> {
    let metrics = insights::key_metrics(view);
    let highlights = insights::highlights(view);
    let highlight_rows = |h: &insights::Highlights| {
        [
            ("Most active repository", h.top_repo.clone()),
            ("Most active contributor", h.top_contributor.clone()),
            ("Most active day of week", h.top_weekday.clone()),
            ("Most active hour of day", h.top_hour.clone()),
        ]
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "metrics": metrics,
                "highlights": highlights,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        OutputFormat::Markdown => {
            println!("# Summary — {}\n", view.spec.org);
            println!("| Metric | Value |");
            println!("|--------|-------|");
            println!("| Repositories | {} |", metrics.repositories);
            println!("| Commits | {} |", metrics.commits);
            println!("| Contributors | {} |", metrics.contributors);
            println!("| Commits/day | {:.1} |", metrics.commits_per_day);
            println!("| Stars | {} |", metrics.stars);
            println!();
            match &highlights {
                Some(h) => {
                    println!("## Highlights\n");
                    for (label, hl) in highlight_rows(h) {
                        println!(
                            "- **{label}:** {} ({} commits, {:.1}% of total)",
                            hl.name, hl.commits, hl.share_pct,
                        );
                    }
                }
                None => println!("No commits in the filtered view."),
            }
        }
        OutputFormat::Text => {
            println!("Key Metrics — {}:", view.spec.org);
            println!("{:-<72}", "");
            println!("  Repositories:  {}", metrics.repositories);
            println!("  Commits:       {}", metrics.commits);
            println!("  Contributors:  {}", metrics.contributors);
            println!("  Commits/day:   {:.1}", metrics.commits_per_day);
            println!("  Stars:         {}", metrics.stars);
            println!();
            match &highlights {
                Some(h) => {
                    println!("Highlights:");
                    println!("{:-<72}", "");
                    for (label, hl) in highlight_rows(h) {
                        let label = format!("{label}:");
                        println!(
                            "  {label:<25} {} ({} commits, {:.1}% of total)",
                            hl.name, hl.commits, hl.share_pct,
                        );
                    }
                }
                None => println!("No commits in the filtered view."),
            }
        }
    }
    Ok(())
}

fn run_activity(
    view: &FilteredView,
    series: ActivitySeries,
    config: &PulseConfig,
    format: OutputFormat,
) -> Result<()> {
    let window = config.analytics.rolling_window_days;
    let business = config.analytics.business_hours;
    let want = |s: ActivitySeries| series == s || series == ActivitySeries::All;

    match format {
        OutputFormat::Json => {
            let mut json = serde_json::Map::new();
            if want(ActivitySeries::Daily) {
                json.insert(
                    "daily".into(),
                    serde_json::to_value(temporal::daily_series(view)).into_diagnostic()?,
                );
            }
            if want(ActivitySeries::Trend) {
                json.insert(
                    "trend".into(),
                    serde_json::to_value(temporal::rolling_trend(view, window))
                        .into_diagnostic()?,
                );
            }
            if want(ActivitySeries::Monthly) {
                json.insert(
                    "monthly".into(),
                    serde_json::to_value(temporal::monthly_series(view)).into_diagnostic()?,
                );
            }
            if want(ActivitySeries::Cumulative) {
                json.insert(
                    "cumulative".into(),
                    serde_json::to_value(temporal::cumulative_series(view)).into_diagnostic()?,
                );
            }
            if want(ActivitySeries::Weekday) {
                json.insert(
                    "weekdays".into(),
                    serde_json::to_value(temporal::weekday_histogram(view)).into_diagnostic()?,
                );
            }
            if want(ActivitySeries::Hours) {
                json.insert(
                    "hours".into(),
                    serde_json::to_value(temporal::hour_histogram(view, business))
                        .into_diagnostic()?,
                );
            }
            if want(ActivitySeries::Matrix) {
                json.insert(
                    "matrix".into(),
                    serde_json::to_value(temporal::activity_matrix(view)).into_diagnostic()?,
                );
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(json))
                    .into_diagnostic()?
            );
        }
        OutputFormat::Markdown => {
            println!("# Commit Activity — {}\n", view.spec.org);
            if want(ActivitySeries::Daily) {
                let daily = temporal::daily_series(view);
                println!("## Daily Commits\n");
                if daily.is_empty() {
                    println!("No commits in the filtered view.\n");
                } else {
                    println!("| Day | Repository | Commits |");
                    println!("|-----|------------|---------|");
                    for row in &daily {
                        println!("| {} | `{}` | {} |", row.day, row.repo, row.commits);
                    }
                    println!();
                }
            }
            if want(ActivitySeries::Trend) {
                println!("## Rolling Trend ({window}-day window)\n");
                match temporal::rolling_trend(view, window) {
                    temporal::RollingTrend::Insufficient { distinct_days } => println!(
                        "Not enough data for a {window}-day moving average \
                         ({distinct_days} active days).\n"
                    ),
                    temporal::RollingTrend::Series { points } => {
                        println!("| Day | Commits | Rolling avg |");
                        println!("|-----|---------|-------------|");
                        for point in &points {
                            let avg = point
                                .rolling_avg
                                .map(|a| format!("{a:.2}"))
                                .unwrap_or_else(|| "-".into());
                            println!("| {} | {} | {} |", point.day, point.commits, avg);
                        }
                        println!();
                    }
                }
            }
            if want(ActivitySeries::Monthly) {
                let monthly = temporal::monthly_series(view);
                println!("## Monthly Commits\n");
                if monthly.is_empty() {
                    println!("No commits in the filtered view.\n");
                } else {
                    println!("| Month | Repository | Commits |");
                    println!("|-------|------------|---------|");
                    for row in &monthly {
                        println!("| {} | `{}` | {} |", row.month, row.repo, row.commits);
                    }
                    println!();
                }
            }
            if want(ActivitySeries::Cumulative) {
                let cumulative = temporal::cumulative_series(view);
                println!("## Cumulative Progress\n");
                if cumulative.is_empty() {
                    println!("No commits in the filtered view.\n");
                } else {
                    println!("| Repository | Total | First | Last |");
                    println!("|------------|-------|-------|------|");
                    for repo_series in &cumulative {
                        if let (Some(first), Some(last)) =
                            (repo_series.points.first(), repo_series.points.last())
                        {
                            println!(
                                "| `{}` | {} | {} | {} |",
                                repo_series.repo,
                                last.commits,
                                first.date.date_naive(),
                                last.date.date_naive(),
                            );
                        }
                    }
                    println!();
                }
            }
            if want(ActivitySeries::Weekday) {
                let hist = temporal::weekday_histogram(view);
                println!("## Commits by Day of Week\n");
                println!("| Day | Commits |");
                println!("|-----|---------|");
                for (name, count) in temporal::WEEKDAY_NAMES.iter().zip(hist.counts.iter()) {
                    println!("| {name} | {count} |");
                }
                println!(
                    "\n**Weekday:** {:.1}%, **Weekend:** {:.1}%\n",
                    hist.weekday_pct, hist.weekend_pct,
                );
            }
            if want(ActivitySeries::Hours) {
                let hist = temporal::hour_histogram(view, business);
                println!("## Commits by Hour of Day\n");
                println!("| Hour | Commits |");
                println!("|------|---------|");
                for (hour, count) in hist.counts.iter().enumerate() {
                    println!("| {hour:02}:00 | {count} |");
                }
                println!(
                    "\n**{:02}:00–{:02}:59:** {:.1}%, **other hours:** {:.1}%\n",
                    business[0], business[1], hist.business_pct, hist.off_hours_pct,
                );
            }
            if want(ActivitySeries::Matrix) {
                let matrix = temporal::activity_matrix(view);
                println!("## Activity Matrix\n");
                let header: Vec<String> = (0..24).map(|h| h.to_string()).collect();
                println!("| Day | {} |", header.join(" | "));
                println!("|-----|{}", "---|".repeat(24));
                for (name, row) in temporal::WEEKDAY_NAMES.iter().zip(matrix.rows.iter()) {
                    let cells: Vec<String> = row.iter().map(u64::to_string).collect();
                    println!("| {name} | {} |", cells.join(" | "));
                }
                println!();
            }
        }
        OutputFormat::Text => {
            if want(ActivitySeries::Daily) {
                let daily = temporal::daily_series(view);
                println!("Daily commits:");
                println!("{:-<72}", "");
                if daily.is_empty() {
                    println!("  No commits in the filtered view.");
                }
                for row in &daily {
                    println!("  {}  {:<32} {}", row.day, row.repo, row.commits);
                }
                println!();
            }
            if want(ActivitySeries::Trend) {
                match temporal::rolling_trend(view, window) {
                    temporal::RollingTrend::Insufficient { distinct_days } => {
                        println!(
                            "Not enough data for a {window}-day moving average \
                             ({distinct_days} active days).\n"
                        );
                    }
                    temporal::RollingTrend::Series { points } => {
                        println!("Rolling trend ({window}-day window):");
                        println!("{:-<72}", "");
                        for point in &points {
                            match point.rolling_avg {
                                Some(avg) => println!(
                                    "  {}  commits={:<4} avg={:.2}",
                                    point.day, point.commits, avg,
                                ),
                                None => println!(
                                    "  {}  commits={:<4} avg=-",
                                    point.day, point.commits,
                                ),
                            }
                        }
                        println!();
                    }
                }
            }
            if want(ActivitySeries::Monthly) {
                let monthly = temporal::monthly_series(view);
                println!("Monthly commits:");
                println!("{:-<72}", "");
                if monthly.is_empty() {
                    println!("  No commits in the filtered view.");
                }
                for row in &monthly {
                    println!("  {}  {:<32} {}", row.month, row.repo, row.commits);
                }
                println!();
            }
            if want(ActivitySeries::Cumulative) {
                let cumulative = temporal::cumulative_series(view);
                println!("Cumulative progress:");
                println!("{:-<72}", "");
                if cumulative.is_empty() {
                    println!("  No commits in the filtered view.");
                }
                for repo_series in &cumulative {
                    if let (Some(first), Some(last)) =
                        (repo_series.points.first(), repo_series.points.last())
                    {
                        println!(
                            "  {:<32} {} commits ({} to {})",
                            repo_series.repo,
                            last.commits,
                            first.date.date_naive(),
                            last.date.date_naive(),
                        );
                    }
                }
                println!();
            }
            if want(ActivitySeries::Weekday) {
                let hist = temporal::weekday_histogram(view);
                println!("Commits by day of week:");
                println!("{:-<72}", "");
                for (name, count) in temporal::WEEKDAY_NAMES.iter().zip(hist.counts.iter()) {
                    println!("  {name:<10} {count}");
                }
                println!(
                    "  Weekday: {:.1}%, Weekend: {:.1}%\n",
                    hist.weekday_pct, hist.weekend_pct,
                );
            }
            if want(ActivitySeries::Hours) {
                let hist = temporal::hour_histogram(view, business);
                println!("Commits by hour of day:");
                println!("{:-<72}", "");
                for (hour, count) in hist.counts.iter().enumerate() {
                    println!("  {hour:02}:00  {count}");
                }
                println!(
                    "  {:02}:00-{:02}:59: {:.1}%, other hours: {:.1}%\n",
                    business[0], business[1], hist.business_pct, hist.off_hours_pct,
                );
            }
            if want(ActivitySeries::Matrix) {
                let matrix = temporal::activity_matrix(view);
                println!("Activity matrix (rows Monday-Sunday, columns 0-23):");
                println!("{:-<72}", "");
                for (name, row) in temporal::WEEKDAY_NAMES.iter().zip(matrix.rows.iter()) {
                    let cells: Vec<String> = row.iter().map(|c| format!("{c:>3}")).collect();
                    println!("  {name:<10}{}", cells.join(" "));
                }
                println!();
            }
        }
    }
    Ok(())
}

fn run_contributors(
    view: &FilteredView,
    analysis: ContributorAnalysis,
    limit: usize,
    config: &PulseConfig,
    format: OutputFormat,
) -> Result<()> {
    let want = |a: ContributorAnalysis| analysis == a || analysis == ContributorAnalysis::All;
    let weekly_k = config.analytics.trend_contributors;

    match format {
        OutputFormat::Json => {
            let mut json = serde_json::Map::new();
            if want(ContributorAnalysis::Ranking) {
                json.insert(
                    "ranking".into(),
                    serde_json::to_value(contributors::top_contributors(view, limit))
                        .into_diagnostic()?,
                );
            }
            if want(ContributorAnalysis::Pareto) {
                json.insert(
                    "pareto".into(),
                    serde_json::to_value(contributors::pareto_curve(view)).into_diagnostic()?,
                );
            }
            if want(ContributorAnalysis::Repos) {
                json.insert(
                    "perRepo".into(),
                    serde_json::to_value(contributors::contributors_per_repo(view))
                        .into_diagnostic()?,
                );
            }
            if want(ContributorAnalysis::Weekly) {
                json.insert(
                    "weekly".into(),
                    serde_json::to_value(contributors::top_weekly_activity(view, weekly_k))
                        .into_diagnostic()?,
                );
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(json))
                    .into_diagnostic()?
            );
        }
        OutputFormat::Markdown => {
            println!("# Contributors — {}\n", view.spec.org);
            if want(ContributorAnalysis::Ranking) {
                let ranking = contributors::top_contributors(view, limit);
                println!("## Top Contributors\n");
                if ranking.is_empty() {
                    println!("No commits in the filtered view.\n");
                } else {
                    println!("| Rank | Contributor | Commits |");
                    println!("|------|-------------|---------|");
                    for (idx, entry) in ranking.iter().enumerate() {
                        println!("| {} | {} | {} |", idx + 1, entry.author, entry.commits);
                    }
                    println!();
                }
            }
            if want(ContributorAnalysis::Pareto) {
                let curve = contributors::pareto_curve(view);
                println!("## Contribution Concentration\n");
                if curve.points.is_empty() {
                    println!("No commits in the filtered view.\n");
                } else {
                    println!("| Contributor percentile | Cumulative commits | Contributor |");
                    println!("|------------------------|--------------------|-------------|");
                    for point in &curve.points {
                        println!(
                            "| {:.1}% | {:.1}% | {} |",
                            point.percentile, point.cumulative_pct, point.author,
                        );
                    }
                    println!();
                    if let Some(share) = curve.top20_share {
                        println!(
                            "**Top 20% of contributors make {share:.0}% of commits.**\n"
                        );
                    }
                }
            }
            if want(ContributorAnalysis::Repos) {
                let per_repo = contributors::contributors_per_repo(view);
                println!("## Contributors per Repository\n");
                if per_repo.is_empty() {
                    println!("No repositories in the filtered view.\n");
                } else {
                    println!("| Repository | Contributors |");
                    println!("|------------|--------------|");
                    for entry in &per_repo {
                        println!("| `{}` | {} |", entry.repo, entry.contributors);
                    }
                    println!();
                }
            }
            if want(ContributorAnalysis::Weekly) {
                let weekly = contributors::top_weekly_activity(view, weekly_k);
                println!("## Weekly Activity (top {weekly_k})\n");
                if weekly.is_empty() {
                    println!("No commits in the filtered view.\n");
                } else {
                    println!("| Contributor | Week | Commits |");
                    println!("|-------------|------|---------|");
                    for series in &weekly {
                        for week in &series.weeks {
                            println!(
                                "| {} | {} | {} |",
                                series.author, week.week, week.commits,
                            );
                        }
                    }
                    println!();
                }
            }
        }
        OutputFormat::Text => {
            if want(ContributorAnalysis::Ranking) {
                let ranking = contributors::top_contributors(view, limit);
                println!("Top contributors (up to {limit}):");
                println!("{:-<72}", "");
                if ranking.is_empty() {
                    println!("  No commits in the filtered view.");
                }
                for (idx, entry) in ranking.iter().enumerate() {
                    println!("  {:>2}. {:<40} {}", idx + 1, entry.author, entry.commits);
                }
                println!();
            }
            if want(ContributorAnalysis::Pareto) {
                let curve = contributors::pareto_curve(view);
                println!("Contribution concentration:");
                println!("{:-<72}", "");
                if curve.points.is_empty() {
                    println!("  No commits in the filtered view.");
                }
                for point in &curve.points {
                    println!(
                        "  {:>5.1}% of contributors -> {:>5.1}% of commits ({})",
                        point.percentile, point.cumulative_pct, point.author,
                    );
                }
                if let Some(share) = curve.top20_share {
                    println!("  Top 20% of contributors make {share:.0}% of commits");
                }
                println!();
            }
            if want(ContributorAnalysis::Repos) {
                let per_repo = contributors::contributors_per_repo(view);
                println!("Contributors per repository:");
                println!("{:-<72}", "");
                if per_repo.is_empty() {
                    println!("  No repositories in the filtered view.");
                }
                for entry in &per_repo {
                    println!("  {:<40} {}", entry.repo, entry.contributors);
                }
                println!();
            }
            if want(ContributorAnalysis::Weekly) {
                let weekly = contributors::top_weekly_activity(view, weekly_k);
                println!("Weekly activity (top {weekly_k} contributors):");
                println!("{:-<72}", "");
                if weekly.is_empty() {
                    println!("  No commits in the filtered view.");
                }
                for series in &weekly {
                    println!("  {}:", series.author);
                    for week in &series.weeks {
                        println!("    {}  {}", week.week, week.commits);
                    }
                }
                println!();
            }
        }
    }
    Ok(())
}

fn run_overlap(view: &FilteredView, format: OutputFormat) -> Result<()> {
    let matrix = overlap::overlap_matrix(view);

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "overlap": matrix }))
                    .into_diagnostic()?
            );
        }
        OutputFormat::Markdown => match &matrix {
            None => println!("Contributor overlap needs at least two selected repositories."),
            Some(m) => {
                println!("# Contributor Overlap — {}\n", view.spec.org);
                let header: Vec<String> =
                    m.repos.iter().map(|r| format!("`{r}`")).collect();
                println!("| | {} |", header.join(" | "));
                println!("|--|{}", "---|".repeat(m.repos.len()));
                for (row_idx, row) in m.matrix.iter().enumerate() {
                    let cells: Vec<String> = row.iter().map(u64::to_string).collect();
                    println!("| `{}` | {} |", m.repos[row_idx], cells.join(" | "));
                }
                println!("\nThe diagonal holds each repository's distinct-contributor count.");
            }
        },
        OutputFormat::Text => match &matrix {
            None => println!("Contributor overlap needs at least two selected repositories."),
            Some(m) => {
                let width = m.repos.iter().map(String::len).max().unwrap_or(0).max(4);
                println!("Contributor overlap (diagonal = distinct contributors):");
                println!("{:-<72}", "");
                let header: Vec<String> =
                    m.repos.iter().map(|r| format!("{r:>width$}")).collect();
                println!("  {:<width$} {}", "", header.join(" "));
                for (row_idx, row) in m.matrix.iter().enumerate() {
                    let cells: Vec<String> =
                        row.iter().map(|c| format!("{c:>width$}")).collect();
                    println!("  {:<width$} {}", m.repos[row_idx], cells.join(" "));
                }
            }
        },
    }
    Ok(())
}

fn run_content(
    view: &FilteredView,
    classifier: &mut Classifier,
    report: ContentReport,
    format: OutputFormat,
) -> Result<()> {
    let want = |r: ContentReport| report == r || report == ContentReport::All;

    if !view.capabilities.has_message {
        match format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "available": false,
                    "reason": "no commit messages in the record store",
                }))
                .into_diagnostic()?
            ),
            _ => println!("Commit messages are not available in this data set."),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let mut json = serde_json::Map::new();
            if want(ContentReport::Breakdown) {
                json.insert(
                    "breakdown".into(),
                    serde_json::to_value(content::label_breakdown(view, classifier))
                        .into_diagnostic()?,
                );
            }
            if want(ContentReport::Trends) {
                json.insert(
                    "trends".into(),
                    serde_json::to_value(content::monthly_focus(view, classifier))
                        .into_diagnostic()?,
                );
            }
            if want(ContentReport::Focus) {
                json.insert(
                    "focus".into(),
                    serde_json::to_value(content::repo_focus(view, classifier))
                        .into_diagnostic()?,
                );
            }
            if want(ContentReport::Recent) {
                json.insert(
                    "recent".into(),
                    serde_json::to_value(content::recent_commits(view, 10)).into_diagnostic()?,
                );
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(json))
                    .into_diagnostic()?
            );
        }
        OutputFormat::Markdown => {
            println!("# Commit Content — {}\n", view.spec.org);
            if want(ContentReport::Breakdown) {
                if let Some(breakdown) = content::label_breakdown(view, classifier) {
                    println!("## Commit Types ({} commits)\n", breakdown.total);
                    println!("| Type | Commits |");
                    println!("|------|---------|");
                    for count in &breakdown.counts {
                        println!("| {} | {} |", count.label.display_name(), count.commits);
                    }
                    println!("| Unclassified | {} |", breakdown.unclassified);
                    println!();
                }
            }
            if want(ContentReport::Trends) {
                if let Some(trends) = content::monthly_focus(view, classifier) {
                    println!("## Development Focus by Month\n");
                    println!("| Month | Type | Commits |");
                    println!("|-------|------|---------|");
                    for entry in &trends {
                        println!(
                            "| {} | {} | {} |",
                            entry.month,
                            entry.label.display_name(),
                            entry.commits,
                        );
                    }
                    println!();
                }
            }
            if want(ContentReport::Focus) {
                if let Some(focus) = content::repo_focus(view, classifier) {
                    println!("## Development Focus by Repository\n");
                    println!("| Repository | Type | Share |");
                    println!("|------------|------|-------|");
                    for entry in &focus {
                        println!(
                            "| `{}` | {} | {:.1}% |",
                            entry.repo,
                            entry.label.display_name(),
                            entry.share_pct,
                        );
                    }
                    println!();
                }
            }
            if want(ContentReport::Recent) {
                if let Some(recent) = content::recent_commits(view, 10) {
                    println!("## Recent Commits\n");
                    println!("| Date | Repository | Author | Message |");
                    println!("|------|------------|--------|---------|");
                    for commit in &recent {
                        println!(
                            "| {} | `{}` | {} | {} |",
                            commit.date.format("%Y-%m-%d %H:%M"),
                            commit.repo,
                            commit.author,
                            commit.message,
                        );
                    }
                    println!();
                }
            }
        }
        OutputFormat::Text => {
            if want(ContentReport::Breakdown) {
                if let Some(breakdown) = content::label_breakdown(view, classifier) {
                    println!("Commit types ({} commits):", breakdown.total);
                    println!("{:-<72}", "");
                    for count in &breakdown.counts {
                        println!("  {:<16} {}", count.label.display_name(), count.commits);
                    }
                    println!("  {:<16} {}\n", "Unclassified", breakdown.unclassified);
                }
            }
            if want(ContentReport::Trends) {
                if let Some(trends) = content::monthly_focus(view, classifier) {
                    println!("Development focus by month:");
                    println!("{:-<72}", "");
                    for entry in &trends {
                        println!(
                            "  {}  {:<16} {}",
                            entry.month,
                            entry.label.display_name(),
                            entry.commits,
                        );
                    }
                    println!();
                }
            }
            if want(ContentReport::Focus) {
                if let Some(focus) = content::repo_focus(view, classifier) {
                    println!("Development focus by repository:");
                    println!("{:-<72}", "");
                    for entry in &focus {
                        println!(
                            "  {:<32} {:<16} {:.1}%",
                            entry.repo,
                            entry.label.display_name(),
                            entry.share_pct,
                        );
                    }
                    println!();
                }
            }
            if want(ContentReport::Recent) {
                if let Some(recent) = content::recent_commits(view, 10) {
                    println!("Recent commits:");
                    println!("{:-<72}", "");
                    for commit in &recent {
                        println!(
                            "  {}  {:<20} {:<16} {}",
                            commit.date.format("%Y-%m-%d %H:%M"),
                            commit.repo,
                            commit.author,
                            commit.message,
                        );
                    }
                    println!();
                }
            }
        }
    }
    Ok(())
}

fn run_repos(view: &FilteredView, metric: RepoMetric, format: OutputFormat) -> Result<()> {
    let want = |m: RepoMetric| metric == m || metric == RepoMetric::All;

    match format {
        OutputFormat::Json => {
            let mut json = serde_json::Map::new();
            if want(RepoMetric::Activity) {
                json.insert(
                    "activity".into(),
                    serde_json::to_value(repos::repo_activity(view)).into_diagnostic()?,
                );
            }
            if want(RepoMetric::Stars) {
                json.insert(
                    "stars".into(),
                    serde_json::to_value(repos::star_ranking(view)).into_diagnostic()?,
                );
            }
            if want(RepoMetric::Forks) {
                json.insert(
                    "forks".into(),
                    serde_json::to_value(repos::fork_ranking(view)).into_diagnostic()?,
                );
            }
            if want(RepoMetric::Languages) {
                json.insert(
                    "languages".into(),
                    serde_json::to_value(repos::language_distribution(view)).into_diagnostic()?,
                );
            }
            if want(RepoMetric::Timeline) {
                json.insert(
                    "timeline".into(),
                    serde_json::to_value(repos::creation_timeline(view)).into_diagnostic()?,
                );
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(json))
                    .into_diagnostic()?
            );
        }
        OutputFormat::Markdown => {
            println!("# Repositories — {}\n", view.spec.org);
            if want(RepoMetric::Activity) {
                let activity = repos::repo_activity(view);
                println!("## Activity\n");
                if activity.is_empty() {
                    println!("No repositories in the filtered view.\n");
                } else {
                    println!("| Repository | Commits | Active days | Commits/day |");
                    println!("|------------|---------|-------------|-------------|");
                    for entry in &activity {
                        println!(
                            "| `{}` | {} | {} | {:.2} |",
                            entry.repo, entry.commits, entry.active_days, entry.commits_per_day,
                        );
                    }
                    println!();
                }
            }
            if want(RepoMetric::Stars) {
                let stars = repos::star_ranking(view);
                println!("## Stars\n");
                println!("| Repository | Stars |");
                println!("|------------|-------|");
                for entry in &stars {
                    println!("| `{}` | {} |", entry.repo, entry.stars);
                }
                println!();
            }
            if want(RepoMetric::Forks) {
                let forks = repos::fork_ranking(view);
                println!("## Forks\n");
                println!("| Repository | Forks |");
                println!("|------------|-------|");
                for entry in &forks {
                    println!("| `{}` | {} |", entry.repo, entry.forks);
                }
                println!();
            }
            if want(RepoMetric::Languages) {
                match repos::language_distribution(view) {
                    None => println!("Language data is not available in this data set.\n"),
                    Some(shares) => {
                        println!("## Languages\n");
                        println!("| Language | Repositories |");
                        println!("|----------|--------------|");
                        for share in &shares {
                            println!("| {} | {} |", share.language, share.repos);
                        }
                        println!();
                    }
                }
            }
            if want(RepoMetric::Timeline) {
                let timeline = repos::creation_timeline(view);
                println!("## Creation Timeline\n");
                println!("| Created | Repository |");
                println!("|---------|------------|");
                for entry in &timeline {
                    println!(
                        "| {} | `{}` |",
                        entry.created_at.format("%Y-%m-%d"),
                        entry.repo,
                    );
                }
                println!();
            }
        }
        OutputFormat::Text => {
            if want(RepoMetric::Activity) {
                let activity = repos::repo_activity(view);
                println!("Repository activity:");
                println!("{:-<72}", "");
                if activity.is_empty() {
                    println!("  No repositories in the filtered view.");
                }
                for entry in &activity {
                    println!(
                        "  {:<32} {:>5} commits  {:>5.2}/day over {} days",
                        entry.repo, entry.commits, entry.commits_per_day, entry.active_days,
                    );
                }
                println!();
            }
            if want(RepoMetric::Stars) {
                let stars = repos::star_ranking(view);
                println!("Stars:");
                println!("{:-<72}", "");
                for entry in &stars {
                    println!("  {:<40} {}", entry.repo, entry.stars);
                }
                println!();
            }
            if want(RepoMetric::Forks) {
                let forks = repos::fork_ranking(view);
                println!("Forks:");
                println!("{:-<72}", "");
                for entry in &forks {
                    println!("  {:<40} {}", entry.repo, entry.forks);
                }
                println!();
            }
            if want(RepoMetric::Languages) {
                match repos::language_distribution(view) {
                    None => println!("Language data is not available in this data set.\n"),
                    Some(shares) => {
                        println!("Languages:");
                        println!("{:-<72}", "");
                        for share in &shares {
                            println!("  {:<24} {} repos", share.language, share.repos);
                        }
                        println!();
                    }
                }
            }
            if want(RepoMetric::Timeline) {
                let timeline = repos::creation_timeline(view);
                println!("Creation timeline:");
                println!("{:-<72}", "");
                for entry in &timeline {
                    println!(
                        "  {}  {}",
                        entry.created_at.format("%Y-%m-%d"),
                        entry.repo,
                    );
                }
                println!();
            }
        }
    }
    Ok(())
}
