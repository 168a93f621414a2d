use anyhow::{Context, Result};
use clap::ArgMatches;
use cloudhunt_core::hunt::{HuntOptions, execute_hunt};
use cloudhunt_core::permutation::{load_affixes, load_resolvers, parse_affixes, parse_resolvers};
use cloudhunt_core::report::{
    default_report_path, format_acl, format_bucket_line, summary_line, write_json_report,
};
use cloudhunt_scanner::bucket::Bucket;
use cloudhunt_scanner::pool::MAX_WORKERS;
use colored::Colorize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

const DEFAULT_PERMUTATIONS: &str = include_str!("../wordlists/permutations.txt");
const DEFAULT_RESOLVERS: &str = include_str!("../wordlists/resolvers.txt");

/// Expand `~` in a user-supplied path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Affixes from `path`, or the bundled list
pub fn load_affixes_or_default(path: Option<&str>) -> Result<Vec<String>, String> {
    match path {
        Some(path) => load_affixes(&expand_path(path)),
        None => Ok(parse_affixes(DEFAULT_PERMUTATIONS)),
    }
}

/// Resolvers from `path`, or the bundled list
pub fn load_resolvers_or_default(path: Option<&str>) -> Result<Vec<SocketAddr>, String> {
    match path {
        Some(path) => load_resolvers(&expand_path(path)),
        None => Ok(parse_resolvers(DEFAULT_RESOLVERS)),
    }
}

pub fn report_path(output: Option<&str>, base_name: &str) -> PathBuf {
    match output {
        Some(path) => expand_path(path),
        None => default_report_path(base_name),
    }
}

/// Build the hunt configuration from parsed arguments
pub fn hunt_options_from_matches(matches: &ArgMatches) -> Result<HuntOptions> {
    let input = matches
        .get_one::<String>("INPUT")
        .context("an input name or URL is required")?;
    let threads = *matches.get_one::<usize>("threads").unwrap_or(&10);
    let crawl_depth = *matches.get_one::<usize>("crawl-deep").unwrap_or(&1);

    let affixes = load_affixes_or_default(
        matches
            .get_one::<String>("permutations-file")
            .map(String::as_str),
    )
    .map_err(anyhow::Error::msg)?;
    let resolvers =
        load_resolvers_or_default(matches.get_one::<String>("resolvers").map(String::as_str))
            .map_err(anyhow::Error::msg)?;

    Ok(HuntOptions {
        input: input.clone(),
        threads: threads.clamp(1, MAX_WORKERS),
        crawl_depth,
        active_crawl: !matches.get_flag("no-active-crawl"),
        open_only: matches.get_flag("open-only"),
        verbose: matches.get_flag("verbose"),
        base_only: matches.get_flag("base-only"),
        disable_bruteforce: matches.get_flag("disable-bruteforce"),
        affixes,
        resolvers,
        show_progress_bars: true,
    })
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

pub async fn handle_hunt(matches: &ArgMatches) -> Result<()> {
    let options = hunt_options_from_matches(matches)?;
    init_tracing(options.verbose);

    let verbose = options.verbose;
    let output = matches.get_one::<String>("output").cloned();

    let progress_callback = Arc::new(|msg: String| {
        println!("{}", msg.bright_white());
    });
    let result_callback = Arc::new(move |bucket: &Bucket| {
        println!("{}", format_bucket_line(bucket));
        if verbose && let Some(acl) = format_acl(bucket) {
            println!("{}", acl);
        }
    });

    let report = execute_hunt(options, Some(progress_callback), Some(result_callback))
        .await
        .map_err(anyhow::Error::msg)?;

    let path = report_path(output.as_deref(), &report.base_name);
    write_json_report(&path, &report.buckets).map_err(anyhow::Error::msg)?;

    println!();
    println!("{} {}", "✓".green().bold(), summary_line(&report.buckets));
    println!(
        "{} Report: {}",
        "→".blue(),
        path.display().to_string().bright_white()
    );
    Ok(())
}
