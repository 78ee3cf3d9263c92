use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, anyhow};
use tracing::{debug, info, instrument};

use crate::buckets::{Bucket, filter_by_names};
use crate::calendar::ListingRecord;
use crate::cli::Invocation;
use crate::config::{Config, resolve_feed_path};
use crate::descriptions::DescriptionTable;
use crate::feed::load_feed;
use crate::listing::build;
use crate::page::CalendarsPage;
use crate::render::Renderer;

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "page", "list", "bucket", "export", "series", "help", "version",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(cfg, renderer, inv, feed_override))]
pub fn dispatch(
    cfg: &Config,
    renderer: &mut Renderer,
    inv: Invocation,
    feed_override: Option<&Path>,
) -> anyhow::Result<()> {
    let command = inv.command.as_str();
    debug!(command, args = ?inv.command_args, "dispatching command");

    match command {
        "page" => cmd_page(cfg, renderer, feed_override),
        "list" => cmd_list(cfg, renderer, feed_override),
        "bucket" => cmd_bucket(cfg, renderer, &inv.command_args, feed_override),
        "export" => cmd_export(cfg, feed_override),
        "series" => cmd_series(cfg, renderer),
        "help" => cmd_help(),
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

/// The configured description table, or the built-in one.
pub fn resolve_descriptions(cfg: &Config) -> anyhow::Result<Cow<'static, DescriptionTable>> {
    match cfg.get_path("descriptions.file") {
        Some(path) => {
            info!(path = %path.display(), "using description table override");
            Ok(Cow::Owned(DescriptionTable::load(&path)?))
        }
        None => Ok(Cow::Borrowed(DescriptionTable::builtin())),
    }
}

/// Loads the feed and merges it into listing records.
#[instrument(skip(cfg, feed_override))]
pub fn load_listings(
    cfg: &Config,
    feed_override: Option<&Path>,
) -> anyhow::Result<Vec<ListingRecord>> {
    let feed_path = resolve_feed_path(cfg, feed_override)?;
    let raw = load_feed(&feed_path)?;
    let descriptions = resolve_descriptions(cfg)?;
    let records = build(&raw, &descriptions)
        .with_context(|| format!("cannot build listings from {}", feed_path.display()))?;
    debug!(raw = raw.len(), records = records.len(), "loaded listings");
    Ok(records)
}

#[instrument(skip(cfg, renderer, feed_override))]
fn cmd_page(
    cfg: &Config,
    renderer: &mut Renderer,
    feed_override: Option<&Path>,
) -> anyhow::Result<()> {
    info!("command page");

    let multi_panel = multi_panel(cfg)?;
    let records = load_listings(cfg, feed_override)?;
    let page = CalendarsPage::assemble(&records, multi_panel);
    renderer.print_page(&page)
}

/// Whether the page runs in multi-panel mode (`multipanel`, off by default).
fn multi_panel(cfg: &Config) -> anyhow::Result<bool> {
    Ok(cfg.get_bool("multipanel")?.unwrap_or(false))
}

#[instrument(skip(cfg, renderer, feed_override))]
fn cmd_list(
    cfg: &Config,
    renderer: &mut Renderer,
    feed_override: Option<&Path>,
) -> anyhow::Result<()> {
    info!("command list");

    let records = load_listings(cfg, feed_override)?;
    renderer.print_listings(&records)
}

#[instrument(skip(cfg, renderer, args, feed_override))]
fn cmd_bucket(
    cfg: &Config,
    renderer: &mut Renderer,
    args: &[String],
    feed_override: Option<&Path>,
) -> anyhow::Result<()> {
    info!("command bucket");

    if args.is_empty() {
        return Err(anyhow!(
            "bucket requires a bucket name (weekly-portion, daily, weekly) or series titles"
        ));
    }

    let names = bucket_names(args);
    let records = load_listings(cfg, feed_override)?;
    let selected = filter_by_names(&records, names.iter().map(String::as_str));
    if selected.is_empty() {
        println!("No listings match.");
        return Ok(());
    }
    renderer.print_listings(&selected)
}

#[instrument(skip(cfg, feed_override))]
fn cmd_export(cfg: &Config, feed_override: Option<&Path>) -> anyhow::Result<()> {
    info!("command export");

    let records = load_listings(cfg, feed_override)?;
    let out = serde_json::to_string(&records)?;
    println!("{out}");
    Ok(())
}

#[instrument(skip(cfg, renderer))]
fn cmd_series(cfg: &Config, renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command series");

    let descriptions = resolve_descriptions(cfg)?;
    renderer.print_series(&descriptions)
}

fn cmd_help() -> anyhow::Result<()> {
    println!(
        "Implemented commands: page, list, \
         bucket <name...>, export, series, \
         help, version"
    );
    Ok(())
}

/// A single bucket keyword expands to its series; anything else is taken as series titles.
fn bucket_names(args: &[String]) -> Vec<String> {
    if let [single] = args
        && let Ok(bucket) = single.parse::<Bucket>()
    {
        return bucket.series().iter().map(ToString::to_string).collect();
    }
    args.to_vec()
}

#[cfg(test)]
mod tests {
    use super::{
        bucket_names, expand_command_abbrev, known_command_names, multi_panel,
        resolve_descriptions,
    };
    use crate::buckets::DAILY_LEARNING_SERIES;
    use crate::config::Config;

    #[test]
    fn abbreviations_must_be_unique() {
        let known = known_command_names();
        assert_eq!(expand_command_abbrev("ex", &known), Some("export"));
        assert_eq!(expand_command_abbrev("page", &known), Some("page"));
        assert_eq!(expand_command_abbrev("zzz", &known), None);

        let overlapping = ["series", "serve"];
        assert_eq!(expand_command_abbrev("ser", &overlapping), None);
    }

    #[test]
    fn bucket_keyword_expands_to_series() {
        let names = bucket_names(&["daily".to_string()]);
        assert_eq!(names, DAILY_LEARNING_SERIES.to_vec());

        let titles = bucket_names(&["Daf Yomi".to_string(), "daily".to_string()]);
        assert_eq!(titles, vec!["Daf Yomi".to_string(), "daily".to_string()]);
    }

    #[test]
    fn uses_builtin_descriptions_without_override() {
        let table = resolve_descriptions(&Config::default()).expect("descriptions");
        assert!(table.get("Haftarah").is_some());
    }

    #[test]
    fn multipanel_setting_must_be_a_flag() {
        let mut cfg = Config::default();
        assert!(!multi_panel(&cfg).expect("default flag"));

        cfg.apply_overrides([("rc.multipanel".to_string(), "yes".to_string())]);
        assert!(multi_panel(&cfg).expect("yes flag"));

        cfg.apply_overrides([("rc.multipanel".to_string(), "maybe".to_string())]);
        let err = multi_panel(&cfg).expect_err("maybe rejected");
        assert!(err.to_string().contains("invalid multipanel setting: maybe"));
    }
}
