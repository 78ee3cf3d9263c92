pub mod buckets;
pub mod calendar;
pub mod cli;
pub mod commands;
pub mod config;
pub mod descriptions;
pub mod error;
pub mod feed;
pub mod listing;
pub mod page;
pub mod palette;
pub mod render;

use std::ffi::OsString;

use clap::Parser;
use tracing::{
  debug,
  info
};

pub use buckets::filter_by_names;
pub use calendar::{
  CalendarRef,
  ListingRecord,
  LocalizedText,
  RawCalendarEntry
};
pub use descriptions::DescriptionTable;
pub use error::ListingError;
pub use listing::build;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting luach CLI"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.rc_file.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );

  let mut renderer =
    render::Renderer::new(
      &cfg, cli.lang
    )?;
  let inv = cli::Invocation::parse(
    &cfg, cli.rest
  )?;

  commands::dispatch(
    &cfg,
    &mut renderer,
    inv,
    cli.feed.as_deref()
  )?;

  info!("done");
  Ok(())
}
