use std::path::{Path, PathBuf};

use anyhow::Context;
use blog_image_audit::remap::{RemapOptions, remap_legacy_references, render_remap_summary};
use blog_image_audit::report::{render_console_report, render_footer, write_report};
use blog_image_audit::{AuditConfig, AuditLayout, AuditReport, ContentAuditor, RecordSelection};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

/// Audit image references in localized JSON blog posts.
#[derive(Debug, Parser)]
#[command(name = "blog-image-audit", version, about)]
struct Cli {
  /// Project root that content and asset paths are resolved against.
  #[arg(long, global = true, default_value = ".")]
  root: PathBuf,
  /// Configuration file to use instead of `<root>/audit.config.json`.
  #[arg(long, global = true)]
  config: Option<PathBuf>,
  /// Only audit posts with this slug (repeatable, `prefix*` allowed).
  #[arg(long = "slug", global = true)]
  slugs: Vec<String>,
  /// Show debug diagnostics.
  #[arg(short, long, global = true, conflicts_with = "quiet")]
  verbose: bool,
  /// Only show errors.
  #[arg(short, long, global = true)]
  quiet: bool,
  /// Where to write the JSON report.
  #[arg(long, global = true)]
  output: Option<PathBuf>,
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Audit posts and write the report (default).
  Audit,
  /// Rewrite legacy image paths that already have an optimized counterpart.
  Remap(RemapArgs),
}

#[derive(Debug, Args)]
struct RemapArgs {
  /// Show what would change without writing files.
  #[arg(long)]
  dry_run: bool,
  /// Only process one locale.
  #[arg(long)]
  locale: Option<String>,
}

fn main() {
  if let Err(error) = run() {
    eprintln!("blog-image-audit error: {error:#}");
    std::process::exit(1);
  }
}

fn run() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.quiet, cli.verbose)?;

  let config = match &cli.config {
    Some(path) => AuditConfig::from_path(path)
      .with_context(|| format!("failed to load configuration from {}", path.display()))?,
    None => AuditConfig::discover(&cli.root),
  };
  let mut layout = config.into_layout(&cli.root);
  if let Some(output) = &cli.output {
    layout.report_path = output.clone();
  }

  let selection = load_selection(&layout).restrict_to(cli.slugs.iter().cloned());
  if !selection.is_unfiltered() {
    info!(
      path = %layout.selection_path.display(),
      "only posts matching the slug selection are processed"
    );
  }

  match &cli.command {
    None | Some(Command::Audit) => run_audit(&layout, &selection, &cli.root),
    Some(Command::Remap(args)) => run_remap(&layout, &selection, args),
  }

  Ok(())
}

fn load_selection(layout: &AuditLayout) -> RecordSelection {
  RecordSelection::load_from_path(&layout.selection_path).unwrap_or_else(|error| {
    warn!(%error, "ignoring slug selection file");
    RecordSelection::default()
  })
}

fn run_audit(layout: &AuditLayout, selection: &RecordSelection, root: &Path) {
  let outcome = ContentAuditor::new(layout).run(selection);
  let report = AuditReport::from_outcome(&outcome);
  println!("{}", render_console_report(&outcome, &report));

  let shown = layout.display_report_path(root);
  let footer = match write_report(&layout.report_path, &report) {
    Ok(()) => render_footer(Ok(&shown)),
    Err(error) => {
      warn!(%error, "report was not saved");
      render_footer(Err(&error.to_string()))
    }
  };
  println!("{footer}");
}

fn run_remap(layout: &AuditLayout, selection: &RecordSelection, args: &RemapArgs) {
  let pools = ContentAuditor::new(layout).load_pools();
  let options = RemapOptions {
    dry_run: args.dry_run,
    locale: args.locale.clone(),
  };
  let summary = remap_legacy_references(layout, &pools, selection, &options);
  println!("{}", render_remap_summary(&summary, layout, options.dry_run));
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
  let level = if quiet {
    "error"
  } else if verbose {
    "debug"
  } else {
    "info"
  };

  let filter = tracing_subscriber::EnvFilter::try_from_env("AUDIT_LOG")
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init()
    .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
  }

  #[test]
  fn no_arguments_runs_the_audit_with_defaults() {
    let cli = Cli::try_parse_from(["blog-image-audit"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(cli.root, PathBuf::from("."));
    assert!(cli.slugs.is_empty());
  }

  #[test]
  fn parses_remap_flags_and_global_options() {
    let cli = Cli::try_parse_from([
      "blog-image-audit",
      "remap",
      "--dry-run",
      "--locale",
      "fr",
      "--slug",
      "ammonia",
      "--root",
      "site",
    ])
    .unwrap();

    let Some(Command::Remap(args)) = cli.command else {
      panic!("expected remap command");
    };
    assert!(args.dry_run);
    assert_eq!(args.locale.as_deref(), Some("fr"));
    assert_eq!(cli.slugs, vec!["ammonia".to_string()]);
    assert_eq!(cli.root, PathBuf::from("site"));
  }

  #[test]
  fn output_is_accepted_after_the_audit_subcommand() {
    let cli = Cli::try_parse_from(["blog-image-audit", "audit", "--output", "x.json"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Audit)));
    assert_eq!(cli.output, Some(PathBuf::from("x.json")));
  }
}
