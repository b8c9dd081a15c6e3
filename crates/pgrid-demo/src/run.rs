use std::io::Write;

use pgrid_core::scale::ScaleReading;
use pgrid_harness::{PinchScript, ReplayReport, SimulatedHost, replay};
use pgrid_layout::{LayoutCatalog, LayoutDescriptor};
use pgrid_runtime::{TransitionController, TransitionPolicy};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Mode};
use crate::error::Result;

/// Install the fmt subscriber. `RUST_LOG` wins over `--log-level`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load the policy named on the command line, or the defaults.
pub fn load_policy(cli: &Cli) -> Result<TransitionPolicy> {
    let Some(path) = cli.config.as_deref() else {
        return Ok(TransitionPolicy::default());
    };
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let policy = if is_json {
        TransitionPolicy::from_json_file(path)?
    } else {
        TransitionPolicy::from_toml_file(path)?
    };
    info!(path = %path.display(), "loaded transition policy");
    Ok(policy)
}

pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let policy = load_policy(cli)?;
    match cli.mode() {
        Mode::Replay => run_replay(cli, &policy, out),
        Mode::Layouts => run_layouts(cli, &policy, out),
        Mode::Preview(scale) => run_preview(cli, &policy, scale, out),
        Mode::PrintPolicy => {
            write!(out, "{}", toml::to_string(&policy)?)?;
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ReplayOutput<'a> {
    script: String,
    /// Column counts the grid moved through, starting layout first.
    column_path: Vec<u16>,
    final_layout: LayoutDescriptor,
    item_count: usize,
    content_height: f64,
    #[serde(flatten)]
    report: &'a ReplayReport,
}

fn run_replay(cli: &Cli, policy: &TransitionPolicy, out: &mut impl Write) -> Result<()> {
    let script = PinchScript::parse(&cli.script)?;
    let frame = cli.frame()?;

    let catalog = policy.build_catalog()?;
    let start_columns = catalog.current().columns();
    let host = SimulatedHost::new(*catalog.current());
    let mut controller = TransitionController::new(catalog, host)
        .with_commit_threshold(policy.transition.commit_threshold);

    let report = replay(&mut controller, &script, frame, cli.max_frames);
    if controller.host().is_settling() {
        warn!(
            max_frames = cli.max_frames,
            "host was still settling when the replay ended"
        );
    }

    let catalog = controller.catalog();
    let column_path = std::iter::once(start_columns)
        .chain(
            report
                .committed_path()
                .into_iter()
                .filter_map(|i| catalog.get(i).map(LayoutDescriptor::columns)),
        )
        .collect();
    let item_count = policy.catalog.item_count;
    let output = ReplayOutput {
        script: script.to_string(),
        column_path,
        final_layout: *controller.current_layout(),
        item_count,
        content_height: controller.current_layout().content_height(item_count),
        report: &report,
    };

    if cli.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        write_replay_text(&output, out)?;
    }
    Ok(())
}

fn write_replay_text(output: &ReplayOutput<'_>, out: &mut impl Write) -> Result<()> {
    let report = output.report;
    let path = output
        .column_path
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");

    writeln!(out, "script:       {}", output.script)?;
    writeln!(
        out,
        "replayed:     {} gestures, {} samples, {} settle frames",
        report.gestures, report.samples, report.frames
    )?;
    writeln!(out, "columns:      {path}")?;
    writeln!(
        out,
        "final layout: {} columns, item edge {:.2}, content height {:.2} ({} items)",
        output.final_layout.columns(),
        output.final_layout.item_edge(),
        output.content_height,
        output.item_count
    )?;
    writeln!(
        out,
        "sessions:     {} started, {} committed, {} reverted, {} refused, {} invalid, {} stale",
        report.sessions_started,
        report.committed,
        report.reverted,
        report.begin_rejected,
        report.invalid_samples,
        report.stale_completions
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct LayoutRow {
    index: usize,
    current: bool,
    #[serde(flatten)]
    layout: LayoutDescriptor,
    rows: usize,
    content_height: f64,
}

fn layout_rows(catalog: &LayoutCatalog, item_count: usize) -> Vec<LayoutRow> {
    catalog
        .iter()
        .enumerate()
        .map(|(index, layout)| LayoutRow {
            index,
            current: index == catalog.current_index(),
            layout: *layout,
            rows: layout.rows(item_count),
            content_height: layout.content_height(item_count),
        })
        .collect()
}

fn run_layouts(cli: &Cli, policy: &TransitionPolicy, out: &mut impl Write) -> Result<()> {
    let catalog = policy.build_catalog()?;
    let rows = layout_rows(&catalog, policy.catalog.item_count);

    if cli.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }
    for row in &rows {
        writeln!(
            out,
            "{} {:>2}: {:>3} columns  edge {:>7.2}  {:>4} rows  height {:>9.2}",
            if row.current { '*' } else { ' ' },
            row.index,
            row.layout.columns(),
            row.layout.item_edge(),
            row.rows,
            row.content_height
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct PreviewOutput {
    scale: f64,
    log_scale: f64,
    from_columns: u16,
    target_index: Option<usize>,
    target_columns: Option<u16>,
    progress: f64,
    would_commit: bool,
}

fn run_preview(
    cli: &Cli,
    policy: &TransitionPolicy,
    scale: f64,
    out: &mut impl Write,
) -> Result<()> {
    let catalog = policy.build_catalog()?;
    let reading = ScaleReading::evaluate(scale, catalog.current_index(), catalog.len())?;
    let target_columns = reading
        .target
        .and_then(|i| catalog.get(i))
        .map(LayoutDescriptor::columns);
    let output = PreviewOutput {
        scale,
        log_scale: reading.log_scale,
        from_columns: catalog.current().columns(),
        target_index: reading.target,
        target_columns,
        progress: reading.progress,
        would_commit: reading.target.is_some()
            && reading.progress > policy.transition.commit_threshold,
    };

    if cli.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }
    match output.target_columns {
        Some(columns) => writeln!(
            out,
            "scale {} (log2 {:+.3}): {} -> {} columns at progress {:.3}, release would {}",
            output.scale,
            output.log_scale,
            output.from_columns,
            columns,
            output.progress,
            if output.would_commit { "commit" } else { "revert" }
        )?,
        None => writeln!(
            out,
            "scale {} (log2 {:+.3}): no layout change from {} columns",
            output.scale, output.log_scale, output.from_columns
        )?,
    }
    Ok(())
}
