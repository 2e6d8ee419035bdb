//! Export command: write one report table to a file

use std::path::Path;

use anyhow::{Context, Result};
use donasi_core::{export_table_to_file, ExportFormat, ExportTable};

use super::{build_filter, select, Session};
use crate::cli::FilterArgs;

pub fn cmd_export(
    session: &mut Session,
    table: &str,
    output: &Path,
    format: &str,
    filter: &FilterArgs,
) -> Result<()> {
    let table: ExportTable = table.parse().map_err(anyhow::Error::msg)?;
    let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;
    let filter = build_filter(filter)?;

    let dataset = session.dataset()?;
    let selection = select(&dataset, &filter)?;

    println!("📤 Exporting {} ({} donations selected)...", table, selection.len());

    let rows = export_table_to_file(
        table,
        &selection,
        &session.config().cleaning,
        format,
        output,
    )
    .with_context(|| format!("Failed to export {} to {}", table, output.display()))?;

    println!("✅ Exported {} rows to {}", rows, output.display());
    Ok(())
}
