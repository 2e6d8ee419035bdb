//! Clean command: build and write the canonical table

use std::path::Path;

use anyhow::{Context, Result};
use donasi_core::reports::stats::total;
use donasi_core::{format_rupiah, write_canonical};

use super::Session;

pub fn cmd_clean(session: &mut Session, output: &Path) -> Result<()> {
    println!("🧹 Cleaning donation exports...");
    println!("   QRIS:   {}", session.paths().qris.display());
    println!("   Manual: {}", session.paths().manual.display());

    let dataset = session.dataset()?;
    let stats = dataset.stats();

    println!();
    println!("   {:28} {:>8}", "Rows read (QRIS)", stats.qris_rows);
    println!("   {:28} {:>8}", "Rows read (Manual)", stats.manual_rows);
    println!("   {:28} {:>8}", "Dropped: zero amount", stats.zero_amount);
    if stats.malformed_amount > 0 {
        println!(
            "   {:28} {:>8}",
            "  of which had no digits", stats.malformed_amount
        );
    }
    println!(
        "   {:28} {:>8}",
        "Dropped: no campaign", stats.placeholder_campaign
    );
    println!("   {:28} {:>8}", "Anonymous donors", stats.anonymized);
    println!("   {:28} {:>8}", "Rows written", stats.rows_out);

    if let Some((from, to)) = dataset.date_range() {
        let total = total(dataset.donations().iter().map(|d| d.amount));
        println!();
        println!("   Period: {} to {}", from, to);
        println!("   Total:  {}", format_rupiah(total as f64));
        println!("   Statuses: {}", dataset.statuses().join(", "));
    }

    write_canonical(&dataset, output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!();
    println!("✅ Wrote {} rows to {}", dataset.len(), output.display());
    Ok(())
}
