//! Report command implementations

use anyhow::Result;
use donasi_core::models::{
    CampaignReport, DonorReport, MonthlyReport, PerformanceLevel, SummaryReport, TrendReport,
    WeekdayReport,
};
use donasi_core::reports::{self, performance_level};
use donasi_core::{format_rupiah, Donation};
use serde::Serialize;

use super::{build_filter, select, truncate, Session};
use crate::cli::FilterArgs;

/// Filter the session dataset and hand the selection to `f`
fn with_selection<T>(
    session: &mut Session,
    filter: &FilterArgs,
    f: impl FnOnce(&[&Donation], &Session) -> T,
) -> Result<T> {
    let filter = build_filter(filter)?;
    let dataset = session.dataset()?;
    let selection = select(&dataset, &filter)?;
    Ok(f(&selection, session))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn rp(value: f64) -> String {
    format_rupiah(value)
}

fn level_icon(level: PerformanceLevel) -> &'static str {
    match level {
        PerformanceLevel::VeryGood => "📈",
        PerformanceLevel::Good => "✅",
        PerformanceLevel::Fair => "⚠️",
        PerformanceLevel::NeedsImprovement => "🔴",
    }
}

pub fn cmd_report_summary(session: &mut Session, filter: &FilterArgs, json: bool) -> Result<()> {
    let report = with_selection(session, filter, |sel, s| {
        reports::summary(sel, &s.config().cleaning)
    })?;
    if json {
        return print_json(&report);
    }
    print_summary(&report);
    Ok(())
}

fn print_summary(report: &SummaryReport) {
    println!();
    println!("📌 Ringkasan Utama");
    if let Some(period) = &report.period {
        println!("   Period: {} to {}", period.from, period.to);
    }
    println!("   ─────────────────────────────────────────────────────────────");

    if report.transaction_count == 0 {
        println!("   No donations found for this selection.");
        return;
    }

    println!("   💰 Total Donasi:            {}", rp(report.total_amount as f64));
    println!("   🧾 Jumlah Transaksi:        {}", report.transaction_count);
    println!("   👥 Donatur Unik:            {}", report.unique_donors);
    println!("   📁 Campaign Aktif:          {}", report.active_campaigns);
    println!("   💵 Rata-rata per Transaksi: {}", rp(report.avg_per_transaction));
    println!("   🔄 Tingkat Loyalitas:       {:.1}x", report.loyalty_ratio);
    println!("   ✅ Tingkat Keberhasilan:    {:.1}%", report.success_rate);
    println!("   📊 Rata-rata per Campaign:  {}", rp(report.avg_per_campaign));
    if report.pending_total > 0 {
        println!(
            "   ⏳ Pending:                 {} awaiting confirmation",
            rp(report.pending_total as f64)
        );
    }

    println!();
    println!("   {:10} │ {:22} │ {:>8}", "Method", "Status", "Count");
    println!("   ───────────┼────────────────────────┼─────────");
    for row in &report.status_by_method {
        println!(
            "   {:10} │ {:22} │ {:>8}",
            row.method,
            truncate(&row.status, 22),
            row.count
        );
    }

    println!();
    println!(
        "   {:10} │ {:>8} │ {:>7} │ {:>9} │ {:>18} │ {:>16}",
        "Method", "Count", "Share", "Success", "Total", "Average"
    );
    println!("   ───────────┼──────────┼─────────┼───────────┼────────────────────┼─────────────────");
    for share in &report.method_popularity {
        let values = report.method_values.iter().find(|v| v.method == share.method);
        let success = report
            .success_by_method
            .iter()
            .find(|s| s.method == share.method)
            .map(|s| s.success_rate)
            .unwrap_or_default();
        println!(
            "   {:10} │ {:>8} │ {:>6.1}% │ {:>8.1}% │ {:>18} │ {:>16}",
            share.method,
            share.transaction_count,
            share.percentage,
            success,
            values.map(|v| rp(v.total as f64)).unwrap_or_default(),
            values.map(|v| rp(v.mean)).unwrap_or_default(),
        );
    }

    if let (Some(best), Some(worst)) = (report.best_method(), report.worst_method()) {
        println!();
        println!(
            "   🏆 Best method:  {} ({:.1}% success)",
            best.method, best.success_rate
        );
        if worst.method != best.method {
            println!(
                "   ⚠️  Worst method: {} ({:.1}% success)",
                worst.method, worst.success_rate
            );
        }
    }

    println!();
    println!("   Donor method preference:");
    for fav in &report.favourite_methods {
        println!(
            "     {:10} {:>6} donors ({:.1}%)",
            fav.method, fav.donor_count, fav.percentage
        );
    }
    println!(
        "     Loyal (1 method): {}   Flexible: {}   Loyalty: {:.1}%",
        report.single_method_donors, report.multi_method_donors, report.method_loyalty_rate
    );
}

pub fn cmd_report_donors(
    session: &mut Session,
    filter: &FilterArgs,
    top: usize,
    json: bool,
) -> Result<()> {
    let report = with_selection(session, filter, |sel, _| reports::donors(sel))?;
    if json {
        return print_json(&report);
    }
    print_donors(&report, top);
    Ok(())
}

fn print_donors(report: &DonorReport, top: usize) {
    println!();
    println!("👥 Donatur");
    println!("   ─────────────────────────────────────────────────────────────");

    if report.donors.is_empty() {
        println!("   No donors found for this selection.");
        return;
    }

    println!(
        "   🌟 Premium: {}   💎 Gold: {}   🥈 Silver: {}   🥉 Bronze: {}",
        report.premium, report.gold, report.silver, report.bronze
    );
    println!(
        "   Quartiles: q25 {}  q50 {}  q75 {}",
        rp(report.quartiles.q25),
        rp(report.quartiles.q50),
        rp(report.quartiles.q75)
    );

    println!();
    println!(
        "   {:24} │ {:>16} │ {:>5} │ {:8} │ {:8} │ {:>7}",
        "Donor", "Total", "Count", "Method", "Tier", "Share"
    );
    println!("   ─────────────────────────┼──────────────────┼───────┼──────────┼──────────┼────────");
    for d in report.top(top) {
        println!(
            "   {:24} │ {:>16} │ {:>5} │ {:8} │ {:8} │ {:>6.2}%",
            truncate(&d.donor, 24),
            rp(d.total as f64),
            d.count,
            d.favourite_method,
            d.tier,
            report.contribution(d)
        );
    }

    println!();
    println!(
        "   🎯 Core contributors (80% of donations): {} donors ({:.1}%)",
        report.core_contributors, report.core_percentage
    );
    if report.is_pareto_healthy() {
        println!("   ✅ Healthy Pareto distribution");
    } else {
        println!("   ⚠️  Donations are spread thinly; few major contributors");
    }
    println!("   🔄 Frequent small donors:  {}", report.frequent_small);
    println!("   💎 Infrequent large donors: {}", report.infrequent_large);
}

pub fn cmd_report_overall(session: &mut Session, filter: &FilterArgs, json: bool) -> Result<()> {
    let report = with_selection(session, filter, |sel, _| reports::trend(sel))?;
    if json {
        return print_json(&report);
    }
    print_trend(&report);
    Ok(())
}

fn print_trend(report: &TrendReport) {
    println!();
    println!("📊 Transaksi Keseluruhan");
    println!("   ─────────────────────────────────────────────────────────────");

    let (Some(best), Some(worst)) = (&report.best_day, &report.worst_day) else {
        println!("   No donations found for this selection.");
        return;
    };

    println!(
        "   {:10} │ {:>16} │ {:>5} │ {:>16} │ {:>16}",
        "Date", "Total", "Count", "MA 7", "MA 30"
    );
    println!("   ───────────┼──────────────────┼───────┼──────────────────┼─────────────────");
    for day in &report.days {
        println!(
            "   {:10} │ {:>16} │ {:>5} │ {:>16} │ {:>16}",
            day.date,
            rp(day.total as f64),
            day.count,
            rp(day.ma_7),
            rp(day.ma_30)
        );
    }

    println!();
    println!("   📈 Best day:      {} ({})", best.date, rp(best.total as f64));
    println!("   📉 Worst day:     {} ({})", worst.date, rp(worst.total as f64));
    println!("   📊 Daily average: {}", rp(report.average_daily));
    println!("   📊 Volatility:    {:.1}%", report.volatility);
    match report.trend_change {
        Some(change) if change > 10.0 => {
            println!("   📈 Last 30 days up {:.1}% on the 30 before", change)
        }
        Some(change) if change < -10.0 => {
            println!("   📉 Last 30 days down {:.1}% on the 30 before", change.abs())
        }
        Some(change) => println!("   📊 Stable: {:+.1}% over the last 30 days", change),
        None => {}
    }
}

pub fn cmd_report_daily(session: &mut Session, filter: &FilterArgs, json: bool) -> Result<()> {
    let report = with_selection(session, filter, |sel, _| reports::weekdays(sel))?;
    if json {
        return print_json(&report);
    }
    print_weekdays(&report);
    Ok(())
}

fn print_weekdays(report: &WeekdayReport) {
    println!();
    println!("📅 Transaksi Harian");
    println!("   ─────────────────────────────────────────────────────────────");

    if report.weekdays.is_empty() {
        println!("   No donations found for this selection.");
        return;
    }

    println!(
        "   {:8} │ {:>16} │ {:>14} │ {:>5} │ {:>7}",
        "Day", "Total", "Average", "Count", "Donors"
    );
    println!("   ─────────┼──────────────────┼────────────────┼───────┼────────");
    for w in &report.weekdays {
        println!(
            "   {:8} │ {:>16} │ {:>14} │ {:>5} │ {:>7}",
            w.weekday,
            rp(w.total as f64),
            rp(w.mean),
            w.count,
            w.unique_donors
        );
    }

    println!();
    if let (Some(best), Some(worst)) = (&report.best, &report.worst) {
        println!("   🏆 Best day:  {} ({})", best.weekday, rp(best.total as f64));
        println!("   📉 Worst day: {} ({})", worst.weekday, rp(worst.total as f64));
    }
    println!("   💼 Weekday average: {}", rp(report.weekday_average));
    println!("   🎉 Weekend average: {}", rp(report.weekend_average));
    println!("   📈 Weekend vs weekday: {:+.1}%", report.weekend_lift);

    if let (Some(peak), Some(quiet)) = (&report.peak_hour, &report.quiet_hour) {
        println!();
        println!("   ⏰ Peak hour:  {:02}:00 ({})", peak.hour, rp(peak.total as f64));
        println!("   😴 Quiet hour: {:02}:00 ({})", quiet.hour, rp(quiet.total as f64));
    }
}

pub fn cmd_report_monthly(session: &mut Session, filter: &FilterArgs, json: bool) -> Result<()> {
    let report = with_selection(session, filter, |sel, _| reports::monthly(sel))?;
    if json {
        return print_json(&report);
    }
    print_monthly(&report);
    Ok(())
}

fn print_monthly(report: &MonthlyReport) {
    println!();
    println!("📆 Transaksi Bulanan");
    println!("   ─────────────────────────────────────────────────────────────");

    if report.months.is_empty() {
        println!("   No donations found for this selection.");
        return;
    }

    println!(
        "   {:15} │ {:>16} │ {:>5} │ {:>6} │ {:>14} │ {:>8}",
        "Month", "Total", "Count", "Donors", "Per donor", "MoM"
    );
    println!("   ────────────────┼──────────────────┼───────┼────────┼────────────────┼─────────");
    for m in &report.months {
        let mom = m
            .mom_growth
            .map(|g| format!("{:+.1}%", g))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:15} │ {:>16} │ {:>5} │ {:>6} │ {:>14} │ {:>8}",
            m.label(),
            rp(m.total as f64),
            m.count,
            m.unique_donors,
            rp(m.per_donor),
            mom
        );
    }

    println!();
    if let (Some(best), Some(worst)) = (&report.best, &report.worst) {
        println!("   🏆 Best month:  {} ({})", best.label(), rp(best.total as f64));
        println!("   📉 Worst month: {} ({})", worst.label(), rp(worst.total as f64));
        let level = performance_level(best.total as f64, report.average_monthly);
        println!(
            "   {} Best month vs average: {}",
            level_icon(level),
            level.label()
        );
    }
    println!("   📊 Monthly average: {}", rp(report.average_monthly));

    println!();
    println!("   Seasons:");
    for s in &report.seasons {
        println!("     {:20} {:>16}", s.season, rp(s.total as f64));
    }
    if let Some((season, share)) = report.peak_season() {
        println!("   🎯 Peak season: {} ({:.1}% of donations)", season, share);
    }
}

pub fn cmd_report_campaigns(
    session: &mut Session,
    filter: &FilterArgs,
    top: usize,
    json: bool,
) -> Result<()> {
    let report = with_selection(session, filter, |sel, _| reports::campaigns(sel))?;
    if json {
        return print_json(&report);
    }
    print_campaigns(&report, top);
    Ok(())
}

fn print_campaigns(report: &CampaignReport, top: usize) {
    println!();
    println!("📈 Tren Campaign");
    println!("   ─────────────────────────────────────────────────────────────");

    if report.campaigns.is_empty() {
        println!("   No campaigns found for this selection.");
        return;
    }

    println!(
        "   {:24} │ {:>16} │ {:>5} │ {:>6} │ {:>5} │ {:>14} │ {:>6} │ {:13}",
        "Campaign", "Total", "Count", "Donors", "Days", "Per day", "Conv.", "Band"
    );
    println!("   ─────────────────────────┼──────────────────┼───────┼────────┼───────┼────────────────┼────────┼──────────────");
    for c in report.campaigns.iter().take(top) {
        println!(
            "   {:24} │ {:>16} │ {:>5} │ {:>6} │ {:>5} │ {:>14} │ {:>5.1}% │ {:13}",
            truncate(&c.campaign, 24),
            rp(c.total as f64),
            c.count,
            c.unique_donors,
            c.duration_days,
            rp(c.per_day),
            c.conversion_rate,
            c.band.as_str()
        );
    }
    if report.campaigns.len() > top {
        println!("   ... and {} more", report.campaigns.len() - top);
    }

    println!();
    println!(
        "   📊 Campaigns: {}   Average per campaign: {}   Above average: {}",
        report.campaigns.len(),
        rp(report.average_per_campaign),
        report.above_average
    );
    if let Some(name) = &report.most_efficient {
        println!("   ⚡ Most efficient: {}", name);
    }
    if let Some(name) = &report.longest_running {
        println!("   ⏳ Longest running: {}", name);
    }

    if !report.problematic.is_empty() {
        println!();
        println!(
            "   🚨 {} campaign(s) need review:",
            report.problematic.len()
        );
        for name in report.problematic.iter().take(5) {
            println!("      - {}", name);
        }
    }
}

pub fn cmd_report_all(session: &mut Session, filter: &FilterArgs, top: usize) -> Result<()> {
    let (summary, donors, trend, weekdays, monthly, campaigns) =
        with_selection(session, filter, |sel, s| {
            (
                reports::summary(sel, &s.config().cleaning),
                reports::donors(sel),
                reports::trend(sel),
                reports::weekdays(sel),
                reports::monthly(sel),
                reports::campaigns(sel),
            )
        })?;

    print_summary(&summary);
    print_donors(&donors, top);
    print_trend(&trend);
    print_weekdays(&weekdays);
    print_monthly(&monthly);
    print_campaigns(&campaigns, top);
    Ok(())
}
