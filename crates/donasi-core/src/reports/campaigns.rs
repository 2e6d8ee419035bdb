//! Campaign performance, efficiency and review flags

use std::collections::{HashMap, HashSet};

use crate::models::{CampaignReport, CampaignStats, Donation, PerformanceBand};

use super::stats::{first_max_by, mean, quantile, total};

/// Number of equal-width performance bands
const BANDS: usize = 5;
/// Campaigns below this fraction of the average total are flagged
const LOW_TOTAL_FACTOR: f64 = 0.5;
/// Campaigns converting fewer donors than this % are flagged
const MIN_CONVERSION: f64 = 50.0;

pub fn campaigns(donations: &[&Donation]) -> CampaignReport {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&Donation>> = HashMap::new();
    for d in donations {
        groups
            .entry(d.campaign.as_str())
            .or_insert_with(|| {
                order.push(d.campaign.as_str());
                Vec::new()
            })
            .push(*d);
    }

    let mut stats: Vec<CampaignStats> = Vec::with_capacity(order.len());
    for name in &order {
        let group = &groups[name];
        // Groups are never empty
        let (Some(first), Some(last)) = (
            group.iter().map(|d| d.timestamp).min(),
            group.iter().map(|d| d.timestamp).max(),
        ) else {
            continue;
        };

        let amounts: Vec<f64> = group.iter().map(|d| d.amount as f64).collect();
        let total = total(group.iter().map(|d| d.amount));
        let count = group.len();
        let unique_donors = group
            .iter()
            .map(|d| d.donor.as_str())
            .collect::<HashSet<_>>()
            .len();
        let duration_days = (last - first).num_days() + 1;

        stats.push(CampaignStats {
            campaign: name.to_string(),
            total,
            mean: mean(&amounts),
            count,
            unique_donors,
            first_donation: first,
            last_donation: last,
            duration_days,
            per_day: total as f64 / duration_days as f64,
            conversion_rate: unique_donors as f64 / count as f64 * 100.0,
            repeat_rate: (count - unique_donors) as f64 / unique_donors as f64 * 100.0,
            band: PerformanceBand::VeryLow,
        });
    }

    let totals: Vec<f64> = stats.iter().map(|c| c.total as f64).collect();
    for (c, band) in stats.iter_mut().zip(bands(&totals)) {
        c.band = band;
    }
    stats.sort_by(|a, b| b.total.cmp(&a.total));

    let average_per_campaign = mean(&totals);
    let per_day: Vec<f64> = stats.iter().map(|c| c.per_day).collect();
    let per_day_q25 = quantile(&per_day, 0.25);

    let problematic = stats
        .iter()
        .filter(|c| {
            (c.total as f64) < average_per_campaign * LOW_TOTAL_FACTOR
                || c.conversion_rate < MIN_CONVERSION
                || c.per_day < per_day_q25
        })
        .map(|c| c.campaign.clone())
        .collect();

    CampaignReport {
        most_efficient: first_max_by(&stats, |c| c.per_day).map(|c| c.campaign.clone()),
        longest_running: first_max_by(&stats, |c| c.duration_days as f64)
            .map(|c| c.campaign.clone()),
        above_average: stats
            .iter()
            .filter(|c| c.total as f64 > average_per_campaign)
            .count(),
        average_per_campaign,
        campaigns: stats,
        problematic,
    }
}

/// Assign each value to one of five equal-width bins over [min, max].
///
/// Bins are closed on the right; the minimum falls in the first bin. When
/// all values are equal every value lands in the middle band.
fn bands(values: &[f64]) -> Vec<PerformanceBand> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / BANDS as f64;

    values
        .iter()
        .map(|v| {
            if width <= 0.0 {
                return PerformanceBand::from_bin(BANDS / 2);
            }
            let bin = ((v - min) / width).ceil() as usize;
            PerformanceBand::from_bin(bin.saturating_sub(1).min(BANDS - 1))
        })
        .collect()
}
