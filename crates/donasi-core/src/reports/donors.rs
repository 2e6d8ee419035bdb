//! Donor profiles: tiers, Pareto concentration and behaviour segments

use std::collections::HashMap;

use crate::models::{Donation, DonorReport, DonorStats, DonorTier, PaymentMethod, Quartiles};

use super::favourite_method;
use super::stats::{mean, quantile, total};

/// Pareto core: donors whose running share of the total stays within this %
const PARETO_SHARE: f64 = 80.0;

pub fn donors(donations: &[&Donation]) -> DonorReport {
    // Group in first-seen order so equal totals keep a stable order
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&Donation>> = HashMap::new();
    for d in donations {
        let entry = groups.entry(d.donor.as_str()).or_insert_with(|| {
            order.push(d.donor.as_str());
            Vec::new()
        });
        entry.push(*d);
    }

    let totals: Vec<f64> = order
        .iter()
        .map(|name| groups[name].iter().map(|d| d.amount as f64).sum())
        .collect();
    let quartiles = Quartiles {
        q25: quantile(&totals, 0.25),
        q50: quantile(&totals, 0.50),
        q75: quantile(&totals, 0.75),
    };

    let mut stats: Vec<DonorStats> = order
        .iter()
        .map(|name| {
            let group = &groups[name];
            let amounts: Vec<f64> = group.iter().map(|d| d.amount as f64).collect();
            let total = total(group.iter().map(|d| d.amount));
            DonorStats {
                donor: name.to_string(),
                total,
                mean: mean(&amounts),
                count: group.len(),
                favourite_method: favourite_method(group.iter().map(|d| d.method))
                    .unwrap_or(PaymentMethod::Qris),
                tier: tier_for(total as f64, &quartiles),
            }
        })
        .collect();
    stats.sort_by(|a, b| b.total.cmp(&a.total));

    let count_of = |tier: DonorTier| stats.iter().filter(|s| s.tier == tier).count();
    let (premium, gold, silver, bronze) = (
        count_of(DonorTier::Premium),
        count_of(DonorTier::Gold),
        count_of(DonorTier::Silver),
        count_of(DonorTier::Bronze),
    );

    // Pareto core contributors
    let grand_total = total(stats.iter().map(|s| s.total));
    let mut running = 0u64;
    let mut core_contributors = 0;
    if grand_total > 0 {
        for s in &stats {
            running = running.saturating_add(s.total);
            if running as f64 / grand_total as f64 * 100.0 <= PARETO_SHARE {
                core_contributors += 1;
            }
        }
    }
    let core_percentage = if stats.is_empty() {
        0.0
    } else {
        core_contributors as f64 / stats.len() as f64 * 100.0
    };

    // Frequency vs value segments
    let counts: Vec<f64> = stats.iter().map(|s| s.count as f64).collect();
    let count_q75 = quantile(&counts, 0.75);
    let count_q50 = quantile(&counts, 0.50);
    let frequent_small = stats
        .iter()
        .filter(|s| s.count as f64 >= count_q75 && s.total as f64 <= quartiles.q50)
        .count();
    let infrequent_large = stats
        .iter()
        .filter(|s| s.count as f64 <= count_q50 && s.total as f64 >= quartiles.q75)
        .count();

    DonorReport {
        donors: stats,
        quartiles,
        premium,
        gold,
        silver,
        bronze,
        core_contributors,
        core_percentage,
        frequent_small,
        infrequent_large,
    }
}

fn tier_for(total: f64, q: &Quartiles) -> DonorTier {
    if total >= q.q75 {
        DonorTier::Premium
    } else if total >= q.q50 {
        DonorTier::Gold
    } else if total >= q.q25 {
        DonorTier::Silver
    } else {
        DonorTier::Bronze
    }
}

impl DonorReport {
    /// Share of the selection's total given by one donor, in %
    pub fn contribution(&self, donor: &DonorStats) -> f64 {
        let total = total(self.donors.iter().map(|s| s.total));
        super::stats::percentage(donor.total as f64, total as f64)
    }
}
