//! Monthly performance and seasonality

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::calendar::{month_name, Season};
use crate::models::{Donation, MonthStats, MonthlyReport, SeasonTotal};

use super::stats::{first_max_by, first_min_by, growth_rate, mean, total};

pub fn monthly(donations: &[&Donation]) -> MonthlyReport {
    let mut groups: BTreeMap<(i32, u32), Vec<&Donation>> = BTreeMap::new();
    for d in donations {
        groups.entry((d.year(), d.month())).or_default().push(*d);
    }

    let mut months: Vec<MonthStats> = Vec::with_capacity(groups.len());
    for ((year, month), group) in groups {
        let amounts: Vec<f64> = group.iter().map(|d| d.amount as f64).collect();
        let total = total(group.iter().map(|d| d.amount));
        let unique_donors = group
            .iter()
            .map(|d| d.donor.as_str())
            .collect::<HashSet<_>>()
            .len();
        let active_campaigns = group
            .iter()
            .map(|d| d.campaign.as_str())
            .collect::<HashSet<_>>()
            .len();
        let per = |n: usize| if n > 0 { total as f64 / n as f64 } else { 0.0 };

        let mom_growth = months
            .last()
            .map(|prev: &MonthStats| growth_rate(total as f64, prev.total as f64));

        months.push(MonthStats {
            year,
            month,
            month_name: month_name(month).unwrap_or_default(),
            total,
            mean: mean(&amounts),
            count: group.len(),
            unique_donors,
            active_campaigns,
            per_donor: per(unique_donors),
            per_campaign: per(active_campaigns),
            season: Season::of_month(month),
            mom_growth,
        });
    }

    let mut season_totals: HashMap<Season, u64> = HashMap::new();
    for m in &months {
        let entry = season_totals.entry(m.season).or_default();
        *entry = entry.saturating_add(m.total);
    }
    let mut seasons: Vec<SeasonTotal> = season_totals
        .into_iter()
        .map(|(season, total)| SeasonTotal { season, total })
        .collect();
    // Highest first; ties in calendar order of the season's first month
    seasons.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| season_rank(a.season).cmp(&season_rank(b.season)))
    });

    let totals: Vec<f64> = months.iter().map(|m| m.total as f64).collect();

    MonthlyReport {
        best: first_max_by(&months, |m| m.total as f64).cloned(),
        worst: first_min_by(&months, |m| m.total as f64).cloned(),
        average_monthly: mean(&totals),
        months,
        seasons,
    }
}

fn season_rank(season: Season) -> u8 {
    match season {
        Season::EarlyYear => 0,
        Season::MidYear => 1,
        Season::LateYear => 2,
        Season::YearEnd => 3,
    }
}

impl MonthlyReport {
    /// Season with the highest total and its share of all donations, in %
    pub fn peak_season(&self) -> Option<(Season, f64)> {
        let first = self.seasons.first()?;
        let all = total(self.seasons.iter().map(|s| s.total));
        Some((
            first.season,
            super::stats::percentage(first.total as f64, all as f64),
        ))
    }

    /// Month with the most distinct donors
    pub fn most_active(&self) -> Option<&MonthStats> {
        first_max_by(&self.months, |m| m.unique_donors as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use crate::reports::tests::donation;

    fn sample() -> Vec<Donation> {
        vec![
            donation("2023-12-16 10:30", "Zakat", "A", 100_000, PaymentMethod::Qris, "Berhasil"),
            donation("2023-12-20 10:30", "Wakaf", "B", 50_000, PaymentMethod::Qris, "Berhasil"),
            donation("2024-01-05 10:30", "Zakat", "A", 75_000, PaymentMethod::Manual, "Berhasil"),
            donation("2024-03-01 10:30", "Zakat", "C", 300_000, PaymentMethod::Qris, "Berhasil"),
            donation("2024-12-01 10:30", "Zakat", "C", 30_000, PaymentMethod::Qris, "Berhasil"),
        ]
    }

    #[test]
    fn test_months_are_chronological_per_year() {
        let data = sample();
        let refs: Vec<&Donation> = data.iter().collect();
        let report = monthly(&refs);

        let labels: Vec<String> = report.months.iter().map(MonthStats::label).collect();
        assert_eq!(
            labels,
            vec!["Desember 2023", "Januari 2024", "Maret 2024", "Desember 2024"]
        );

        let dec = &report.months[0];
        assert_eq!(dec.total, 150_000);
        assert_eq!(dec.count, 2);
        assert_eq!(dec.unique_donors, 2);
        assert_eq!(dec.active_campaigns, 2);
        assert_eq!(dec.per_donor, 75_000.0);
        assert_eq!(dec.season, Season::YearEnd);
        assert!(dec.mom_growth.is_none());
    }

    #[test]
    fn test_month_over_month_growth() {
        let data = sample();
        let refs: Vec<&Donation> = data.iter().collect();
        let report = monthly(&refs);

        assert_eq!(report.months[1].mom_growth, Some(-50.0));
        assert_eq!(report.months[2].mom_growth, Some(300.0));
        assert_eq!(report.months[3].mom_growth, Some(-90.0));
    }

    #[test]
    fn test_best_worst_and_seasons() {
        let data = sample();
        let refs: Vec<&Donation> = data.iter().collect();
        let report = monthly(&refs);

        assert_eq!(report.best.as_ref().unwrap().label(), "Maret 2024");
        assert_eq!(report.worst.as_ref().unwrap().label(), "Desember 2024");
        assert_eq!(report.average_monthly, 138_750.0);

        // Year end: 150k + 75k + 30k; early year: 300k
        assert_eq!(report.seasons[0].season, Season::EarlyYear);
        assert_eq!(report.seasons[0].total, 300_000);
        assert_eq!(report.seasons[1].season, Season::YearEnd);
        assert_eq!(report.seasons[1].total, 255_000);

        let (peak, share) = report.peak_season().unwrap();
        assert_eq!(peak, Season::EarlyYear);
        assert!((share - 300_000.0 / 5_550.0).abs() < 1e-9);
        assert_eq!(report.most_active().unwrap().label(), "Desember 2023");
    }
}
