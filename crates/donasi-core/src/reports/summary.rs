//! Main summary: headline metrics and payment method analysis

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{
    Donation, FavouriteMethodShare, MethodShare, MethodSuccessRate, MethodValueStats,
    PaymentMethod, StatusMethodCount, SummaryReport,
};
use crate::schema::CleaningRules;

use super::stats::{mean, percentage, total};
use super::{favourite_method, period_of};

pub fn summary(donations: &[&Donation], rules: &CleaningRules) -> SummaryReport {
    let total_amount = total(donations.iter().map(|d| d.amount));
    let transaction_count = donations.len();
    let unique_donors = donations
        .iter()
        .map(|d| d.donor.as_str())
        .collect::<HashSet<_>>()
        .len();
    let active_campaigns = donations
        .iter()
        .map(|d| d.campaign.as_str())
        .collect::<HashSet<_>>()
        .len();

    let is_success = |d: &&&Donation| d.status == rules.success_status;
    let is_pending = |d: &&&Donation| d.status == rules.pending_status;
    let success_count = donations.iter().filter(is_success).count();
    let success_total = total(donations.iter().filter(is_success).map(|d| d.amount));
    let pending_total = total(donations.iter().filter(is_pending).map(|d| d.amount));

    let ratio = |a: f64, b: usize| if b > 0 { a / b as f64 } else { 0.0 };

    // Per (method, status) counts, keys sorted
    let mut by_pair: BTreeMap<(PaymentMethod, &str), usize> = BTreeMap::new();
    for d in donations {
        *by_pair.entry((d.method, d.status.as_str())).or_default() += 1;
    }
    let status_by_method = by_pair
        .into_iter()
        .map(|((method, status), count)| StatusMethodCount {
            method,
            status: status.to_string(),
            count,
        })
        .collect();

    // Per-method groups in method order
    let mut by_method: BTreeMap<PaymentMethod, Vec<&Donation>> = BTreeMap::new();
    for d in donations {
        by_method.entry(d.method).or_default().push(*d);
    }

    let success_by_method = by_method
        .iter()
        .map(|(method, group)| MethodSuccessRate {
            method: *method,
            success_rate: percentage(
                group
                    .iter()
                    .filter(|d| d.status == rules.success_status)
                    .count() as f64,
                group.len() as f64,
            ),
        })
        .collect();

    let method_values = by_method
        .iter()
        .map(|(method, group)| {
            let amounts: Vec<f64> = group.iter().map(|d| d.amount as f64).collect();
            MethodValueStats {
                method: *method,
                total: total(group.iter().map(|d| d.amount)),
                mean: mean(&amounts),
                count: group.len(),
            }
        })
        .collect();

    let mut method_popularity: Vec<MethodShare> = by_method
        .iter()
        .map(|(method, group)| MethodShare {
            method: *method,
            transaction_count: group.len(),
            percentage: percentage(group.len() as f64, transaction_count as f64),
        })
        .collect();
    method_popularity.sort_by(|a, b| b.transaction_count.cmp(&a.transaction_count));

    // Donor method preference
    let mut donor_methods: HashMap<&str, Vec<PaymentMethod>> = HashMap::new();
    for d in donations {
        donor_methods.entry(d.donor.as_str()).or_default().push(d.method);
    }

    let mut favourite_counts: BTreeMap<PaymentMethod, usize> = BTreeMap::new();
    let mut single_method_donors = 0;
    let mut multi_method_donors = 0;
    for methods in donor_methods.values() {
        if let Some(fav) = favourite_method(methods.iter().copied()) {
            *favourite_counts.entry(fav).or_default() += 1;
        }
        let distinct: HashSet<&PaymentMethod> = methods.iter().collect();
        if distinct.len() > 1 {
            multi_method_donors += 1;
        } else {
            single_method_donors += 1;
        }
    }

    let mut favourite_methods: Vec<FavouriteMethodShare> = favourite_counts
        .into_iter()
        .map(|(method, donor_count)| FavouriteMethodShare {
            method,
            donor_count,
            percentage: percentage(donor_count as f64, unique_donors as f64),
        })
        .collect();
    favourite_methods.sort_by(|a, b| b.donor_count.cmp(&a.donor_count));

    SummaryReport {
        period: period_of(donations),
        total_amount,
        transaction_count,
        unique_donors,
        active_campaigns,
        avg_per_transaction: ratio(total_amount as f64, transaction_count),
        loyalty_ratio: ratio(transaction_count as f64, unique_donors),
        success_rate: percentage(success_count as f64, transaction_count as f64),
        avg_per_campaign: ratio(total_amount as f64, active_campaigns),
        success_total,
        pending_total,
        status_by_method,
        success_by_method,
        method_popularity,
        method_values,
        favourite_methods,
        single_method_donors,
        multi_method_donors,
        method_loyalty_rate: percentage(
            single_method_donors as f64,
            (single_method_donors + multi_method_donors) as f64,
        ),
    }
}

impl SummaryReport {
    /// Method with the highest success rate
    pub fn best_method(&self) -> Option<&MethodSuccessRate> {
        super::stats::first_max_by(&self.success_by_method, |m| m.success_rate)
    }

    /// Method with the lowest success rate
    pub fn worst_method(&self) -> Option<&MethodSuccessRate> {
        super::stats::first_min_by(&self.success_by_method, |m| m.success_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::tests::donation;

    #[test]
    fn test_headline_metrics() {
        let data = vec![
            donation("2024-01-01 10:00", "Zakat", "Budi", 50_000, PaymentMethod::Qris, "Berhasil"),
            donation("2024-01-02 10:00", "Zakat", "Budi", 30_000, PaymentMethod::Manual, "Pending"),
            donation("2024-01-03 10:00", "Wakaf", "Sari", 20_000, PaymentMethod::Qris, "Berhasil"),
            donation("2024-01-04 10:00", "Wakaf", "Rina", 100_000, PaymentMethod::Qris, "Pending"),
        ];
        let refs: Vec<&Donation> = data.iter().collect();
        let report = summary(&refs, &CleaningRules::default());

        assert_eq!(report.total_amount, 200_000);
        assert_eq!(report.transaction_count, 4);
        assert_eq!(report.unique_donors, 3);
        assert_eq!(report.active_campaigns, 2);
        assert_eq!(report.avg_per_transaction, 50_000.0);
        assert!((report.loyalty_ratio - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.success_rate, 50.0);
        assert_eq!(report.avg_per_campaign, 100_000.0);
        assert_eq!(report.success_total, 70_000);
        assert_eq!(report.pending_total, 130_000);

        let period = report.period.unwrap();
        assert_eq!(period.from, "2024-01-01");
        assert_eq!(period.to, "2024-01-04");
    }

    #[test]
    fn test_method_breakdown() {
        let data = vec![
            donation("2024-01-01 10:00", "Zakat", "Budi", 50_000, PaymentMethod::Qris, "Berhasil"),
            donation("2024-01-02 10:00", "Zakat", "Budi", 30_000, PaymentMethod::Manual, "Pending"),
            donation("2024-01-03 10:00", "Wakaf", "Sari", 20_000, PaymentMethod::Qris, "Berhasil"),
            donation("2024-01-04 10:00", "Wakaf", "Rina", 100_000, PaymentMethod::Qris, "Pending"),
        ];
        let refs: Vec<&Donation> = data.iter().collect();
        let report = summary(&refs, &CleaningRules::default());

        assert_eq!(report.status_by_method.len(), 3);
        assert_eq!(report.status_by_method[0].method, PaymentMethod::Qris);
        assert_eq!(report.status_by_method[0].status, "Berhasil");
        assert_eq!(report.status_by_method[0].count, 2);

        let qris_rate = &report.success_by_method[0];
        assert_eq!(qris_rate.method, PaymentMethod::Qris);
        assert!((qris_rate.success_rate - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.best_method().unwrap().method, PaymentMethod::Qris);
        assert_eq!(report.worst_method().unwrap().method, PaymentMethod::Manual);

        assert_eq!(report.method_popularity[0].method, PaymentMethod::Qris);
        assert_eq!(report.method_popularity[0].transaction_count, 3);
        assert_eq!(report.method_popularity[0].percentage, 75.0);

        let manual_values = &report.method_values[1];
        assert_eq!(manual_values.method, PaymentMethod::Manual);
        assert_eq!(manual_values.total, 30_000);
        assert_eq!(manual_values.count, 1);
    }

    #[test]
    fn test_donor_method_loyalty() {
        let data = vec![
            donation("2024-01-01 10:00", "Zakat", "Budi", 1_000, PaymentMethod::Qris, "Berhasil"),
            donation("2024-01-02 10:00", "Zakat", "Budi", 1_000, PaymentMethod::Qris, "Berhasil"),
            donation("2024-01-03 10:00", "Zakat", "Budi", 1_000, PaymentMethod::Manual, "Berhasil"),
            donation("2024-01-04 10:00", "Zakat", "Sari", 1_000, PaymentMethod::Manual, "Berhasil"),
            donation("2024-01-05 10:00", "Zakat", "Rina", 1_000, PaymentMethod::Manual, "Berhasil"),
        ];
        let refs: Vec<&Donation> = data.iter().collect();
        let report = summary(&refs, &CleaningRules::default());

        assert_eq!(report.single_method_donors, 2);
        assert_eq!(report.multi_method_donors, 1);
        assert!((report.method_loyalty_rate - 200.0 / 3.0).abs() < 1e-9);

        // Budi favours QRIS; Sari and Rina favour Manual
        assert_eq!(report.favourite_methods[0].method, PaymentMethod::Manual);
        assert_eq!(report.favourite_methods[0].donor_count, 2);
        assert_eq!(report.favourite_methods[1].method, PaymentMethod::Qris);
        assert_eq!(report.favourite_methods[1].donor_count, 1);
    }

    #[test]
    fn test_empty_selection() {
        let report = summary(&[], &CleaningRules::default());
        assert_eq!(report.total_amount, 0);
        assert_eq!(report.avg_per_transaction, 0.0);
        assert_eq!(report.loyalty_ratio, 0.0);
        assert_eq!(report.success_rate, 0.0);
        assert!(report.period.is_none());
        assert!(report.best_method().is_none());
    }

    #[test]
    fn test_totals_saturate_on_huge_amounts() {
        let data = vec![
            donation("2024-01-01 10:00", "Zakat", "Budi", u64::MAX, PaymentMethod::Qris, "Berhasil"),
            donation("2024-01-01 11:00", "Zakat", "Sari", 10_000, PaymentMethod::Qris, "Berhasil"),
            donation("2024-01-02 11:00", "Wakaf", "Sari", 10_000, PaymentMethod::Manual, "Pending"),
        ];
        let refs: Vec<&Donation> = data.iter().collect();
        let report = summary(&refs, &CleaningRules::default());

        assert_eq!(report.total_amount, u64::MAX);
        assert_eq!(report.success_total, u64::MAX);
        assert_eq!(report.pending_total, 10_000);

        // Every other report aggregates the same amounts
        assert_eq!(crate::reports::donors(&refs).donors[0].total, u64::MAX);
        assert_eq!(crate::reports::trend(&refs).days[0].total, u64::MAX);
        assert_eq!(crate::reports::weekdays(&refs).hours[0].total, u64::MAX);
        assert_eq!(crate::reports::monthly(&refs).months[0].total, u64::MAX);
        assert_eq!(crate::reports::campaigns(&refs).campaigns[0].total, u64::MAX);
    }
}
