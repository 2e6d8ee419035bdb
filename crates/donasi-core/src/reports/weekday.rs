//! Day-of-week and hour-of-day patterns

use std::collections::{BTreeMap, HashSet};

use chrono::Weekday;

use crate::calendar::{is_weekend, weekday_name_id};
use crate::models::{Donation, HourStats, WeekdayReport, WeekdayStats};

use super::stats::{first_max_by, first_min_by, growth_rate, mean, total};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekdays(donations: &[&Donation]) -> WeekdayReport {
    let weekdays: Vec<WeekdayStats> = WEEK
        .iter()
        .filter_map(|day| {
            let group: Vec<&Donation> = donations
                .iter()
                .copied()
                .filter(|d| d.weekday() == *day)
                .collect();
            if group.is_empty() {
                return None;
            }
            let amounts: Vec<f64> = group.iter().map(|d| d.amount as f64).collect();
            Some(WeekdayStats {
                weekday: weekday_name_id(*day),
                total: total(group.iter().map(|d| d.amount)),
                mean: mean(&amounts),
                count: group.len(),
                unique_donors: group
                    .iter()
                    .map(|d| d.donor.as_str())
                    .collect::<HashSet<_>>()
                    .len(),
                weekend: is_weekend(*day),
            })
        })
        .collect();

    let totals = |weekend: bool| -> Vec<f64> {
        weekdays
            .iter()
            .filter(|w| w.weekend == weekend)
            .map(|w| w.total as f64)
            .collect()
    };
    let (weekday_totals, weekend_totals) = (totals(false), totals(true));
    let weekday_average = mean(&weekday_totals);
    let weekend_average = mean(&weekend_totals);
    // No lift when either side of the week has no donations
    let weekend_lift = if weekday_totals.is_empty() || weekend_totals.is_empty() {
        0.0
    } else {
        growth_rate(weekend_average, weekday_average)
    };
    let all_totals: Vec<f64> = weekdays.iter().map(|w| w.total as f64).collect();

    let mut by_hour: BTreeMap<u32, (u64, usize)> = BTreeMap::new();
    for d in donations {
        let entry = by_hour.entry(d.hour()).or_default();
        entry.0 = entry.0.saturating_add(d.amount);
        entry.1 += 1;
    }
    let hours: Vec<HourStats> = by_hour
        .into_iter()
        .map(|(hour, (total, count))| HourStats { hour, total, count })
        .collect();

    WeekdayReport {
        best: first_max_by(&weekdays, |w| w.total as f64).cloned(),
        worst: first_min_by(&weekdays, |w| w.total as f64).cloned(),
        average: mean(&all_totals),
        weekday_average,
        weekend_average,
        weekend_lift,
        peak_hour: first_max_by(&hours, |h| h.total as f64).cloned(),
        quiet_hour: first_min_by(&hours, |h| h.total as f64).cloned(),
        weekdays,
        hours,
    }
}
