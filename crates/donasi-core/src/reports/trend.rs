//! Overall transaction trend: daily totals with moving averages

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{DailyPoint, Donation, TrendReport};

use super::stats::{first_max_by, first_min_by, growth_rate, mean, rolling_mean, std_dev};

/// Days compared by the recent-vs-previous trend
const TREND_WINDOW: usize = 30;

pub fn trend(donations: &[&Donation]) -> TrendReport {
    let mut by_day: BTreeMap<NaiveDate, (u64, usize)> = BTreeMap::new();
    for d in donations {
        let entry = by_day.entry(d.date()).or_default();
        entry.0 = entry.0.saturating_add(d.amount);
        entry.1 += 1;
    }

    let totals: Vec<f64> = by_day.values().map(|(total, _)| *total as f64).collect();
    let ma_7 = rolling_mean(&totals, 7);
    let ma_30 = rolling_mean(&totals, 30);

    let days: Vec<DailyPoint> = by_day
        .into_iter()
        .enumerate()
        .map(|(i, (date, (total, count)))| DailyPoint {
            date,
            total,
            count,
            ma_7: ma_7[i],
            ma_30: ma_30[i],
        })
        .collect();

    let average_daily = mean(&totals);
    let volatility = if average_daily > 0.0 {
        std_dev(&totals) / average_daily * 100.0
    } else {
        0.0
    };

    let trend_change = if totals.len() >= TREND_WINDOW * 2 {
        let n = totals.len();
        let recent = mean(&totals[n - TREND_WINDOW..]);
        let previous = mean(&totals[n - TREND_WINDOW * 2..n - TREND_WINDOW]);
        Some(growth_rate(recent, previous))
    } else {
        None
    };

    TrendReport {
        best_day: first_max_by(&days, |p| p.total as f64).cloned(),
        worst_day: first_min_by(&days, |p| p.total as f64).cloned(),
        days,
        average_daily,
        volatility,
        trend_change,
    }
}
