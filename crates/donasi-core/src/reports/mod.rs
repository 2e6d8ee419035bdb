//! Reports over a filtered selection of donations
//!
//! Every report is a pure function of `&[&Donation]` (usually the output of
//! [`DonationFilter::apply`](crate::filter::DonationFilter::apply)); nothing
//! here mutates the cleaned dataset.
//!
//! ## Reports
//!
//! - **Summary** - headline metrics and payment method analysis
//! - **Donors** - tiers, Pareto core and behaviour segments
//! - **Trend** - daily totals with 7/30 day moving averages
//! - **Weekdays** - day-of-week and hour-of-day patterns
//! - **Monthly** - per calendar month with seasonality
//! - **Campaigns** - efficiency, conversion and review flags
//!
//! ## Usage
//!
//! ```rust,ignore
//! use donasi_core::{reports, DonationFilter};
//!
//! let selection = DonationFilter::new().apply(dataset.donations())?;
//! let summary = reports::summary(&selection, &config.cleaning);
//! ```

pub mod campaigns;
pub mod donors;
pub mod monthly;
pub mod stats;
pub mod summary;
pub mod trend;
pub mod weekday;

use std::collections::BTreeMap;

pub use campaigns::campaigns;
pub use donors::donors;
pub use monthly::monthly;
pub use stats::{growth_rate, performance_level};
pub use summary::summary;
pub use trend::trend;
pub use weekday::weekdays;

use crate::models::{Donation, PaymentMethod, ReportPeriod};

/// Most used method; ties go to the method whose label sorts first
pub(crate) fn favourite_method<I>(methods: I) -> Option<PaymentMethod>
where
    I: IntoIterator<Item = PaymentMethod>,
{
    let mut counts: BTreeMap<PaymentMethod, usize> = BTreeMap::new();
    for m in methods {
        *counts.entry(m).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.as_str().cmp(a.as_str())))
        .map(|(method, _)| method)
}

/// First and last donation date of a selection
pub(crate) fn period_of(donations: &[&Donation]) -> Option<ReportPeriod> {
    let from = donations.iter().map(|d| d.date()).min()?;
    let to = donations.iter().map(|d| d.date()).max()?;
    Some(ReportPeriod {
        from: from.format("%Y-%m-%d").to_string(),
        to: to.format("%Y-%m-%d").to_string(),
    })
}
