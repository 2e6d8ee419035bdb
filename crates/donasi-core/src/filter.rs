//! Donation filter builder
//!
//! Selects the slice of the canonical table the reports work on. Unset
//! criteria match everything.

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::{Donation, PaymentMethod};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub methods: Vec<PaymentMethod>,
    pub statuses: Vec<String>,
}

impl DonationFilter {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set inclusive start date
    pub fn from(mut self, date: Option<NaiveDate>) -> Self {
        self.from = date;
        self
    }

    /// Set inclusive end date
    pub fn to(mut self, date: Option<NaiveDate>) -> Self {
        self.to = date;
        self
    }

    /// Set date range filter
    pub fn date_range(self, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        match range {
            Some((from, to)) => self.from(Some(from)).to(Some(to)),
            None => self.from(None).to(None),
        }
    }

    /// Restrict to these payment methods (empty means all)
    pub fn methods(mut self, methods: Vec<PaymentMethod>) -> Self {
        self.methods = methods;
        self
    }

    /// Restrict to these statuses, exact match (empty means all)
    pub fn statuses(mut self, statuses: Vec<String>) -> Self {
        self.statuses = statuses;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(Error::InvalidData(format!(
                    "start date {} is after end date {}",
                    from, to
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, donation: &Donation) -> bool {
        let date = donation.date();
        if self.from.is_some_and(|from| date < from) {
            return false;
        }
        if self.to.is_some_and(|to| date > to) {
            return false;
        }
        if !self.methods.is_empty() && !self.methods.contains(&donation.method) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.iter().any(|s| *s == donation.status) {
            return false;
        }
        true
    }

    /// Matching donations in table order
    pub fn apply<'a>(&self, donations: &'a [Donation]) -> Result<Vec<&'a Donation>> {
        self.validate()?;
        Ok(donations.iter().filter(|d| self.matches(d)).collect())
    }
}
