//! Cleaning and merging of the two channel tables
//!
//! Turns the raw QRIS and manual tables into one canonical table:
//! 1. stamp each row with its channel and concatenate (QRIS first)
//! 2. parse the Indonesian date-time string
//! 3. strip the amount down to its digits
//! 4. drop zero amounts
//! 5. normalize donor names (anonymous donors collapse to one token)
//! 6. drop rows without a campaign (placeholder sentinel)
//! 7. normalize statuses
//!
//! Calendar fields and the final column set are derived from the resulting
//! [`Donation`] records (see [`crate::models::DonationRow`]).

use std::collections::HashSet;

use chrono::{Datelike, NaiveDateTime, Timelike};
use regex::Regex;
use tracing::{info, warn};

use crate::calendar;
use crate::error::{Error, Result};
use crate::models::{CleanStats, CleanedDataset, Donation, PaymentMethod, RawTable};
use crate::schema::{CleaningRules, SchemaConfig};

/// Parse `"16 Desember 2023 10:30"` into a timestamp.
///
/// Exactly four space-separated fields: day, Indonesian month name, year and
/// `HH:MM`. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let fields: Vec<&str> = raw.trim().split(' ').collect();
    let [day, month, year, time] = fields.as_slice() else {
        return None;
    };
    let month = calendar::month_number(month)?;
    let numeric = format!("{} {:02} {} {}", day, month, year, time);
    NaiveDateTime::parse_from_str(&numeric, "%d %m %Y %H:%M").ok()
}

/// Render a timestamp in the source format, the inverse of [`parse_timestamp`]
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    format!(
        "{:02} {} {} {:02}:{:02}",
        ts.day(),
        calendar::month_name(ts.month()).unwrap_or_default(),
        ts.year(),
        ts.hour(),
        ts.minute()
    )
}

/// Result of stripping an amount string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountCleaning {
    pub value: u64,
    /// Non-blank input that contained no digits at all
    pub malformed: bool,
    /// Digits beyond [`MAX_AMOUNT`]; `value` is saturated
    pub overflow: bool,
}

/// Largest amount the canonical table accepts (signed 64-bit range)
pub const MAX_AMOUNT: u64 = i64::MAX as u64;

/// Amount cleanup: keep only decimal digits, empty means zero.
///
/// Lossy: `"Rp1.234.567,-"` becomes `1234567` and a string with
/// no digits becomes `0` (and is later excluded). Digits are never
/// reinterpreted, so a decimal comma such as `"10.000,50"` yields `1000050`.
pub fn clean_amount(raw: &str) -> AmountCleaning {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return AmountCleaning {
            value: 0,
            malformed: !raw.trim().is_empty(),
            overflow: false,
        };
    }
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    AmountCleaning {
        value,
        malformed: false,
        overflow: value > MAX_AMOUNT,
    }
}

/// Title case: a letter after a non-letter is uppercased, others lowercased
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Compiled donor/status rules
pub struct Normalizer {
    rules: CleaningRules,
    anonymity: Option<Regex>,
}

impl Normalizer {
    pub fn new(rules: &CleaningRules) -> Result<Self> {
        let idioms: Vec<String> = rules
            .anonymity_idioms
            .iter()
            .map(|idiom| idiom.trim())
            .filter(|idiom| !idiom.is_empty())
            .map(regex::escape)
            .collect();

        let anonymity = if idioms.is_empty() {
            None
        } else {
            let pattern = format!("(?i)^(?:{})$", idioms.join("|"));
            Some(
                Regex::new(&pattern)
                    .map_err(|e| Error::Config(format!("Invalid anonymity idiom: {}", e)))?,
            )
        };

        Ok(Self {
            rules: rules.clone(),
            anonymity,
        })
    }

    pub fn rules(&self) -> &CleaningRules {
        &self.rules
    }

    /// Missing, blank or idiomatic anonymous names become the anonymity token;
    /// everything else is trimmed and title-cased.
    pub fn donor(&self, raw: Option<&str>) -> String {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return self.rules.anonymity_token.clone();
        }
        let titled = title_case(trimmed);
        match &self.anonymity {
            Some(re) if re.is_match(&titled) => self.rules.anonymity_token.clone(),
            _ => titled,
        }
    }

    /// Rewrite the legacy synonym, then trim and title-case
    pub fn status(&self, raw: &str) -> String {
        let rewritten = self
            .rules
            .status_synonyms
            .get(raw)
            .map(String::as_str)
            .unwrap_or(raw);
        title_case(rewritten.trim())
    }
}

/// Builds the canonical table from the two raw tables
pub struct Cleaner {
    normalizer: Normalizer,
}

impl Cleaner {
    pub fn new(config: &SchemaConfig) -> Result<Self> {
        Ok(Self {
            normalizer: Normalizer::new(&config.cleaning)?,
        })
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Run the full cleaning pass.
    ///
    /// Fails on the first unparseable date (QRIS rows are checked before
    /// manual rows), then on the first amount above [`MAX_AMOUNT`]; no
    /// partial table is returned.
    pub fn clean_and_merge(&self, qris: &RawTable, manual: &RawTable) -> Result<CleanedDataset> {
        let rules = self.normalizer.rules();
        let mut stats = CleanStats {
            qris_rows: qris.len(),
            manual_rows: manual.len(),
            ..Default::default()
        };

        // 1. tag and concatenate
        let tagged = [(PaymentMethod::Qris, qris), (PaymentMethod::Manual, manual)];
        for (channel, table) in &tagged {
            if table.channel != *channel {
                warn!(
                    "{} table passed as {} source; using {}",
                    table.channel, channel, channel
                );
            }
            warn_duplicate_sequences(*channel, table);
        }
        let working = tagged
            .into_iter()
            .flat_map(|(channel, table)| table.rows.iter().map(move |row| (channel, table, row)));

        // 2. parse every date before filtering anything
        let mut parsed = Vec::with_capacity(stats.rows_in());
        for (channel, table, row) in working {
            let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| Error::DateParse {
                channel,
                path: table.path.clone(),
                row: row.row,
                raw: row.timestamp.clone(),
            })?;
            parsed.push((channel, table, row, timestamp));
        }

        let mut donations = Vec::with_capacity(parsed.len());
        for (channel, table, row, timestamp) in parsed {
            // 3-4. amount
            let amount = clean_amount(&row.amount);
            if amount.overflow {
                return Err(Error::AmountOverflow {
                    channel,
                    path: table.path.clone(),
                    row: row.row,
                    raw: row.amount.clone(),
                });
            }
            if amount.value == 0 {
                stats.zero_amount += 1;
                if amount.malformed {
                    stats.malformed_amount += 1;
                }
                continue;
            }

            // 5. donor
            let donor = self.normalizer.donor(row.donor.as_deref());
            if donor == rules.anonymity_token {
                stats.anonymized += 1;
            }

            // 6. placeholder campaign
            if row.campaign == rules.placeholder_campaign {
                stats.placeholder_campaign += 1;
                continue;
            }

            // 7. status
            let status = self.normalizer.status(&row.status);

            donations.push(Donation {
                timestamp,
                campaign: row.campaign.clone(),
                donor,
                amount: amount.value,
                method: channel,
                status,
            });
        }

        stats.rows_out = donations.len();
        info!(
            rows_in = stats.rows_in(),
            rows_out = stats.rows_out,
            zero_amount = stats.zero_amount,
            malformed_amount = stats.malformed_amount,
            placeholder_campaign = stats.placeholder_campaign,
            "Cleaned donation tables"
        );
        if stats.malformed_amount > 0 {
            warn!(
                "{} row(s) had an amount with no digits and were dropped as zero",
                stats.malformed_amount
            );
        }

        Ok(CleanedDataset::new(donations, stats))
    }
}

/// Sequence numbers are only a sanity check; repeats are logged, not dropped
fn warn_duplicate_sequences(channel: PaymentMethod, table: &RawTable) {
    let mut seen = HashSet::new();
    for row in &table.rows {
        let seq = row.sequence.trim();
        if !seq.is_empty() && !seen.insert(seq) {
            warn!("{} row {}: duplicate sequence number {}", channel, row.row, seq);
        }
    }
}
