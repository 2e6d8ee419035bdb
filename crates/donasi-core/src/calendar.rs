//! Indonesian calendar names
//!
//! Month and weekday names are fixed lookup tables so parsing and labelling
//! never depend on the system locale.

use chrono::Weekday;
use serde::Serialize;

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Month number (1-12) for an Indonesian month name, exact match
pub fn month_number(token: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|name| *name == token)
        .map(|idx| idx as u32 + 1)
}

/// Indonesian month name for a month number (1-12)
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = month.checked_sub(1)? as usize;
    MONTHS.get(idx).copied()
}

/// English weekday name, as stored in the canonical `hari` column
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Indonesian weekday name used in reports
pub fn weekday_name_id(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Fundraising season of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    #[serde(rename = "Akhir Tahun")]
    YearEnd,
    #[serde(rename = "Awal Tahun")]
    EarlyYear,
    #[serde(rename = "Pertengahan Tahun")]
    MidYear,
    #[serde(rename = "Menuju Akhir Tahun")]
    LateYear,
}

impl Season {
    pub fn of_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::YearEnd,
            3..=5 => Self::EarlyYear,
            6..=8 => Self::MidYear,
            _ => Self::LateYear,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YearEnd => "Akhir Tahun",
            Self::EarlyYear => "Awal Tahun",
            Self::MidYear => "Pertengahan Tahun",
            Self::LateYear => "Menuju Akhir Tahun",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
