//! Date ranges and aggregate counts for the statistics views.
//!
//! Counts always cover live and archived records together: archiving a word
//! does not un-add it.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, store::WordStore};

/// A half-open `[start, end)` interval of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: DateTime<Utc>,
  pub end:   DateTime<Utc>,
}

impl DateRange {
  pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
    if start >= end {
      return Err(Error::InvalidDateRange);
    }
    Ok(Self { start, end })
  }

  /// The whole calendar days `first..=last`.
  pub fn days(first: NaiveDate, last: NaiveDate) -> Result<Self> {
    let end = last
      .checked_add_days(Days::new(1))
      .ok_or(Error::InvalidDateRange)?;
    Self::new(midnight(first), midnight(end))
  }

  pub fn contains(&self, at: DateTime<Utc>) -> bool { self.start <= at && at < self.end }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> { date.and_time(NaiveTime::MIN).and_utc() }

/// Number of records added on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
  pub date:  NaiveDate,
  pub count: u64,
}

/// Expand sparse `(date, count)` rows into one entry per day of
/// `first..=last`, in date order. Rows for the same day add up.
pub fn zero_fill(first: NaiveDate, last: NaiveDate, rows: &[(NaiveDate, u64)]) -> Vec<DailyCount> {
  let mut by_day: HashMap<NaiveDate, u64> = HashMap::with_capacity(rows.len());
  for (date, count) in rows {
    *by_day.entry(*date).or_default() += count;
  }
  first
    .iter_days()
    .take_while(|d| *d <= last)
    .map(|date| DailyCount { date, count: by_day.get(&date).copied().unwrap_or(0) })
    .collect()
}

/// Row counts of the live and archive tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
  pub live:     u64,
  pub archived: u64,
}

// ─── Calendar ranges ─────────────────────────────────────────────────────────

pub mod calendar {
  use super::*;

  pub fn day(date: NaiveDate) -> Result<DateRange> { DateRange::days(date, date) }

  /// The `n` days ending with (and including) `today`.
  pub fn trailing_days(today: NaiveDate, n: u64) -> Result<DateRange> {
    let first = today
      .checked_sub_days(Days::new(n.saturating_sub(1)))
      .ok_or(Error::InvalidDateRange)?;
    DateRange::days(first, today)
  }

  /// The calendar month before the one containing `today`.
  pub fn previous_month(today: NaiveDate) -> Result<DateRange> {
    let this_month = today.with_day(1).ok_or(Error::InvalidDateRange)?;
    let previous = this_month
      .checked_sub_months(Months::new(1))
      .ok_or(Error::InvalidDateRange)?;
    DateRange::new(midnight(previous), midnight(this_month))
  }

  /// The calendar year containing `today`.
  pub fn year(today: NaiveDate) -> Result<DateRange> {
    let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).ok_or(Error::InvalidDateRange)?;
    let next = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).ok_or(Error::InvalidDateRange)?;
    DateRange::new(midnight(first), midnight(next))
  }
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// The dashboard figures, relative to one reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  pub today:          u64,
  pub last_7_days:    u64,
  pub previous_month: u64,
  pub this_year:      u64,
  pub live:           u64,
  pub archived:       u64,
}

/// Gather a [`Summary`] for `today` from `store`.
pub async fn summary<S: WordStore>(store: &S, today: NaiveDate) -> Result<Summary, S::Error> {
  let totals = store.totals().await?;
  Ok(Summary {
    today:          store.count_added(calendar::day(today)?).await?,
    last_7_days:    store.count_added(calendar::trailing_days(today, 7)?).await?,
    previous_month: store.count_added(calendar::previous_month(today)?).await?,
    this_year:      store.count_added(calendar::year(today)?).await?,
    live:           totals.live,
    archived:       totals.archived,
  })
}
