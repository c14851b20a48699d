//! Date-window bucketing and per-day reduction.
//!
//! # Responsibility
//! - Group dated records into one bucket per calendar day.
//! - Reduce buckets to scalars for charts and summaries.
//!
//! # Invariants
//! - A window over `start..=end` has exactly `end - start + 1` buckets,
//!   strictly ascending, with no day omitted.
//! - Empty buckets reduce to `0.0`, never to a missing value.

use chrono::{Days, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Window construction failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

impl Display for WindowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvertedRange { start, end } => {
                write!(f, "window start {start} is after end {end}")
            }
        }
    }
}

impl Error for WindowError {}

/// Records that fell on one calendar day, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket<R> {
    pub date: NaiveDate,
    pub records: Vec<R>,
}

impl<R> DayBucket<R> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One point of a chart series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Per-bucket reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum,
    Mean,
    Count,
}

/// Builds the zero-filled window `start..=end` from `(day, record)` pairs.
///
/// Records outside the window are dropped.
pub fn build_window<R>(
    entries: impl IntoIterator<Item = (NaiveDate, R)>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DayBucket<R>>, WindowError> {
    if start > end {
        return Err(WindowError::InvertedRange { start, end });
    }

    let span = (end - start).num_days();
    let mut buckets: Vec<DayBucket<R>> = (0..=span)
        .filter_map(|offset| u64::try_from(offset).ok())
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .map(|date| DayBucket {
            date,
            records: Vec::new(),
        })
        .collect();

    for (day, record) in entries {
        if day < start || day > end {
            continue;
        }
        let Ok(slot) = usize::try_from((day - start).num_days()) else {
            continue;
        };
        if let Some(bucket) = buckets.get_mut(slot) {
            bucket.records.push(record);
        }
    }

    Ok(buckets)
}

/// Reduces one bucket. Records for which `value_of` yields `None` are
/// skipped by `Sum` and `Mean` but still counted by `Count`.
pub fn aggregate<R>(
    bucket: &DayBucket<R>,
    reducer: Reducer,
    value_of: impl Fn(&R) -> Option<f64>,
) -> f64 {
    match reducer {
        Reducer::Count => bucket.records.len() as f64,
        Reducer::Sum => bucket
            .records
            .iter()
            .filter_map(&value_of)
            .fold(0.0, |total, value| total + value),
        Reducer::Mean => {
            let values: Vec<f64> = bucket.records.iter().filter_map(&value_of).collect();
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        }
    }
}

/// Chart series: one point per day, empty days included as `0.0`.
pub fn daily_series<R>(
    buckets: &[DayBucket<R>],
    reducer: Reducer,
    value_of: impl Fn(&R) -> Option<f64>,
) -> Vec<DailyPoint> {
    buckets
        .iter()
        .map(|bucket| DailyPoint {
            date: bucket.date,
            value: aggregate(bucket, reducer, &value_of),
        })
        .collect()
}

/// Mean of per-day values over days that have records only.
///
/// Returns `None` when no day in the window has data.
pub fn average_over_recorded_days<R>(
    buckets: &[DayBucket<R>],
    reducer: Reducer,
    value_of: impl Fn(&R) -> Option<f64>,
) -> Option<f64> {
    let recorded: Vec<f64> = buckets
        .iter()
        .filter(|bucket| !bucket.is_empty())
        .map(|bucket| aggregate(bucket, reducer, &value_of))
        .collect();
    if recorded.is_empty() {
        return None;
    }
    Some(recorded.iter().sum::<f64>() / recorded.len() as f64)
}

/// Pearson correlation of two equal-length series.
///
/// Returns `0.0` for fewer than two points, mismatched lengths or zero
/// variance in either series.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return 0.0;
    }

    let len = n as f64;
    let mean_x = xs.iter().sum::<f64>() / len;
    let mean_y = ys.iter().sum::<f64>() / len;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    let denominator = (variance_x * variance_y).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        covariance / denominator
    }
}
