//! Calendar helpers shared by the cell conversions.

use chrono::NaiveDate;

/// 1970-01-01, the zero point the engine counts date cells from.
#[inline]
pub(crate) fn epoch_naive_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("the epoch is a valid calendar date")
}
