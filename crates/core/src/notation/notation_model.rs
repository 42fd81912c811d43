use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::constants::NOTATION_CYCLE_LENGTH;
use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notation {
    pub cycle: i64,
    pub day: i64,
    pub days_elapsed: i64,
}

impl Notation {
    /// Human-readable form, e.g. `Cycle 3, Day 4`.
    pub fn display_string(&self) -> String {
        format!("Cycle {}, Day {}", self.cycle, self.day)
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.cycle, self.day)
    }
}

/// Computes the notation of `target` relative to `epoch`.
///
/// Fails with [`Error::Validation`] when `target` precedes `epoch`.
pub fn notate(target: NaiveDate, epoch: NaiveDate) -> Result<Notation> {
    let delta = target.signed_duration_since(epoch).num_days();
    if delta < 0 {
        return Err(Error::Validation(format!(
            "Target date {} is before epoch {}",
            target, epoch
        )));
    }
    Ok(Notation {
        cycle: delta / NOTATION_CYCLE_LENGTH + 1,
        day: delta % NOTATION_CYCLE_LENGTH + 1,
        days_elapsed: delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 21).unwrap()
    }

    fn label(offset: u64) -> String {
        let target = epoch().checked_add_days(Days::new(offset)).unwrap();
        notate(target, epoch()).unwrap().to_string()
    }

    #[test]
    fn epoch_is_first_day_of_first_cycle() {
        assert_eq!(label(0), "1.1");
    }

    #[test]
    fn cycle_boundaries() {
        assert_eq!(label(8), "1.9");
        assert_eq!(label(9), "2.1");
        assert_eq!(label(17), "2.9");
        assert_eq!(label(18), "3.1");
    }

    #[test]
    fn counts_across_leap_day() {
        let epoch = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let target = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let notation = notate(target, epoch).unwrap();
        assert_eq!(notation.days_elapsed, 10);
        assert_eq!(notation.to_string(), "2.2");
        assert_eq!(notation.display_string(), "Cycle 2, Day 2");
    }

    #[test]
    fn rejects_dates_before_epoch() {
        let target = epoch().checked_sub_days(Days::new(1)).unwrap();
        assert!(matches!(notate(target, epoch()), Err(Error::Validation(_))));
    }
}
