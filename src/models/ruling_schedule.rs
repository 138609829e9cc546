//! Year-by-year ruling schedule models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a calendar year sits relative to the relief window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulingPhase {
    /// The year the ruling starts; relief covers the remaining months.
    RampStart,
    /// A year fully inside the relief window.
    FullRelief,
    /// The year the window closes; relief covers the leftover months.
    RampEnd,
    /// After the window closed.
    NoRelief,
    /// The profile does not qualify for the ruling at all.
    Ineligible,
}

/// One calendar year of a ruling schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulingYear {
    /// The calendar year.
    pub year: i32,
    /// Position of the year in the relief window.
    pub phase: RulingPhase,
    /// Fraction of salary exempted during relieved months.
    pub relief_fraction: Decimal,
    /// Number of months in this year covered by relief.
    pub months_at_relief: u32,
    /// Salary subject to income tax for this year.
    pub taxable_income: Decimal,
}

impl RulingYear {
    /// Short label used by the dashboard, e.g. `"30% 2026"` or `"No ruling 2031"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nl_income_engine::models::{RulingPhase, RulingYear};
    /// use rust_decimal::Decimal;
    ///
    /// let year = RulingYear {
    ///     year: 2027,
    ///     phase: RulingPhase::FullRelief,
    ///     relief_fraction: Decimal::new(27, 2),
    ///     months_at_relief: 12,
    ///     taxable_income: Decimal::new(543996, 1),
    /// };
    /// assert_eq!(year.label(), "27% 2027");
    /// ```
    pub fn label(&self) -> String {
        if self.months_at_relief == 0 {
            return format!("No ruling {}", self.year);
        }
        let percent = (self.relief_fraction * Decimal::ONE_HUNDRED).normalize();
        format!("{}% {}", percent, self.year)
    }
}

/// The ordered taxable-income schedule over the projection horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulingYearSchedule {
    /// Gross annual salary as supplied.
    pub gross_salary: Decimal,
    /// Salary every year was computed on, after the salary cap.
    pub base_salary: Decimal,
    /// One entry per projected year, ascending and consecutive.
    pub years: Vec<RulingYear>,
}

impl RulingYearSchedule {
    /// Returns the number of projected years.
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// Returns true if the schedule has no years.
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Looks up the entry for a calendar year.
    pub fn get(&self, year: i32) -> Option<&RulingYear> {
        self.years.iter().find(|y| y.year == year)
    }

    /// Returns true if any year received relief.
    pub fn has_relief(&self) -> bool {
        self.years.iter().any(|y| y.months_at_relief > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn year(year: i32, phase: RulingPhase, fraction: &str, months: u32) -> RulingYear {
        RulingYear {
            year,
            phase,
            relief_fraction: dec(fraction),
            months_at_relief: months,
            taxable_income: dec("50000"),
        }
    }

    #[test]
    fn test_label_for_relieved_year() {
        assert_eq!(
            year(2026, RulingPhase::RampStart, "0.30", 6).label(),
            "30% 2026"
        );
    }

    #[test]
    fn test_label_for_unrelieved_year() {
        assert_eq!(
            year(2031, RulingPhase::NoRelief, "0", 0).label(),
            "No ruling 2031"
        );
    }

    #[test]
    fn test_schedule_lookup_by_year() {
        let schedule = RulingYearSchedule {
            gross_salary: dec("74520"),
            base_salary: dec("74520"),
            years: vec![
                year(2026, RulingPhase::RampStart, "0.30", 12),
                year(2027, RulingPhase::FullRelief, "0.27", 12),
            ],
        };
        assert_eq!(schedule.len(), 2);
        assert!(schedule.has_relief());
        assert_eq!(schedule.get(2027).unwrap().phase, RulingPhase::FullRelief);
        assert!(schedule.get(2030).is_none());
    }

    #[test]
    fn test_phase_serialization() {
        assert_eq!(
            serde_json::to_string(&RulingPhase::RampStart).unwrap(),
            "\"ramp_start\""
        );
        assert_eq!(
            serde_json::to_string(&RulingPhase::NoRelief).unwrap(),
            "\"no_relief\""
        );
    }
}
