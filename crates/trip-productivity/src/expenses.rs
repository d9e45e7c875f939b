//! Trip expense classification and aggregation
//!
//! Itemized expenses carry a free-text type label which is matched against a
//! keyword table. Fuel entries and the finalized settlement feed their buckets
//! directly. Every amount lands in exactly one bucket.

use serde::{Deserialize, Serialize};

use crate::records::Trip;

/// Expense category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    Fuel,
    /// Diesel figure from the finalized settlement, kept apart from itemized fuel
    DieselFinalized,
    Toll,
    /// Daily driver allowance
    Bhatta,
    Salary,
    SecondDriver,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::Fuel,
        ExpenseCategory::DieselFinalized,
        ExpenseCategory::Toll,
        ExpenseCategory::Bhatta,
        ExpenseCategory::Salary,
        ExpenseCategory::SecondDriver,
        ExpenseCategory::Other,
    ];
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseCategory::Fuel => write!(f, "Fuel"),
            ExpenseCategory::DieselFinalized => write!(f, "Diesel (Finalized)"),
            ExpenseCategory::Toll => write!(f, "Toll"),
            ExpenseCategory::Bhatta => write!(f, "Bhatta"),
            ExpenseCategory::Salary => write!(f, "Salary"),
            ExpenseCategory::SecondDriver => write!(f, "Second Driver"),
            ExpenseCategory::Other => write!(f, "Other"),
        }
    }
}

/// Keyword rules for itemized expense labels, checked in order. First match wins.
pub const CLASSIFICATION_RULES: &[(&[&str], ExpenseCategory)] = &[
    (&["fuel", "diesel", "cng"], ExpenseCategory::Fuel),
    (&["toll"], ExpenseCategory::Toll),
    (&["bhatta"], ExpenseCategory::Bhatta),
    (&["salary", "wages"], ExpenseCategory::Salary),
];

/// Classify an itemized expense label. Unrecognized labels are `Other`.
pub fn classify(label: &str) -> ExpenseCategory {
    let label = label.trim().to_lowercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| label.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(ExpenseCategory::Other)
}

/// Expense totals per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ExpenseBreakdown {
    pub fuel: f64,
    pub diesel_finalized: f64,
    pub toll: f64,
    pub bhatta: f64,
    pub salary: f64,
    pub second_driver: f64,
    pub other: f64,
}

impl ExpenseBreakdown {
    pub fn add(&mut self, category: ExpenseCategory, amount: f64) {
        *self.bucket_mut(category) += amount;
    }

    pub fn get(&self, category: ExpenseCategory) -> f64 {
        match category {
            ExpenseCategory::Fuel => self.fuel,
            ExpenseCategory::DieselFinalized => self.diesel_finalized,
            ExpenseCategory::Toll => self.toll,
            ExpenseCategory::Bhatta => self.bhatta,
            ExpenseCategory::Salary => self.salary,
            ExpenseCategory::SecondDriver => self.second_driver,
            ExpenseCategory::Other => self.other,
        }
    }

    fn bucket_mut(&mut self, category: ExpenseCategory) -> &mut f64 {
        match category {
            ExpenseCategory::Fuel => &mut self.fuel,
            ExpenseCategory::DieselFinalized => &mut self.diesel_finalized,
            ExpenseCategory::Toll => &mut self.toll,
            ExpenseCategory::Bhatta => &mut self.bhatta,
            ExpenseCategory::Salary => &mut self.salary,
            ExpenseCategory::SecondDriver => &mut self.second_driver,
            ExpenseCategory::Other => &mut self.other,
        }
    }

    /// Sum of all buckets, including finalized diesel and second driver
    pub fn total(&self) -> f64 {
        ExpenseCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Salary and second-driver allowance, shown as one column in reports
    pub fn salary_combined(&self) -> f64 {
        self.salary + self.second_driver
    }

    pub fn merge(&mut self, other: &ExpenseBreakdown) {
        for category in ExpenseCategory::ALL {
            self.add(category, other.get(category));
        }
    }

    /// Non-zero buckets, largest first
    pub fn by_category(&self) -> Vec<(ExpenseCategory, f64)> {
        let mut result: Vec<_> = ExpenseCategory::ALL
            .iter()
            .map(|c| (*c, self.get(*c)))
            .filter(|(_, amount)| *amount != 0.0)
            .collect();
        result.sort_by(|a, b| b.1.total_cmp(&a.1));
        result
    }
}

/// Aggregate one trip leg's itemized expenses, fuel entries and finalized settlement
pub fn trip_expenses(trip: &Trip) -> ExpenseBreakdown {
    let mut breakdown = ExpenseBreakdown::default();

    for entry in &trip.expenses {
        breakdown.add(classify(&entry.label), entry.amount);
    }

    for fuel in &trip.fuel_entries {
        breakdown.add(ExpenseCategory::Fuel, fuel.amount);
    }

    if let Some(settlement) = &trip.finalized {
        breakdown.add(ExpenseCategory::DieselFinalized, settlement.diesel);
        breakdown.add(ExpenseCategory::Bhatta, settlement.bhatta);
        breakdown.add(ExpenseCategory::Salary, settlement.salary);
        breakdown.add(ExpenseCategory::SecondDriver, settlement.second_driver);
    }

    if trip.is_daily_wage() {
        if let Some(wages) = trip.total_wages {
            breakdown.add(ExpenseCategory::Salary, wages);
        }
    }

    breakdown
}

/// Aggregate every leg of a trip group
pub fn group_expenses<'a>(trips: impl IntoIterator<Item = &'a Trip>) -> ExpenseBreakdown {
    let mut total = ExpenseBreakdown::default();
    for trip in trips {
        total.merge(&trip_expenses(trip));
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_trip;
    use serde_json::json;

    #[test]
    fn test_classify_keywords() {
        assert_eq!(classify("Fuel"), ExpenseCategory::Fuel);
        assert_eq!(classify("  DIESEL top-up "), ExpenseCategory::Fuel);
        assert_eq!(classify("CNG refill"), ExpenseCategory::Fuel);
        assert_eq!(classify("Toll Tax"), ExpenseCategory::Toll);
        assert_eq!(classify("Driver Bhatta"), ExpenseCategory::Bhatta);
        assert_eq!(classify("Salary advance"), ExpenseCategory::Salary);
        assert_eq!(classify("Cleaner wages"), ExpenseCategory::Salary);
    }

    #[test]
    fn test_unrecognized_label_is_other() {
        assert_eq!(classify("Loading charges"), ExpenseCategory::Other);
        assert_eq!(classify(""), ExpenseCategory::Other);
        assert_eq!(classify("Other"), ExpenseCategory::Other);
    }

    #[test]
    fn test_trip_expenses_all_sources() {
        let trip = normalize_trip(
            &json!({
                "expenses": [
                    {"expenseType": "Fuel", "amount": 1200},
                    {"expenseType": "Toll Tax", "amount": "150"},
                    {"expenseType": "Police", "amount": 50}
                ],
                "fuelEntries": [{"amount": "2,000"}, {"amount": 500}],
                "finalized": {"dieselAmount": 800, "bhatta": 300, "salary": 1000, "secondDriverAllowance": 400}
            }),
            0,
        );
        let breakdown = trip_expenses(&trip);

        assert_eq!(breakdown.fuel, 3700.0);
        assert_eq!(breakdown.toll, 150.0);
        assert_eq!(breakdown.other, 50.0);
        assert_eq!(breakdown.diesel_finalized, 800.0);
        assert_eq!(breakdown.bhatta, 300.0);
        assert_eq!(breakdown.salary, 1000.0);
        assert_eq!(breakdown.second_driver, 400.0);
        assert_eq!(breakdown.salary_combined(), 1400.0);
        assert_eq!(breakdown.total(), 6400.0);
    }

    #[test]
    fn test_daily_wage_adds_total_wages() {
        let trip = normalize_trip(
            &json!({"salaryType": "Daily", "totalWages": "1,500", "expenses": [{"expenseType": "Salary", "amount": 100}]}),
            0,
        );
        assert_eq!(trip_expenses(&trip).salary, 1600.0);

        let monthly = normalize_trip(&json!({"salaryType": "Monthly", "totalWages": 1500}), 0);
        assert_eq!(trip_expenses(&monthly).salary, 0.0);
    }

    #[test]
    fn test_expense_conservation_across_legs() {
        let legs = [
            normalize_trip(
                &json!({"expenses": [{"expenseType": "Fuel", "amount": 100}, {"name": "Misc", "amount": 7}]}),
                0,
            ),
            normalize_trip(
                &json!({"fuelEntries": [{"amount": 40}], "finalized": {"diesel": 60, "bhatta": 5}}),
                1,
            ),
        ];
        let breakdown = group_expenses(&legs);
        let raw_sum = 100.0 + 7.0 + 40.0 + 60.0 + 5.0;
        assert_eq!(breakdown.total(), raw_sum);
        assert_eq!(
            breakdown.by_category(),
            vec![
                (ExpenseCategory::Fuel, 140.0),
                (ExpenseCategory::DieselFinalized, 60.0),
                (ExpenseCategory::Other, 7.0),
                (ExpenseCategory::Bhatta, 5.0),
            ]
        );
    }

    #[test]
    fn test_no_expenses_is_zero() {
        let trip = normalize_trip(&json!({"tripNumber": "T1"}), 0);
        assert_eq!(trip_expenses(&trip), ExpenseBreakdown::default());
        assert_eq!(trip_expenses(&trip).total(), 0.0);
    }
}
