//! Trip grouping and report building
//!
//! Trip legs sharing one trip number are merged into a single row with a
//! combined date range and route, de-duplicated revenue and summed expenses.
//! Building a report is a pure function of the loaded snapshot.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::expenses::{self, ExpenseBreakdown};
use crate::filter::ReportFilter;
use crate::index::ReferenceIndex;
use crate::normalize;
use crate::records::{BookingSource, Trip};
use crate::revenue;

/// Raw collections loaded from the record store
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub trips: Vec<Value>,
    pub manifests: Vec<Value>,
    pub general_bookings: Vec<Value>,
    pub part_load_bookings: Vec<Value>,
    pub full_load_bookings: Vec<Value>,
}

impl Snapshot {
    /// Normalize and index bookings and manifests.
    /// Booking pools are concatenated general, part-load, full-load; later ids win.
    pub fn reference_index(&self) -> ReferenceIndex {
        let bookings = normalize::normalize_bookings(&self.general_bookings, BookingSource::General)
            .into_iter()
            .chain(normalize::normalize_bookings(
                &self.part_load_bookings,
                BookingSource::PartLoad,
            ))
            .chain(normalize::normalize_bookings(
                &self.full_load_bookings,
                BookingSource::FullLoad,
            ));
        ReferenceIndex::build(bookings, normalize::normalize_manifests(&self.manifests))
    }

    pub fn booking_record_count(&self) -> usize {
        self.general_bookings.len() + self.part_load_bookings.len() + self.full_load_bookings.len()
    }
}

/// What a row groups on. Legs without a trip number are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum GroupKey {
    TripNumber(String),
    /// Position of a leg with a blank trip number in the loaded list
    Unnumbered(usize),
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKey::TripNumber(number) => write!(f, "{}", number),
            GroupKey::Unnumbered(index) => write!(f, "row-{}", index),
        }
    }
}

/// One reporting row: every leg of one trip number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripGroupRow {
    pub group_key: GroupKey,
    pub trip_number: String,
    pub trip_type: String,
    pub vehicle_type: String,
    pub vehicle_number: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Distinct "origin → destination" routes, comma separated
    pub route: String,
    pub legs: usize,
    pub manifest_count: usize,
    /// Distinct referenced booking ids, resolved or not
    pub booking_count: usize,
    pub booking_ids: Vec<String>,
    pub revenue: f64,
    pub expenses: ExpenseBreakdown,
    pub total_expense: f64,
    pub profit: f64,
}

/// Aggregate figures across all rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportTotals {
    pub groups: usize,
    pub legs: usize,
    pub bookings: usize,
    pub revenue: f64,
    pub expenses: ExpenseBreakdown,
    pub total_expense: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripProductivityReport {
    pub rows: Vec<TripGroupRow>,
    pub totals: ReportTotals,
    /// Trip records loaded before filtering
    pub trips_scanned: usize,
    /// Trip records that passed the filter
    pub trips_matched: usize,
}

impl TripProductivityReport {
    /// No group matched the filter. Not an error.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a row by trip number (case-insensitive)
    pub fn find(&self, trip_number: &str) -> Option<&TripGroupRow> {
        let wanted = trip_number.trim();
        self.rows
            .iter()
            .find(|row| row.trip_number.eq_ignore_ascii_case(wanted))
    }
}

/// Build the trip productivity report from a loaded snapshot
pub fn build_report(snapshot: &Snapshot, filter: &ReportFilter) -> TripProductivityReport {
    let index = snapshot.reference_index();
    let trips = normalize::normalize_trips(&snapshot.trips);
    build_report_from(&trips, &index, filter)
}

/// Build the report from already-normalized trips and an index
pub fn build_report_from(
    trips: &[Trip],
    index: &ReferenceIndex,
    filter: &ReportFilter,
) -> TripProductivityReport {
    let matched: Vec<&Trip> = trips.iter().filter(|t| filter.matches(t)).collect();

    let mut rows: Vec<TripGroupRow> = group_trips(&matched)
        .into_iter()
        .map(|(key, legs)| build_row(key, &legs, index))
        .collect();

    // Highest trip number first; stable sort keeps first-seen order on ties
    rows.sort_by_key(|row| std::cmp::Reverse(trip_sort_key(&row.trip_number)));

    let totals = compute_totals(&rows);

    TripProductivityReport {
        rows,
        totals,
        trips_scanned: trips.len(),
        trips_matched: matched.len(),
    }
}

/// Group legs by trip number in first-seen order.
/// Legs without a trip number each get their own group.
fn group_trips<'a>(trips: &[&'a Trip]) -> Vec<(GroupKey, Vec<&'a Trip>)> {
    let mut positions: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey, Vec<&'a Trip>)> = Vec::new();

    for trip in trips {
        let key = group_key(trip);
        match positions.get(&key) {
            Some(&pos) => groups[pos].1.push(*trip),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![*trip]));
            }
        }
    }

    groups
}

fn group_key(trip: &Trip) -> GroupKey {
    if trip.trip_number.is_empty() {
        GroupKey::Unnumbered(trip.record_index)
    } else {
        GroupKey::TripNumber(trip.trip_number.clone())
    }
}

fn build_row(group_key: GroupKey, legs: &[&Trip], index: &ReferenceIndex) -> TripGroupRow {
    let first = legs[0];

    let start_date = legs.iter().filter_map(|t| t.date).min();
    let end_date = legs.iter().filter_map(|t| t.date).max();

    let mut routes: Vec<String> = Vec::new();
    for route in legs.iter().filter_map(|t| t.route()) {
        if !routes.contains(&route) {
            routes.push(route);
        }
    }

    let manifests: HashSet<&str> = legs
        .iter()
        .filter_map(|t| t.manifest_ref.as_deref())
        .collect();

    let booking_ids = revenue::group_booking_ids(legs.iter().copied(), index);
    let revenue = revenue::total_revenue(&booking_ids, index);
    let expenses = expenses::group_expenses(legs.iter().copied());
    let total_expense = expenses.total();

    let trip_type = if first.trip_type_label.is_empty() {
        first.trip_type.to_string()
    } else {
        first.trip_type_label.clone()
    };

    TripGroupRow {
        group_key,
        trip_number: first.trip_number.clone(),
        trip_type,
        vehicle_type: first_non_empty(legs, |t| &t.vehicle_type),
        vehicle_number: first_non_empty(legs, |t| &t.vehicle_number),
        start_date,
        end_date,
        route: routes.join(", "),
        legs: legs.len(),
        manifest_count: manifests.len(),
        booking_count: booking_ids.len(),
        booking_ids,
        revenue,
        expenses,
        total_expense,
        profit: revenue - total_expense,
    }
}

fn first_non_empty(legs: &[&Trip], field: impl Fn(&Trip) -> &String) -> String {
    legs.iter()
        .map(|t| field(*t))
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_default()
}

fn compute_totals(rows: &[TripGroupRow]) -> ReportTotals {
    let mut totals = ReportTotals {
        groups: rows.len(),
        ..Default::default()
    };
    for row in rows {
        totals.legs += row.legs;
        totals.bookings += row.booking_count;
        totals.revenue += row.revenue;
        totals.expenses.merge(&row.expenses);
    }
    totals.total_expense = totals.expenses.total();
    totals.profit = totals.revenue - totals.total_expense;
    totals
}

/// Numeric suffix of a trip number used for ordering ("TRIP007" → 7).
/// Trip numbers without trailing digits sort as zero.
pub fn trip_sort_key(trip_number: &str) -> u64 {
    let trimmed = trip_number.trim();
    let digits_start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    match digits_start {
        Some(start) => trimmed[start..].parse().unwrap_or(u64::MAX),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(trips: Value, manifests: Value, bookings: Value) -> Snapshot {
        let list = |v: Value| v.as_array().cloned().unwrap_or_default();
        Snapshot {
            trips: list(trips),
            manifests: list(manifests),
            general_bookings: list(bookings),
            ..Default::default()
        }
    }

    #[test]
    fn test_part_load_trip_scenario() {
        let snapshot = snapshot(
            json!([{
                "tripNumber": "TRIP007",
                "tripType": "PTL",
                "selectedManifest": "M1",
                "expenses": [
                    {"expenseType": "Fuel", "amount": 1200},
                    {"expenseType": "Toll Tax", "amount": 150}
                ]
            }]),
            json!([{"id": "M1", "selectedLRs": ["B1", "B2"]}]),
            json!([{"id": "B1", "totalAmount": 5000}, {"id": "B2", "freight": "3,000"}]),
        );

        let report = build_report(&snapshot, &ReportFilter::default());
        assert_eq!(report.rows.len(), 1);

        let row = &report.rows[0];
        assert_eq!(row.trip_number, "TRIP007");
        assert_eq!(row.trip_type, "PTL");
        assert_eq!(row.revenue, 8000.0);
        assert_eq!(row.expenses.fuel, 1200.0);
        assert_eq!(row.expenses.toll, 150.0);
        assert_eq!(row.total_expense, 1350.0);
        assert_eq!(row.profit, 6650.0);
        assert_eq!(row.manifest_count, 1);
        assert_eq!(row.booking_count, 2);
    }

    #[test]
    fn test_legs_grouped_by_trip_number() {
        let snapshot = snapshot(
            json!([
                {"tripNumber": "TRIP010", "tripDate": "2024-01-07", "from": "B", "to": "C"},
                {"tripNumber": "TRIP010", "tripDate": "2024-01-05", "from": "A", "to": "B"}
            ]),
            json!([]),
            json!([]),
        );

        let report = build_report(&snapshot, &ReportFilter::default());
        assert_eq!(report.rows.len(), 1);

        let row = &report.rows[0];
        assert_eq!(row.legs, 2);
        assert_eq!(row.start_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(row.end_date, NaiveDate::from_ymd_opt(2024, 1, 7));
        assert!(row.route.contains("A → B"));
        assert!(row.route.contains("B → C"));
        assert_eq!(row.revenue, 0.0);
        assert_eq!(row.total_expense, 0.0);
    }

    #[test]
    fn test_shared_booking_across_legs_counted_once() {
        let snapshot = snapshot(
            json!([
                {"tripNumber": "T20", "tripType": "PTL", "selectedManifest": "M1"},
                {"tripNumber": "T20", "tripType": "PTL", "selectedManifest": "M2"}
            ]),
            json!([
                {"id": "M1", "selectedLRs": ["B100"]},
                {"id": "M2", "selectedLRs": [{"id": "B100"}]}
            ]),
            json!([{"id": "B100", "totalAmount": 2500}]),
        );

        let report = build_report(&snapshot, &ReportFilter::default());
        let row = &report.rows[0];
        assert_eq!(row.revenue, 2500.0);
        assert_eq!(row.booking_count, 1);
        assert_eq!(row.manifest_count, 2);
    }

    #[test]
    fn test_unresolved_ids_still_counted() {
        let snapshot = snapshot(
            json!([{"tripNumber": "T1", "tripType": "FTL", "selectedLRs": ["B1", "MISSING"]}]),
            json!([]),
            json!([{"id": "B1", "totalAmount": 100}]),
        );
        let report = build_report(&snapshot, &ReportFilter::default());
        assert_eq!(report.rows[0].booking_count, 2);
        assert_eq!(report.rows[0].revenue, 100.0);
    }

    #[test]
    fn test_blank_trip_numbers_not_merged() {
        let snapshot = snapshot(
            json!([{"tripNumber": ""}, {"from": "X", "to": "Y"}]),
            json!([]),
            json!([]),
        );
        let report = build_report(&snapshot, &ReportFilter::default());
        assert_eq!(report.rows.len(), 2);
        let keys: Vec<_> = report.rows.iter().map(|r| r.group_key.clone()).collect();
        assert_eq!(keys, vec![GroupKey::Unnumbered(0), GroupKey::Unnumbered(1)]);
        assert_eq!(report.rows[0].group_key.to_string(), "row-0");
    }

    #[test]
    fn test_unnumbered_leg_not_merged_with_lookalike_trip_number() {
        let snapshot = snapshot(
            json!([{"tripNumber": ""}, {"tripNumber": "row-0"}]),
            json!([]),
            json!([]),
        );
        let report = build_report(&snapshot, &ReportFilter::default());
        assert_eq!(report.rows.len(), 2);
        assert!(report.rows.iter().all(|r| r.legs == 1));
    }

    #[test]
    fn test_settlement_from_fallback_field_counts() {
        let snapshot = snapshot(
            json!([{
                "tripNumber": "T1",
                "finalized": true,
                "finalizedData": {"dieselAmount": 800, "bhatta": 300}
            }]),
            json!([]),
            json!([]),
        );
        let report = build_report(&snapshot, &ReportFilter::default());
        assert_eq!(report.rows[0].expenses.diesel_finalized, 800.0);
        assert_eq!(report.rows[0].total_expense, 1100.0);
    }

    #[test]
    fn test_rows_sorted_by_trip_number_descending() {
        let snapshot = snapshot(
            json!([
                {"tripNumber": "TRIP002"},
                {"tripNumber": "ADHOC"},
                {"tripNumber": "TRIP010"},
                {"tripNumber": "TRIP009"}
            ]),
            json!([]),
            json!([]),
        );
        let report = build_report(&snapshot, &ReportFilter::default());
        let order: Vec<_> = report.rows.iter().map(|r| r.trip_number.as_str()).collect();
        assert_eq!(order, vec!["TRIP010", "TRIP009", "TRIP002", "ADHOC"]);
    }

    #[test]
    fn test_filter_excludes_out_of_range_leg() {
        let snapshot = snapshot(
            json!([
                {"tripNumber": "T1", "tripDate": "2024-01-05", "expenses": [{"expenseType": "Toll", "amount": 10}]},
                {"tripNumber": "T1", "tripDate": "2024-02-05", "expenses": [{"expenseType": "Toll", "amount": 99}]},
                {"tripNumber": "T2", "tripDate": "2024-03-01"}
            ]),
            json!([]),
            json!([]),
        );
        let filter = ReportFilter {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        let report = build_report(&snapshot, &filter);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].expenses.toll, 10.0);
        assert_eq!(report.rows[0].end_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(report.trips_scanned, 3);
        assert_eq!(report.trips_matched, 1);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let snapshot = snapshot(json!([{"tripNumber": "T1"}]), json!([]), json!([]));
        let filter = ReportFilter {
            search: Some("nothing-matches".to_string()),
            ..Default::default()
        };
        let report = build_report(&snapshot, &filter);
        assert!(report.is_empty());
        assert_eq!(report.totals, ReportTotals::default());
    }

    #[test]
    fn test_malformed_expenses_degrade_to_zero() {
        let snapshot = snapshot(
            json!([{"tripNumber": "T1", "expenses": "{broken", "finalized": "[]"}]),
            json!([]),
            json!([]),
        );
        let report = build_report(&snapshot, &ReportFilter::default());
        assert_eq!(report.rows[0].total_expense, 0.0);
    }

    #[test]
    fn test_totals_sum_rows() {
        let snapshot = snapshot(
            json!([
                {"tripNumber": "T1", "tripType": "FTL", "selectedLRs": ["B1"], "expenses": [{"expenseType": "Fuel", "amount": 300}]},
                {"tripNumber": "T2", "tripType": "FTL", "selectedLRs": ["B2"], "finalized": {"secondDriverAllowance": 50}}
            ]),
            json!([]),
            json!([{"id": "B1", "totalAmount": 1000}, {"id": "B2", "totalAmount": 400}]),
        );
        let report = build_report(&snapshot, &ReportFilter::default());
        assert_eq!(report.totals.groups, 2);
        assert_eq!(report.totals.revenue, 1400.0);
        assert_eq!(report.totals.expenses.fuel, 300.0);
        assert_eq!(report.totals.expenses.salary_combined(), 50.0);
        assert_eq!(report.totals.total_expense, 350.0);
        assert_eq!(report.totals.profit, 1050.0);
    }

    #[test]
    fn test_report_is_idempotent() {
        let snapshot = snapshot(
            json!([
                {"tripNumber": "T3", "tripType": "PTL", "selectedManifest": "M1", "from": "A", "to": "B"},
                {"tripNumber": "T3", "tripType": "PTL", "selectedManifest": "M1", "from": "B", "to": "A"},
                {"tripNumber": "T1", "expenses": [{"expenseType": "Bhatta", "amount": 80}]}
            ]),
            json!([{"id": "M1", "selectedLRs": ["B1", "B2", "B3"]}]),
            json!([{"id": "B1", "totalAmount": 10}, {"id": "B2", "total": 20}, {"id": "B3", "freight": 30}]),
        );
        let first = build_report(&snapshot, &ReportFilter::default());
        let second = build_report(&snapshot, &ReportFilter::default());
        assert_eq!(first.rows, second.rows);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_booking_pools_later_wins() {
        let snapshot = Snapshot {
            trips: vec![json!({"tripNumber": "T1", "tripType": "FTL", "selectedLRs": ["B1"]})],
            general_bookings: vec![json!({"id": "B1", "totalAmount": 100})],
            full_load_bookings: vec![json!({"id": "B1", "totalAmount": 700})],
            ..Default::default()
        };
        let report = build_report(&snapshot, &ReportFilter::default());
        assert_eq!(report.rows[0].revenue, 700.0);
        assert_eq!(snapshot.booking_record_count(), 2);
    }

    #[test]
    fn test_find_row() {
        let snapshot = snapshot(json!([{"tripNumber": "TRIP007"}]), json!([]), json!([]));
        let report = build_report(&snapshot, &ReportFilter::default());
        assert!(report.find("trip007").is_some());
        assert!(report.find("TRIP008").is_none());
    }

    #[test]
    fn test_trip_sort_key() {
        assert_eq!(trip_sort_key("TRIP007"), 7);
        assert_eq!(trip_sort_key("TRP-2024-15"), 15);
        assert_eq!(trip_sort_key("123"), 123);
        assert_eq!(trip_sort_key("ADHOC"), 0);
        assert_eq!(trip_sort_key(""), 0);
        assert_eq!(trip_sort_key("T99999999999999999999999"), u64::MAX);
    }
}
