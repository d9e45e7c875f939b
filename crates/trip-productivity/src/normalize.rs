//! Record normalization
//!
//! Converts raw trip, manifest and booking records into the canonical types in
//! [`crate::records`]. Normalization never fails: malformed nested structures
//! become empty containers and unparseable amounts become zero.

use chrono::NaiveDate;
use serde_json::Value;

use crate::constants::*;
use crate::fields::{RawRecord, RecordView};
use crate::records::{
    Booking, BookingSource, ExpenseEntry, FinalizedSettlement, FuelEntry, Manifest, Trip, TripType,
};
use crate::revenue;

/// Normalize one raw trip record. `record_index` is its position in the loaded list.
pub fn normalize_trip(record: &Value, record_index: usize) -> Trip {
    let view = RecordView::new(record);
    let text = |names: &[&str]| view.string(names).unwrap_or_default();

    let trip_type_label = text(TRIP_TYPE_FIELDS);
    let expenses = view
        .list(EXPENSE_LIST_FIELDS)
        .iter()
        .map(normalize_expense)
        .collect();
    let fuel_entries = view
        .list(FUEL_LIST_FIELDS)
        .iter()
        .map(|entry| FuelEntry {
            amount: RecordView::new(entry).amount(FUEL_AMOUNT_FIELDS).unwrap_or(0.0),
        })
        .collect();

    Trip {
        record_index,
        record_id: view.string(RECORD_ID_FIELDS),
        trip_number: text(TRIP_NUMBER_FIELDS),
        trip_type: TripType::from_label(&trip_type_label),
        trip_type_label,
        vehicle_type: text(VEHICLE_TYPE_FIELDS),
        vehicle_number: text(VEHICLE_NUMBER_FIELDS),
        date: view.string(TRIP_DATE_FIELDS).and_then(|s| parse_date(&s)),
        origin: text(ORIGIN_FIELDS),
        destination: text(DESTINATION_FIELDS),
        manifest_ref: view.reference(MANIFEST_REF_FIELDS),
        booking_ids: view.reference_list(BOOKING_ID_LIST_FIELDS),
        expenses,
        fuel_entries,
        finalized: normalize_finalized(view.object(FINALIZED_FIELDS)),
        status: text(STATUS_FIELDS),
        salary_type: text(SALARY_TYPE_FIELDS),
        total_wages: view.amount(TOTAL_WAGES_FIELDS),
    }
}

pub fn normalize_trips(records: &[Value]) -> Vec<Trip> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| normalize_trip(record, i))
        .collect()
}

pub fn normalize_manifest(record: &Value) -> Manifest {
    let view = RecordView::new(record);
    Manifest {
        id: view.string(MANIFEST_ID_FIELDS).unwrap_or_default(),
        booking_ids: view.reference_list(BOOKING_ID_LIST_FIELDS),
    }
}

pub fn normalize_manifests(records: &[Value]) -> Vec<Manifest> {
    records.iter().map(normalize_manifest).collect()
}

pub fn normalize_booking(record: &Value, source: BookingSource) -> Booking {
    let view = RecordView::new(record);
    Booking {
        id: view.string(BOOKING_ID_FIELDS).unwrap_or_default(),
        source,
        freight: revenue::freight_amount(record),
    }
}

pub fn normalize_bookings(records: &[Value], source: BookingSource) -> Vec<Booking> {
    records
        .iter()
        .map(|record| normalize_booking(record, source))
        .collect()
}

fn normalize_expense(entry: &Value) -> ExpenseEntry {
    let view = RecordView::new(entry);
    ExpenseEntry {
        label: view
            .string(EXPENSE_LABEL_FIELDS)
            .unwrap_or_else(|| DEFAULT_EXPENSE_LABEL.to_string()),
        amount: view.amount(EXPENSE_AMOUNT_FIELDS).unwrap_or(0.0),
    }
}

/// Settlement record, or `None` if absent or empty after decoding
fn normalize_finalized(map: RawRecord) -> Option<FinalizedSettlement> {
    if map.is_empty() {
        return None;
    }
    let record = Value::Object(map);
    let view = RecordView::new(&record);
    let amount = |names: &[&str]| view.amount(names).unwrap_or(0.0);

    Some(FinalizedSettlement {
        diesel: amount(FINALIZED_DIESEL_FIELDS),
        bhatta: amount(FINALIZED_BHATTA_FIELDS),
        salary: amount(FINALIZED_SALARY_FIELDS),
        second_driver: amount(FINALIZED_SECOND_DRIVER_FIELDS),
    })
}

/// Parse the calendar date from an ISO date or date-time string
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
