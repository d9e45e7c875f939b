//! Centralized constants for the trip productivity engine
//!
//! The upstream store enforces no schema, so every field the engine reads is
//! listed here as an ordered chain of candidate names. The first candidate that
//! is present (and, for amounts, numerically parseable) wins.

/// A dotted path into a raw record, e.g. `["charges", "freight"]`
pub type FieldPath = &'static [&'static str];

// =============================================================================
// Nested Blobs
// =============================================================================

/// Sub-objects searched after the top level when a field is missing there.
/// Either may be stored as a JSON-encoded string.
pub const NESTED_BLOBS: &[&str] = &["extraData", "data"];

// =============================================================================
// Trip Fields
// =============================================================================

pub const RECORD_ID_FIELDS: &[&str] = &["id", "_id"];

pub const TRIP_NUMBER_FIELDS: &[&str] = &["tripNumber", "tripNo", "tripId"];

pub const TRIP_TYPE_FIELDS: &[&str] = &["tripType", "type"];

pub const VEHICLE_TYPE_FIELDS: &[&str] = &["vehicleType"];

pub const VEHICLE_NUMBER_FIELDS: &[&str] = &["vehicleNumber", "vehicleNo", "vehicle"];

pub const TRIP_DATE_FIELDS: &[&str] = &["tripDate", "date", "startDate"];

pub const ORIGIN_FIELDS: &[&str] = &["from", "origin", "fromLocation"];

pub const DESTINATION_FIELDS: &[&str] = &["to", "destination", "toLocation"];

pub const MANIFEST_REF_FIELDS: &[&str] = &["selectedManifest", "manifestId"];

/// Booking-id lists, used both on full-load trips and on manifests
pub const BOOKING_ID_LIST_FIELDS: &[&str] = &["selectedLRs", "lrIds", "bookingIds", "lrs"];

pub const EXPENSE_LIST_FIELDS: &[&str] = &["expenses"];

pub const FUEL_LIST_FIELDS: &[&str] = &["fuelEntries", "fuel"];

pub const FINALIZED_FIELDS: &[&str] = &["finalized", "finalizedData", "settlement"];

pub const STATUS_FIELDS: &[&str] = &["status"];

pub const SALARY_TYPE_FIELDS: &[&str] = &["salaryType"];

pub const TOTAL_WAGES_FIELDS: &[&str] = &["totalWages"];

/// Status value (lowercased) marking a trip as closed
pub const CLOSED_STATUS: &str = "closed";

/// Salary type marker (lowercased substring) for daily-wage drivers
pub const DAILY_WAGE_MARKER: &str = "daily";

// =============================================================================
// Manifest / Booking Fields
// =============================================================================

pub const MANIFEST_ID_FIELDS: &[&str] = &["id", "_id", "manifestNumber"];

pub const BOOKING_ID_FIELDS: &[&str] = &["id", "_id", "lrNumber"];

/// Identifier fields exposed by wrapper objects inside reference lists
pub const REFERENCE_ID_FIELDS: &[&str] = &["id", "_id", "lrId", "lrNumber"];

/// Freight amount candidates for a booking, highest priority first
pub const BOOKING_FREIGHT_PATHS: &[FieldPath] = &[
    &["totalAmount"],
    &["total"],
    &["grandTotal"],
    &["freight"],
    &["charges", "totalAmount"],
    &["charges", "freight"],
    &["extraData", "totalAmount"],
    &["extraData", "freight"],
    &["data", "totalAmount"],
    &["data", "freight"],
];

// =============================================================================
// Expense Fields
// =============================================================================

pub const EXPENSE_LABEL_FIELDS: &[&str] = &["expenseType", "type", "name"];

/// Label used when an expense entry carries no type at all
pub const DEFAULT_EXPENSE_LABEL: &str = "Other";

pub const EXPENSE_AMOUNT_FIELDS: &[&str] = &["amount", "value"];

pub const FUEL_AMOUNT_FIELDS: &[&str] = &["amount", "totalAmount", "fuelAmount"];

pub const FINALIZED_DIESEL_FIELDS: &[&str] = &["dieselAmount", "diesel"];

pub const FINALIZED_BHATTA_FIELDS: &[&str] = &["bhatta"];

pub const FINALIZED_SALARY_FIELDS: &[&str] = &["salary"];

pub const FINALIZED_SECOND_DRIVER_FIELDS: &[&str] = &["secondDriverAllowance", "secondDriver"];

// =============================================================================
// Resources
// =============================================================================

pub const TRIPS_RESOURCE: &str = "trips";
pub const MANIFESTS_RESOURCE: &str = "manifests";
pub const GENERAL_BOOKINGS_RESOURCE: &str = "lr_bookings";
pub const PART_LOAD_BOOKINGS_RESOURCE: &str = "ptl_bookings";
pub const FULL_LOAD_BOOKINGS_RESOURCE: &str = "ftl_bookings";

/// Envelope key some store endpoints wrap their record arrays in
pub const RECORDS_ENVELOPE_KEY: &str = "data";

// =============================================================================
// File Names
// =============================================================================

/// Default config file path
pub const CONFIG_FILENAME: &str = "config.toml";

/// Default CSV export filename
pub const REPORT_FILENAME: &str = "trip_productivity.csv";

/// Separator between origin and destination in a route string
pub const ROUTE_ARROW: &str = " → ";
