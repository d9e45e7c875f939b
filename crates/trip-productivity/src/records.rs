//! Canonical record types produced by the normalizer

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants;

/// How a trip references the bookings it carries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TripType {
    /// Full truck load: the trip lists its booking ids directly
    FullLoad,
    /// Part truck load: bookings come from the referenced manifest
    PartLoad,
    Unknown,
}

impl TripType {
    /// Parse a raw trip type label (`FTL`, `Full Load`, `PTL`, `part-load`, ...)
    pub fn from_label(label: &str) -> Self {
        let compact: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "ftl" | "fullload" | "fulltruckload" | "full" => TripType::FullLoad,
            "ptl" | "partload" | "parttruckload" | "part" | "ltl" => TripType::PartLoad,
            _ => TripType::Unknown,
        }
    }
}

impl std::fmt::Display for TripType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripType::FullLoad => write!(f, "FTL"),
            TripType::PartLoad => write!(f, "PTL"),
            TripType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Booking collection a consignment note was loaded from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BookingSource {
    General,
    PartLoad,
    FullLoad,
}

impl std::fmt::Display for BookingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingSource::General => write!(f, "LR"),
            BookingSource::PartLoad => write!(f, "PTL"),
            BookingSource::FullLoad => write!(f, "FTL"),
        }
    }
}

/// Itemized expense logged against a trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseEntry {
    /// Free-text type label, as entered
    pub label: String,
    pub amount: f64,
}

/// Fuel purchase logged against a trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelEntry {
    pub amount: f64,
}

/// Late-stage corrections recorded when a trip is closed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinalizedSettlement {
    pub diesel: f64,
    pub bhatta: f64,
    pub salary: f64,
    pub second_driver: f64,
}

/// One stored trip leg
#[derive(Debug, Clone, Serialize)]
pub struct Trip {
    /// Position in the loaded trip list
    pub record_index: usize,
    pub record_id: Option<String>,
    /// External trip identifier, shared by every leg of a multi-leg trip. May be empty.
    pub trip_number: String,
    pub trip_type: TripType,
    /// Raw trip type label, kept for display
    pub trip_type_label: String,
    pub vehicle_type: String,
    pub vehicle_number: String,
    pub date: Option<NaiveDate>,
    pub origin: String,
    pub destination: String,
    pub manifest_ref: Option<String>,
    pub booking_ids: Vec<String>,
    pub expenses: Vec<ExpenseEntry>,
    pub fuel_entries: Vec<FuelEntry>,
    pub finalized: Option<FinalizedSettlement>,
    pub status: String,
    pub salary_type: String,
    pub total_wages: Option<f64>,
}

impl Trip {
    pub fn is_closed(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(constants::CLOSED_STATUS)
    }

    /// Whether the driver is paid on a daily-wage basis
    pub fn is_daily_wage(&self) -> bool {
        self.salary_type
            .to_lowercase()
            .contains(constants::DAILY_WAGE_MARKER)
    }

    /// "origin → destination", or `None` when both ends are blank
    pub fn route(&self) -> Option<String> {
        if self.origin.is_empty() && self.destination.is_empty() {
            return None;
        }
        Some(format!(
            "{}{}{}",
            self.origin,
            constants::ROUTE_ARROW,
            self.destination
        ))
    }
}

/// A batch of bookings assigned to one part-load trip leg
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub id: String,
    pub booking_ids: Vec<String>,
}

/// A consignment note (LR) with its resolved freight amount
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: String,
    pub source: BookingSource,
    pub freight: f64,
}
