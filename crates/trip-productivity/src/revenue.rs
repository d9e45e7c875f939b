//! Revenue resolution: which bookings a trip carries and what they are worth

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::constants::BOOKING_FREIGHT_PATHS;
use crate::fields::first_amount_at;
use crate::index::ReferenceIndex;
use crate::records::{BookingSource, Trip, TripType};

/// Freight amount of a raw booking record.
///
/// Walks `BOOKING_FREIGHT_PATHS` in priority order and takes the first value
/// that is present and numeric. Bookings with no usable amount are worth zero.
pub fn freight_amount(record: &Value) -> f64 {
    first_amount_at(record, BOOKING_FREIGHT_PATHS).unwrap_or(0.0)
}

/// Booking ids carried by a single trip leg
pub fn trip_booking_ids(trip: &Trip, index: &ReferenceIndex) -> Vec<String> {
    let from_manifest = || {
        trip.manifest_ref
            .as_deref()
            .and_then(|id| index.manifest(id))
            .map(|m| m.booking_ids.clone())
            .unwrap_or_default()
    };

    match trip.trip_type {
        TripType::FullLoad => trip.booking_ids.clone(),
        TripType::PartLoad => from_manifest(),
        TripType::Unknown => {
            if trip.manifest_ref.is_some() {
                from_manifest()
            } else {
                trip.booking_ids.clone()
            }
        }
    }
}

/// Distinct booking ids across every leg of a group, in first-seen order
pub fn group_booking_ids<'a>(
    trips: impl IntoIterator<Item = &'a Trip>,
    index: &ReferenceIndex,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for trip in trips {
        for id in trip_booking_ids(trip, index) {
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Total freight over a set of distinct booking ids. Unresolved ids add nothing.
pub fn total_revenue(booking_ids: &[String], index: &ReferenceIndex) -> f64 {
    booking_ids
        .iter()
        .filter_map(|id| index.booking(id))
        .map(|b| b.freight)
        .sum()
}

/// Per-booking revenue line for trip detail views
#[derive(Debug, Clone, Serialize)]
pub struct BookingRevenue {
    pub id: String,
    /// `None` when the id did not resolve to any loaded booking
    pub source: Option<BookingSource>,
    pub freight: f64,
}

/// Revenue broken down per booking id
pub fn booking_breakdown(booking_ids: &[String], index: &ReferenceIndex) -> Vec<BookingRevenue> {
    booking_ids
        .iter()
        .map(|id| match index.booking(id) {
            Some(b) => BookingRevenue {
                id: id.clone(),
                source: Some(b.source),
                freight: b.freight,
            },
            None => BookingRevenue {
                id: id.clone(),
                source: None,
                freight: 0.0,
            },
        })
        .collect()
}
