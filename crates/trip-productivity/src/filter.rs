//! Caller-supplied trip filters

use chrono::NaiveDate;
use serde::Serialize;

use crate::records::Trip;

/// Date range, free-text search and closed-trip toggle applied before grouping
#[derive(Debug, Clone, Serialize)]
pub struct ReportFilter {
    /// Inclusive lower bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub to: Option<NaiveDate>,
    /// Case-insensitive match on trip number, origin, destination or vehicle
    pub search: Option<String>,
    pub include_closed: bool,
}

impl Default for ReportFilter {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            search: None,
            include_closed: true,
        }
    }
}

impl ReportFilter {
    pub fn matches(&self, trip: &Trip) -> bool {
        self.matches_dates(trip) && self.matches_search(trip) && self.matches_status(trip)
    }

    /// Trips without a parseable date fail any bound that is set
    fn matches_dates(&self, trip: &Trip) -> bool {
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Some(date) = trip.date else {
            return false;
        };
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    fn matches_search(&self, trip: &Trip) -> bool {
        let Some(needle) = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
        else {
            return true;
        };

        [
            &trip.trip_number,
            &trip.origin,
            &trip.destination,
            &trip.vehicle_number,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_status(&self, trip: &Trip) -> bool {
        self.include_closed || !trip.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_trip;
    use serde_json::json;

    fn trip() -> Trip {
        normalize_trip(
            &json!({
                "tripNumber": "TRIP042",
                "tripDate": "2024-03-10",
                "from": "Nagpur",
                "to": "Raipur",
                "vehicleNumber": "CG04XY9876",
                "status": "Closed"
            }),
            0,
        )
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_default_matches_everything() {
        assert!(ReportFilter::default().matches(&trip()));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filter = ReportFilter {
            from: date(2024, 3, 10),
            to: date(2024, 3, 10),
            ..Default::default()
        };
        assert!(filter.matches(&trip()));

        let filter = ReportFilter {
            from: date(2024, 3, 11),
            ..Default::default()
        };
        assert!(!filter.matches(&trip()));

        let filter = ReportFilter {
            to: date(2024, 3, 9),
            ..Default::default()
        };
        assert!(!filter.matches(&trip()));
    }

    #[test]
    fn test_undated_trip_fails_bounded_range() {
        let undated = normalize_trip(&json!({"tripNumber": "T1", "tripDate": "soon"}), 0);
        let filter = ReportFilter {
            from: date(2024, 1, 1),
            ..Default::default()
        };
        assert!(!filter.matches(&undated));
        assert!(ReportFilter::default().matches(&undated));
    }

    #[test]
    fn test_search_matches_vehicle_only() {
        let filter = ReportFilter {
            search: Some("cg04xy".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&trip()));

        let filter = ReportFilter {
            search: Some("raipur".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&trip()));

        let filter = ReportFilter {
            search: Some("delhi".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&trip()));

        let filter = ReportFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&trip()));
    }

    #[test]
    fn test_exclude_closed() {
        let filter = ReportFilter {
            include_closed: false,
            ..Default::default()
        };
        assert!(!filter.matches(&trip()));

        let open = normalize_trip(&json!({"tripNumber": "T2", "status": "In Transit"}), 0);
        assert!(filter.matches(&open));
    }
}
