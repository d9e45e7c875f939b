//! Id-indexed lookup tables for bookings and manifests

use std::collections::HashMap;

use crate::records::{Booking, Manifest};

/// Booking and manifest lookups keyed by string id
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    bookings: HashMap<String, Booking>,
    manifests: HashMap<String, Manifest>,
}

impl ReferenceIndex {
    /// Index every record with a non-blank id. When ids collide, the later record wins.
    pub fn build(
        bookings: impl IntoIterator<Item = Booking>,
        manifests: impl IntoIterator<Item = Manifest>,
    ) -> Self {
        let bookings = bookings
            .into_iter()
            .filter(|b| !b.id.is_empty())
            .map(|b| (b.id.clone(), b))
            .collect();
        let manifests = manifests
            .into_iter()
            .filter(|m| !m.id.is_empty())
            .map(|m| (m.id.clone(), m))
            .collect();

        Self {
            bookings,
            manifests,
        }
    }

    pub fn booking(&self, id: &str) -> Option<&Booking> {
        self.bookings.get(id)
    }

    pub fn manifest(&self, id: &str) -> Option<&Manifest> {
        self.manifests.get(id)
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.len()
    }

    pub fn manifest_count(&self) -> usize {
        self.manifests.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::BookingSource;

    fn booking(id: &str, freight: f64, source: BookingSource) -> Booking {
        Booking {
            id: id.to_string(),
            source,
            freight,
        }
    }

    #[test]
    fn test_last_loaded_booking_wins() {
        let index = ReferenceIndex::build(
            vec![
                booking("B1", 100.0, BookingSource::General),
                booking("B1", 250.0, BookingSource::FullLoad),
            ],
            Vec::new(),
        );
        let found = index.booking("B1").unwrap();
        assert_eq!(found.freight, 250.0);
        assert_eq!(found.source, BookingSource::FullLoad);
        assert_eq!(index.booking_count(), 1);
    }

    #[test]
    fn test_blank_ids_not_indexed() {
        let index = ReferenceIndex::build(
            vec![booking("", 100.0, BookingSource::General)],
            vec![Manifest {
                id: String::new(),
                booking_ids: vec!["B1".to_string()],
            }],
        );
        assert_eq!(index.booking_count(), 0);
        assert_eq!(index.manifest_count(), 0);
        assert!(index.manifest("M404").is_none());
    }
}
