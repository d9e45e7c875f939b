//! Trip Productivity aggregation engine
//!
//! Reconciles trips, manifests and consignment (LR) bookings from a schema-less
//! record store into per-trip revenue, expense and profit rows.
//!
//! ```text
//! raw records → normalize → index → group (revenue + expenses) → sorted rows
//! ```
//!
//! Loading is the caller's job ([`source`]); everything after that is a pure,
//! synchronous transform ([`report::build_report`]).

pub mod constants;
pub mod error;
pub mod expenses;
pub mod fields;
pub mod filter;
pub mod index;
pub mod normalize;
pub mod records;
pub mod report;
pub mod revenue;
pub mod source;

pub use error::LoadError;
pub use expenses::{ExpenseBreakdown, ExpenseCategory};
pub use filter::ReportFilter;
pub use index::ReferenceIndex;
pub use records::{Booking, BookingSource, Manifest, Trip, TripType};
pub use report::{
    GroupKey, ReportTotals, Snapshot, TripGroupRow, TripProductivityReport, build_report,
};
pub use source::{FileSource, RecordSource, Resources, RestSource, load_snapshot};
