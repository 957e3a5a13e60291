pub mod driving_event;
pub mod ferry_crossing;
pub mod import;
pub mod trip_row;

pub use driving_event::DrivingEvent;
pub use ferry_crossing::FerryCrossing;
pub use import::{ImportRequest, ImportSummary, ListParams};
pub use trip_row::TripRow;

/// Behaviour shared by the three tachograph record kinds.
pub trait Record: Clone + Send + Sync + 'static {
    /// Singular name used in messages, e.g. "event".
    const KIND: &'static str;
    /// Plural name used in import summaries, e.g. "events".
    const KIND_PLURAL: &'static str;

    fn record_id(&self) -> String;

    /// Results are sorted on this key, largest first.
    type OrderKey: Ord;

    fn order_key(&self) -> Self::OrderKey;
}
