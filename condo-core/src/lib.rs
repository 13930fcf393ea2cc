//! condo-core: shared types for condominium bill extraction and comparison

pub mod bill;
pub mod period;

pub use bill::{ChargeKind, LineItem};
pub use period::{display_period, period_from_date, sort_periods};
