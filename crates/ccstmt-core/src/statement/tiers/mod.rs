//! Evidence tiers, tried in order: tables, then blocks, then the full text.

mod block;
mod global;
mod table;

pub use block::{BlockResolver, SummaryZone, reading_order};
pub use global::GlobalResolver;
pub use table::TableResolver;
