//! The aggregation engine: pure, total functions over an in-memory deal
//! snapshot. No I/O, no `Result` — absent or malformed fields were already
//! handled by the cleaner and degrade through defined fallback buckets here.

pub mod aggregate;
pub mod range;
pub mod status;

pub use range::DateRange;
pub use status::{Status, normalize_status};
