pub mod codec;
pub mod document;

pub use codec::{format_millis, format_seconds, parse_timestamp, TimestampPrecision};
pub use document::{LrcDocument, LrcInfo};
