//! Shared utilities.

mod timestamps;

pub use timestamps::{
    format_iso8601, iso8601, iso8601_opt, now_utc, parse_iso8601, Timestamp,
    TimestampError,
};
