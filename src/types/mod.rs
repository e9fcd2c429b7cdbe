//! Zoho Types
//!
//! Data structures shared across the dispatch layer.

pub mod credentials;
pub mod fields;
pub mod request;

pub use credentials::*;
pub use fields::{parse_json_field, parse_query_pairs};
pub use request::*;
