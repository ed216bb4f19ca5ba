//! Response decoder module
//!
//! Turns a raw `ApiResponse` into a tagged `Decoded` value without side
//! effects. The page fetcher acts on the result.
//!
//! # Overview
//!
//! - `Decoded::Page` - usable data, possibly with advisory errors
//! - `Decoded::Empty` - `meta.result_count` is zero
//! - `Decoded::Unreachable` - not-found, suspended or protected subject
//! - `Decoded::TransientFault` - bad status or unexpected payload shape

mod classify;
mod types;

pub use classify::decode_response;
pub use types::{ApiProblem, Condition, Decoded, Page};
