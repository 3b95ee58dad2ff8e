//! HTTP-facing intake services.
//!
//! - `OrderService`: create orders and announce them everywhere
//! - `LiveDocService`: store courier uploads and announce them to the order room

pub mod live_doc;
pub mod order;
