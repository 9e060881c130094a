//! Region module
//!
//! This module turns human-readable region names into forecast region codes:
//! - Boundary document loading and parsing into a scoped index
//! - Exact-match resolution of (prefecture, city) pairs
//! - The validated region code type

pub mod boundary;
pub mod code;
pub mod resolver;

pub use boundary::{BoundaryIndex, BoundaryLoader, CityCodes};
pub use code::RegionCode;
pub use resolver::resolve_city_id;
