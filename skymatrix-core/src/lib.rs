//! skymatrix-core: bearing resolution and page layout for an LED flight display.
//!
//! No async, no I/O beyond the config file: just the geodesy, feed parsing
//! and layout that the `skymatrix` binary drives.

pub mod bearing;
pub mod compass;
pub mod config;
pub mod feed;
pub mod layout;
pub mod snapshot;
pub mod types;

// Re-export commonly used types at crate root
pub use bearing::{resolve, Resolution, Resolver};
pub use compass::{cardinal_of, CardinalDirection};
pub use feed::{parse_flights, FeedAircraft};
pub use snapshot::{diff, Snapshot};
pub use types::*;
