//! pokequiz-catalog — Remote Pokémon catalog.
//!
//! Implements the `Catalog` trait over the Tyradex HTTP API with an
//! in-memory cache and a built-in fallback list, plus a connectivity
//! monitor used to decide whether the network is worth trying.

pub mod client;
pub mod error;
pub mod fallback;
pub mod mock;
pub mod network;

pub use client::RemoteCatalog;
pub use error::CatalogError;
pub use network::{NetworkMonitor, NetworkStatus};
