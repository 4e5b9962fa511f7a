//! Adapters Layer
//!
//! Inbound adapters drive the application (HTTP API); outbound adapters
//! implement the domain ports (lookup client, geolocation, stores).

pub mod inbound;
pub mod outbound;
