//! Application Layer
//!
//! Use cases that orchestrate domain services and ports.

mod district_resolver;

pub use district_resolver::{
    DistrictResolver, ResolverConfig, ResolverError, ResolverSnapshot,
};
