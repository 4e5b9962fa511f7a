//! Domain Layer
//!
//! Entities, value objects, pure services and the ports the application
//! layer depends on. Nothing here performs I/O.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
