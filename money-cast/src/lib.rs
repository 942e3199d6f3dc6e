//! # Money Cast
//!
//! Attribute casting between stored columns and exact money values.
//!
//! ## Architecture
//!
//! - `caster/` - Pure cast adapter (parse on read and assignment, format on write)
//! - `model/` - A record instance holding plain attributes and money values
//! - `service/` - Persistence orchestration over a `RecordStore` port
//!
//! The service is generic over `R: RecordStore`, allowing different storage
//! adapters to be injected.

pub mod caster;
pub mod model;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use caster::MoneyCaster;
pub use model::Model;
pub use service::CastService;
