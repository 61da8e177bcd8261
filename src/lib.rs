//! `OnionGate`
//!
//! Lets users claim a sub-domain of a shared host (or, when the administrators allow it, a full
//! domain of their own) for an onion service, and publishes the result as BIND style zone data
//! pointing at a fleet of public proxies.
//!
//! The heart of the crate is [`validators`]: the admission policy every name, address and
//! record type passes before anything is stored. [`registry`] runs those checks and persists
//! admitted input through a [`store`], and [`zone`] renders a zone's contents for a DNS server.
//!
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod registry;
pub mod store;
pub mod validators;
pub mod zone;

pub use config::{Config, PolicyConfig, SharedConfig};
pub use error::Error;
pub use store::{DynStore, FileStore, InMemoryStore};
pub use validators::{DomainClassification, ValidationError};
