//! Registered domain and record storage.
//!
//! A store keeps every admitted [`Domain`] keyed by its fully qualified name, plus the custom
//! [`DnsRecord`]s users attach to them. The [zone renderer][crate::zone] reads a zone's worth of
//! both back out through [`DomainStore::zone_contents`].
//!
//! Two implementations are provided, [`memory::InMemoryStore`] and [`file::FileStore`]. The
//! former is not durable across restarts. The latter will write its state to disk for each
//! update and load this state again on startup.

use crate::error::Error;
use crate::validators::{AllowedRecordType, DomainClassification, OnionAddress};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod file;
pub mod memory;

#[allow(clippy::module_name_repetitions)]
pub use file::FileStore;
#[allow(clippy::module_name_repetitions)]
pub use memory::InMemoryStore;

/// `DynStore` is a type alias for a [`DomainStore`] that can be used by multiple read/write
/// consumers that coordinate through an [`Arc`] and a [`RwLock`] wrapping the [`DomainStore`].
#[allow(clippy::module_name_repetitions)]
pub type DynStore = Arc<RwLock<dyn DomainStore + Send + Sync>>;

/// A registered domain and the onion service it fronts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub name: DomainClassification,
    pub onion_address: OnionAddress,
}

impl Domain {
    #[must_use]
    pub fn fqdn(&self) -> String {
        self.name.fqdn()
    }

    #[must_use]
    pub fn zone(&self) -> &str {
        self.name.zone()
    }
}

/// A user supplied record published at a registered domain's name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// The owning domain's fully qualified name, lowercase and without a trailing dot.
    pub domain: String,
    pub record_type: AllowedRecordType,
    pub value: String,
}

/// Everything published in one zone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneContents {
    pub domains: Vec<Domain>,
    pub records: Vec<DnsRecord>,
}

impl ZoneContents {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.records.is_empty()
    }
}

/// An async trait describing storage of admitted domains and their records.
#[async_trait::async_trait]
pub trait DomainStore {
    /// Add a newly admitted domain.
    async fn add_domain(&mut self, domain: Domain) -> Result<(), Error>;

    /// Get the domain registered under the given fully qualified name (if any).
    async fn get_domain(&self, fqdn: &str) -> Option<Domain>;

    /// Add a record to an already registered domain.
    async fn add_record(&mut self, record: DnsRecord) -> Result<(), Error>;

    /// Get every domain and record published in `zone`.
    async fn zone_contents(&self, zone: &str) -> ZoneContents;
}
