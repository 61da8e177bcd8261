//! A JSON file-backed implementation of the [`DomainStore`][super::DomainStore] trait.
//!
//! Wraps a [`InMemoryStore`][super::memory::InMemoryStore] instance, persisting
//! updates to a JSON file on disk that can be reloaded across restarts.
use crate::error::Error;
use crate::store::memory::InMemoryStore;
use crate::store::{DnsRecord, Domain, DomainStore, ZoneContents};
use std::io::ErrorKind;
use tokio::fs::File;
use tokio::io;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// A file-backed domain store. After each update a JSON file on disk is rewritten with the new
/// data. This file can be reloaded across restarts to avoid losing state.
///
/// Wraps a [`InMemoryStore`][super::memory::InMemoryStore], operating the same way except
/// for maintaining state beyond in-memory.
#[derive(Default, Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct FileStore {
    store: InMemoryStore,
    path: String,
}

impl FileStore {
    /// Save the state of the store as JSON to the store's configured path, or return an Error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidJSON`] if the store can't be serialized to JSON.
    ///
    /// Returns [`Error::IO`] if the serialized state can't be written to the backing file path.
    pub async fn save(&self) -> Result<(), Error> {
        let data = serde_json::to_string_pretty(&self.store)?;
        let mut output_file = File::create(&self.path).await?;
        output_file.write_all(data.as_bytes()).await?;
        output_file.flush().await?;
        Ok(())
    }

    /// Load a [`FileStore`] from the JSON state located at the given path, or return an Error.
    /// A missing file is created holding an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidJSON`] if the JSON state file is invalid.
    ///
    /// Returns [`Error::IO`] if the path can't be opened, created or read.
    pub async fn try_from_file(p: &str) -> Result<Self, Error> {
        let contents = match File::open(p).await {
            Ok(mut f) => {
                let mut buf = vec![];
                f.read_to_end(&mut buf).await?;
                buf
            }
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    tracing::info!("creating empty domain store at {p}");
                    Self::write_empty_state(File::create(&p).await?).await?
                }
                _ => return Err(Error::IO(err)),
            },
        };

        let store: InMemoryStore = serde_json::from_slice(&contents)?;
        Ok(Self {
            path: p.to_string(),
            store,
        })
    }

    async fn write_empty_state(mut f: File) -> io::Result<Vec<u8>> {
        let default_data = serde_json::to_string_pretty(&InMemoryStore::default())?;
        let default_bytes = default_data.as_bytes();
        f.write_all(default_bytes).await?;
        f.flush().await?;
        Ok(default_bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl DomainStore for FileStore {
    async fn add_domain(&mut self, domain: Domain) -> Result<(), Error> {
        self.store.add_domain(domain).await?;
        self.save().await
    }

    async fn get_domain(&self, fqdn: &str) -> Option<Domain> {
        self.store.get_domain(fqdn).await
    }

    async fn add_record(&mut self, record: DnsRecord) -> Result<(), Error> {
        self.store.add_record(record).await?;
        self.save().await
    }

    async fn zone_contents(&self, zone: &str) -> ZoneContents {
        self.store.zone_contents(zone).await
    }
}
