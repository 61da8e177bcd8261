use crate::error::Error;
use crate::store::{DnsRecord, Domain, DomainStore, ZoneContents};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryStore {
    domains: BTreeMap<String, Domain>,
    records: Vec<DnsRecord>,
}

fn normalize(fqdn: &str) -> String {
    fqdn.strip_suffix('.').unwrap_or(fqdn).to_ascii_lowercase()
}

#[async_trait::async_trait]
impl DomainStore for InMemoryStore {
    async fn add_domain(&mut self, domain: Domain) -> Result<(), Error> {
        let fqdn = domain.fqdn();
        if self.domains.contains_key(&fqdn) {
            return Err(Error::DomainTaken(fqdn));
        }
        self.domains.insert(fqdn, domain);
        Ok(())
    }

    async fn get_domain(&self, fqdn: &str) -> Option<Domain> {
        self.domains.get(&normalize(fqdn)).cloned()
    }

    async fn add_record(&mut self, mut record: DnsRecord) -> Result<(), Error> {
        record.domain = normalize(&record.domain);
        if !self.domains.contains_key(&record.domain) {
            return Err(Error::UnknownDomain(record.domain));
        }
        self.records.push(record);
        Ok(())
    }

    async fn zone_contents(&self, zone: &str) -> ZoneContents {
        let zone = normalize(zone);
        let domains: Vec<Domain> = self
            .domains
            .values()
            .filter(|d| d.zone() == zone)
            .cloned()
            .collect();
        let records = self
            .records
            .iter()
            .filter(|r| domains.iter().any(|d| d.fqdn() == r.domain))
            .cloned()
            .collect();
        ZoneContents { domains, records }
    }
}
