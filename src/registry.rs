//! The registration path: admit user input with [`crate::validators`] and persist the result.

use crate::config::PolicyConfig;
use crate::error::Error;
use crate::store::{DnsRecord, Domain, DomainStore};
use crate::validators::{allowed_dns_record_type, domain_name, onion_address, AllowedRecordType};
use crate::zone;

/// Admit `name` for the onion service at `onion` and store it.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the name or onion address is refused, and
/// [`Error::DomainTaken`] if the name is already registered, plus any store error.
pub async fn register_domain<S>(
    policy: &PolicyConfig,
    store: &mut S,
    name: &str,
    onion: &str,
) -> Result<Domain, Error>
where
    S: DomainStore + Send + Sync + ?Sized,
{
    let domain = match admit_domain(policy, name, onion) {
        Ok(domain) => domain,
        Err(err) => {
            tracing::debug!("rejected registration of \"{name}\": {err}");
            return Err(err);
        }
    };

    store.add_domain(domain.clone()).await?;
    tracing::info!(
        "registered \"{}\" for {}",
        domain.fqdn(),
        domain.onion_address
    );
    Ok(domain)
}

fn admit_domain(policy: &PolicyConfig, name: &str, onion: &str) -> Result<Domain, Error> {
    Ok(Domain {
        name: domain_name(name, policy)?,
        onion_address: onion_address(onion)?,
    })
}

/// Add a custom record to the registered domain `fqdn`.
///
/// # Errors
///
/// Returns [`Error::Validation`] for a record type that isn't allowed, the
/// [`zone::rdata_for`] errors for a value that doesn't fit the type,
/// [`Error::InvalidRecordValue`] for `CNAME` and `NS` records, which can't share the domain's
/// name with its proxy and onion records, and
/// [`Error::UnknownDomain`] if `fqdn` isn't registered.
pub async fn add_record<S>(
    policy: &PolicyConfig,
    store: &mut S,
    fqdn: &str,
    record_type: &str,
    value: &str,
) -> Result<DnsRecord, Error>
where
    S: DomainStore + Send + Sync + ?Sized,
{
    let record_type = match allowed_dns_record_type(record_type, policy) {
        Ok(record_type) => record_type,
        Err(err) => {
            tracing::debug!("rejected record for \"{fqdn}\": {err}");
            return Err(err.into());
        }
    };
    if let Err(err) = check_record(&record_type, value) {
        tracing::debug!("rejected {record_type} record for \"{fqdn}\": {err}");
        return Err(err);
    }

    let record = DnsRecord {
        domain: fqdn.to_string(),
        record_type,
        value: value.to_string(),
    };
    store.add_record(record.clone()).await?;
    tracing::info!("added {} record for \"{fqdn}\"", record.record_type);
    Ok(record)
}

// Custom records share their owner name with the proxy A/AAAA and onion TXT records, which a
// CNAME (RFC 1034 section 3.6.2) or a delegating NS record can't coexist with.
const EXCLUSIVE_TYPES: [&str; 2] = ["CNAME", "NS"];

fn check_record(record_type: &AllowedRecordType, value: &str) -> Result<(), Error> {
    if EXCLUSIVE_TYPES.contains(&record_type.as_str()) {
        return Err(Error::InvalidRecordValue {
            record_type: record_type.to_string(),
            value: value.to_string(),
            reason: "can't be published next to the domain's proxy and onion records"
                .to_string(),
        });
    }
    zone::rdata_for(record_type, value).map(|_| ())
}
