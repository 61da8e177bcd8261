use crate::error::Error;
use crate::store::{DynStore, FileStore, InMemoryStore};
use crate::validators::{is_valid_hostname, PublicIp};
use crate::zone;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::net::IpAddr;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use trust_dns_client::rr::{LowerName, Name};

/// A [`Config`] snapshot shared between tasks. Reloading means building a new `Config` and
/// swapping the [`Arc`], never mutating one in place.
pub type SharedConfig = Arc<Config>;

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub policy: PolicyConfig,
    pub store_path: Option<String>,
    pub ns_domain: LowerName,
    pub ns_admin: String,
    #[serde(default)]
    pub ns_records: Vec<LowerName>,
    #[serde(default)]
    pub proxy_addrs: Vec<IpAddr>,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_record_ttl")]
    pub record_ttl: Duration,
}

/// The admission policy consumed by [`crate::validators`].
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct PolicyConfig {
    /// Sub-domains shorter than this are refused so that names like `www` or `mail` can't be
    /// claimed.
    pub min_subdomain_length: usize,
    /// Names refused in both the sub-domain and full domain branch. Sub-domain requests are
    /// matched by bare label, full domains by the whole dotted name.
    #[serde(default)]
    pub domain_blacklist: HashSet<String>,
    /// The zone sub-domains are created under.
    pub subdomain_host: String,
    #[serde(default)]
    pub fqdn_registration_closed: bool,
    pub allowed_dns_record_types: BTreeSet<String>,
}

fn default_record_ttl() -> Duration {
    Duration::from_secs(3600)
}

impl PolicyConfig {
    #[must_use]
    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.domain_blacklist
            .iter()
            .any(|blocked| blocked.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn is_allowed_record_type(&self, record_type: &str) -> bool {
        self.allowed_dns_record_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(record_type))
    }
}

impl Config {
    /// Load and check a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] or [`Error::InvalidJSON`] if the file can't be read or parsed,
    /// [`Error::InvalidConfig`] if the policy names an invalid sub-domain host or a record type
    /// that can't be published, and [`Error::Validation`] if a proxy address isn't public.
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        conf.check()?;
        Ok(conf)
    }

    /// Open the configured domain store: file backed if [`Config::store_path`] is set,
    /// in-memory otherwise.
    ///
    /// # Errors
    ///
    /// Returns the [`FileStore::try_from_file`] errors.
    pub async fn store(&self) -> Result<DynStore, Error> {
        let store: DynStore = match &self.store_path {
            Some(path) => Arc::new(RwLock::new(FileStore::try_from_file(path).await?)),
            None => Arc::new(RwLock::new(InMemoryStore::default())),
        };
        Ok(store)
    }

    /// Proxy addresses as checked public IPs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for the first private address.
    pub fn proxies(&self) -> Result<Vec<PublicIp>, Error> {
        Ok(self
            .proxy_addrs
            .iter()
            .map(|ip| PublicIp::try_from(*ip))
            .collect::<Result<_, _>>()?)
    }

    /// The SOA `RNAME` for [`Config::ns_admin`], with an email style `user@domain` rewritten to
    /// the `user.domain` mailbox form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DNSError`] if the result isn't a valid DNS name.
    pub fn ns_admin(&self) -> Result<Name, Error> {
        Ok(Name::from_str(&self.sanitized_ns_admin())?)
    }

    fn sanitized_ns_admin(&self) -> Cow<str> {
        match self.ns_admin.split_once('@') {
            Some((user, domain)) => {
                let user = user.replace('.', "\\.");
                Cow::Owned(format!("{user}.{domain}"))
            }
            _ => Cow::Borrowed(&self.ns_admin),
        }
    }

    fn check(&self) -> Result<(), Error> {
        let host = &self.policy.subdomain_host;
        if !is_valid_hostname(host.strip_suffix('.').unwrap_or(host)) {
            return Err(Error::InvalidConfig(format!(
                "subdomain_host \"{host}\" is not a valid hostname"
            )));
        }
        if let Some(unpublishable) = self
            .policy
            .allowed_dns_record_types
            .iter()
            .find(|t| !zone::can_publish(t))
        {
            return Err(Error::InvalidConfig(format!(
                "allowed_dns_record_types contains {unpublishable}, which can't be published"
            )));
        }
        self.proxies()?;
        Ok(())
    }
}
