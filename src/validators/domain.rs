use super::hostname::is_valid_hostname;
use super::ValidationError;
use crate::config::PolicyConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an admitted domain name lives.
///
/// Exactly one of two shapes holds:
///
/// * sub-domain: `label` is the lowercase name the user picked and `zone` is the lowercase
///   [`PolicyConfig::subdomain_host`].
/// * root domain: `label` is `None` and `zone` is the lowercase name the user registered,
///   which becomes the apex of its own zone.
///
/// Values are only built by [`domain_name`], or loaded back from a store that was filled by it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[allow(clippy::module_name_repetitions)]
pub struct DomainClassification {
    label: Option<String>,
    zone: String,
}

impl DomainClassification {
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn zone(&self) -> &str {
        &self.zone
    }

    #[must_use]
    pub fn is_subdomain(&self) -> bool {
        self.label.is_some()
    }

    /// The full name without a trailing dot, e.g. `myapp.example.com`.
    #[must_use]
    pub fn fqdn(&self) -> String {
        match &self.label {
            Some(label) => format!("{label}.{}", self.zone),
            None => self.zone.clone(),
        }
    }
}

impl fmt::Display for DomainClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqdn())
    }
}

/// Classify and admit a user supplied domain name.
///
/// A name without any `.` is a sub-domain request under
/// [`PolicyConfig::subdomain_host`]. Anything dotted, including a bare label with a trailing
/// dot, is a request to register a full domain. One trailing dot is stripped before checking
/// syntax.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInput`] when the name is empty or syntactically invalid,
/// when a sub-domain is shorter than [`PolicyConfig::min_subdomain_length`], when a full domain
/// has no TLD or starts with `www.`, or when the name is blacklisted.
///
/// Returns [`ValidationError::RegistrationClosed`] for an otherwise valid full domain while
/// [`PolicyConfig::fqdn_registration_closed`] is set.
pub fn domain_name(
    name: &str,
    policy: &PolicyConfig,
) -> Result<DomainClassification, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::invalid("You must specify a domain name"));
    }

    // Classification happens on the raw input: "foo." is a (broken) full domain, not "foo".
    let is_subdomain = !name.contains('.');
    let name = name.strip_suffix('.').unwrap_or(name);
    let is_valid = is_valid_hostname(name);

    if is_subdomain {
        subdomain(name, is_valid, policy)
    } else {
        root_domain(name, is_valid, policy)
    }
}

fn subdomain(
    label: &str,
    is_valid: bool,
    policy: &PolicyConfig,
) -> Result<DomainClassification, ValidationError> {
    if !is_valid {
        return Err(ValidationError::invalid(format!(
            "{label} is not a valid sub-domain name."
        )));
    }

    if label.chars().count() < policy.min_subdomain_length {
        return Err(ValidationError::invalid(format!(
            "The subdomain must be at least {} characters long.",
            policy.min_subdomain_length
        )));
    }

    let label = label.to_ascii_lowercase();
    if policy.is_blacklisted(&label) {
        return Err(ValidationError::invalid(format!(
            "The subdomain {label} is not allowed"
        )));
    }

    Ok(DomainClassification {
        label: Some(label),
        zone: policy.subdomain_host.to_ascii_lowercase(),
    })
}

fn root_domain(
    name: &str,
    is_valid: bool,
    policy: &PolicyConfig,
) -> Result<DomainClassification, ValidationError> {
    if !is_valid || !name.contains('.') {
        return Err(ValidationError::invalid(format!(
            "{name} is not a valid domain name"
        )));
    }

    let name = name.to_ascii_lowercase();
    if name.starts_with("www.") {
        return Err(ValidationError::invalid(
            "The domain name should not include the www. label",
        ));
    }

    // Accepting e.g. "co.uk" would hand a whole public suffix to one user. Until there is a
    // public suffix check, full domains are added by administrators.
    if policy.fqdn_registration_closed {
        return Err(ValidationError::RegistrationClosed);
    }

    if policy.is_blacklisted(&name) {
        return Err(ValidationError::invalid(format!(
            "The domain {name} is not allowed"
        )));
    }

    Ok(DomainClassification {
        label: None,
        zone: name,
    })
}
