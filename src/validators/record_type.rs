use super::ValidationError;
use crate::config::PolicyConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trimmed, upper-cased DNS record type that is in
/// [`PolicyConfig::allowed_dns_record_types`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AllowedRecordType(String);

impl AllowedRecordType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AllowedRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize `record_type` and check that it is enabled.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInput`] listing the allowed types if the normalized value
/// isn't one of them.
pub fn allowed_dns_record_type(
    record_type: &str,
    policy: &PolicyConfig,
) -> Result<AllowedRecordType, ValidationError> {
    let record_type = record_type.trim().to_ascii_uppercase();
    if !policy.is_allowed_record_type(&record_type) {
        let allowed: Vec<String> = policy
            .allowed_dns_record_types
            .iter()
            .map(|t| t.to_ascii_uppercase())
            .collect();
        return Err(ValidationError::invalid(format!(
            "{record_type} is not an allowed DNS record type. Only types {} are allowed",
            allowed.join(", ")
        )));
    }
    Ok(AllowedRecordType(record_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashSet};

    fn policy() -> PolicyConfig {
        PolicyConfig {
            min_subdomain_length: 3,
            domain_blacklist: HashSet::default(),
            subdomain_host: "example.com".to_string(),
            fqdn_registration_closed: false,
            allowed_dns_record_types: BTreeSet::from([
                "CNAME".to_string(),
                "A".to_string(),
                "AAAA".to_string(),
            ]),
        }
    }

    #[test]
    fn normalizes() {
        assert_eq!(allowed_dns_record_type(" a ", &policy()).unwrap().as_str(), "A");
        assert_eq!(
            allowed_dns_record_type("cname\n", &policy()).unwrap().to_string(),
            "CNAME"
        );
    }

    #[test]
    fn lists_allowed_types() {
        assert_eq!(
            allowed_dns_record_type("FOO", &policy()),
            Err(ValidationError::InvalidInput(
                "FOO is not an allowed DNS record type. Only types A, AAAA, CNAME are allowed"
                    .to_string()
            ))
        );
    }

    #[test]
    fn configured_lowercase_types() {
        let mut p = policy();
        p.allowed_dns_record_types.insert("txt".to_string());
        assert_eq!(allowed_dns_record_type("TXT", &p).unwrap().as_str(), "TXT");
    }

    #[test]
    fn empty_input() {
        assert!(allowed_dns_record_type("  ", &policy()).is_err());
    }
}
