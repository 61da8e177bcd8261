//! Admission checks for user supplied names and record data.
//!
//! Every function in this module is pure: the result depends only on the input and the
//! [`PolicyConfig`][crate::config::PolicyConfig] snapshot handed in by the caller. Nothing here
//! logs, writes, or retries. Callers decide how to surface a [`ValidationError`].
//!
//! * [`domain_name`] classifies a submitted name as a sub-domain of
//!   [`PolicyConfig::subdomain_host`][crate::config::PolicyConfig::subdomain_host] or as the
//!   apex of its own zone, applying the platform policy for each shape.
//! * [`is_valid_label`] and [`is_valid_hostname`] are the syntax checks shared by the
//!   classifier and the record value checks.
//! * [`ip_address`] only admits public IPv4/IPv6 addresses.
//! * [`is_onion_address`] / [`onion_address`] match legacy 16 character onion addresses.
//! * [`allowed_dns_record_type`] normalizes a record type and checks it against the
//!   configured allow list.

mod domain;
mod hostname;
mod ip;
mod onion;
mod record_type;

pub use domain::{domain_name, DomainClassification};
pub use hostname::{is_valid_hostname, is_valid_label};
pub use ip::{ip_address, PublicIp};
pub use onion::{is_onion_address, onion_address, OnionAddress};
pub use record_type::{allowed_dns_record_type, AllowedRecordType};

/// The two ways an admission check can fail.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum ValidationError {
    /// The value breaks the syntax or policy rules of its own field. The message names the
    /// offending value and, where there is one, the configured threshold or allow list.
    #[error("{0}")]
    InvalidInput(String),

    /// Full domain registration is administratively disabled. The submitted value may be
    /// perfectly valid.
    #[error(
        "It is not possible to register a full domain at the present time. \
         Please choose a sub-domain or contact the administrators"
    )]
    RegistrationClosed,
}

impl ValidationError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}
