//! Error types.

use crate::validators::ValidationError;
use trust_dns_proto::error::ProtoError;

/// Error enumerates the possible `OnionGate` error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when user input fails one of the [admission checks][crate::validators]. This
    /// includes [`ValidationError::RegistrationClosed`], which callers may want to present as a
    /// policy message rather than a validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Returned by [`DomainStore::add_domain`][crate::store::DomainStore::add_domain] when the
    /// name is already registered.
    #[error("the domain \"{0}\" is already registered")]
    DomainTaken(String),

    /// Returned by [`DomainStore::add_record`][crate::store::DomainStore::add_record] when the
    /// record names a domain that was never registered.
    #[error("no domain \"{0}\" is registered")]
    UnknownDomain(String),

    /// Returned when an allowed record type has no [zone rendering][crate::zone::rdata_for].
    #[error("{0} records can't be published")]
    UnsupportedRecordType(String),

    /// Returned when a record value doesn't fit its record type, e.g. a private address for an
    /// `A` record or a malformed `MX` value.
    #[error("invalid {record_type} record value \"{value}\": {reason}")]
    InvalidRecordValue {
        record_type: String,
        value: String,
        reason: String,
    },

    /// Returned when a [`Config`][crate::config::Config] loads but describes an unusable setup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when processing JSON from disk (e.g. to
    /// [trying to load a `Config`][crate::config::Config::try_from_file], or to
    /// [trying to load a `FileStore`][crate::store::file::FileStore::try_from_file] fails
    /// due to invalid JSON content.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),

    /// Returned when a name can't be represented as a DNS name.
    #[error("DNS error")]
    DNSError(#[from] ProtoError),

    /// Returned when the zone serial can't be formatted.
    #[error("time formatting failed")]
    TimeFormat(#[from] time::error::Format),
}
