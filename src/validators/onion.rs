use super::ValidationError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    // Legacy (v2) onion services only.
    static ref ONION_V2_RE: Regex = Regex::new(r"^[a-z0-9]{16}\.onion$").unwrap();
}

/// Returns true iff `addr` is exactly 16 lowercase letters or digits followed by `.onion`.
#[must_use]
pub fn is_onion_address(addr: &str) -> bool {
    ONION_V2_RE.is_match(addr)
}

/// A legacy onion service address that passed [`is_onion_address`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct OnionAddress(String);

impl OnionAddress {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OnionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// [`is_onion_address`] for callers that want a [`Result`] like every other validator.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInput`] if `addr` is not a legacy onion address.
pub fn onion_address(addr: &str) -> Result<OnionAddress, ValidationError> {
    if !is_onion_address(addr) {
        return Err(ValidationError::invalid(format!(
            "{addr} is not a valid onion address"
        )));
    }
    Ok(OnionAddress(addr.to_string()))
}
