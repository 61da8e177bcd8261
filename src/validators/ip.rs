use super::ValidationError;
use ipnetwork::IpNetwork;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

lazy_static! {
    // NOTE: the "ip" feature with `Ipv4Addr::is_global` is still unstable, so we keep our own
    // table of private ranges, taken from the IANA IPv4[0] and IPv6[1] special purpose
    // registries. Shared address space (100.64.0.0/10) is not counted as private, and of
    // 192.0.0.0/24 only the /29 and 192.0.0.170/31 are.
    // [0]: https://www.iana.org/assignments/iana-ipv4-special-registry
    // [1]: https://www.iana.org/assignments/iana-ipv6-special-registry
    static ref PRIVATE_NETWORKS: Vec<IpNetwork> = [
        "0.0.0.0/8",
        "10.0.0.0/8",
        "127.0.0.0/8",
        "169.254.0.0/16",
        "172.16.0.0/12",
        "192.0.0.0/29",
        "192.0.0.170/31",
        "192.0.2.0/24",
        "192.168.0.0/16",
        "198.18.0.0/15",
        "198.51.100.0/24",
        "203.0.113.0/24",
        "240.0.0.0/4",
        "255.255.255.255/32",
        "::/128",
        "::1/128",
        "::ffff:0:0/96",
        "100::/64",
        "2001::/23",
        "2001:db8::/32",
        "fc00::/7",
        "fe80::/10",
    ]
    .iter()
    .map(|net| IpNetwork::from_str(net).unwrap())
    .collect();
}

/// An IPv4 or IPv6 address outside of every private and reserved range.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "IpAddr", into = "IpAddr")]
pub struct PublicIp(IpAddr);

impl PublicIp {
    #[must_use]
    pub fn addr(&self) -> IpAddr {
        self.0
    }
}

impl TryFrom<IpAddr> for PublicIp {
    type Error = ValidationError;

    fn try_from(ip: IpAddr) -> Result<Self, Self::Error> {
        if is_private(ip) {
            return Err(ValidationError::invalid(format!(
                "Only public IP addresses are valid, {ip} is private"
            )));
        }
        Ok(Self(ip))
    }
}

impl From<PublicIp> for IpAddr {
    fn from(ip: PublicIp) -> Self {
        ip.0
    }
}

impl fmt::Display for PublicIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn is_private(ip: IpAddr) -> bool {
    PRIVATE_NETWORKS.iter().any(|net| net.contains(ip))
}

/// Parse `ip` as an IPv4 or IPv6 address and admit it only if it is public.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidInput`] if `ip` doesn't parse, or if it falls in a private
/// or reserved range (RFC 1918, loopback, link-local, unique-local, documentation, ...).
pub fn ip_address(ip: &str) -> Result<PublicIp, ValidationError> {
    let parsed = IpAddr::from_str(ip).map_err(|_| {
        ValidationError::invalid(format!("{ip} does not appear to be an IP address"))
    })?;
    PublicIp::try_from(parsed)
}
