//! BIND style zone file output.
//!
//! A zone is rendered from the static [Config][`crate::config::Config`] and the
//! [`ZoneContents`] of a [`DomainStore`][crate::store::DomainStore]:
//!
//! * an `SOA` record for the zone apex built from
//!   [`Config::ns_domain`][`crate::config::Config::ns_domain`] and
//!   [`Config::ns_admin`][`crate::config::Config::ns_admin`],
//! * one `NS` record per [`Config::ns_records`][`crate::config::Config::ns_records`] entry,
//! * for every registered domain, an `A` or `AAAA` record per
//!   [`Config::proxy_addrs`][`crate::config::Config::proxy_addrs`] entry and a `TXT` record
//!   naming the onion service the proxies should forward to,
//! * the custom records users added.
//!
//! E.g. for the sub-domain `myapp` under `example.com`:
//!
//! ```text
//! $ORIGIN example.com.
//! $TTL 3600
//! example.com.	3600	IN	SOA	ns1.example.com. admin.example.com. 20230312 86400 7200 3600000 172800
//! example.com.	3600	IN	NS	ns1.example.com.
//! myapp.example.com.	3600	IN	A	93.184.216.34
//! myapp.example.com.	3600	IN	TXT	"onion=abcdefghij123456.onion"
//! ```

use crate::config::Config;
use crate::error::Error;
use crate::store::ZoneContents;
use crate::validators::{ip_address, is_valid_hostname, AllowedRecordType};
use std::fmt::Write;
use std::net::IpAddr;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use trust_dns_client::rr::{Name, RData};
use trust_dns_proto::rr::rdata::{MX, SOA, TXT};

const PUBLISHABLE_TYPES: [&str; 6] = ["A", "AAAA", "CNAME", "MX", "NS", "TXT"];
const MAX_TXT_LEN: usize = 255;

const SERIAL_FORMAT: &[FormatItem<'_>] = format_description!("[year][month][day]");

/// Returns true if records of `record_type` can be rendered by [`rdata_for`].
#[must_use]
pub fn can_publish(record_type: &str) -> bool {
    PUBLISHABLE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(record_type))
}

/// Parse a user supplied record value for `record_type`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedRecordType`] for a type [`can_publish`] rejects, and
/// [`Error::InvalidRecordValue`] when the value doesn't fit the type: `A`/`AAAA` need a public
/// address of the right family, `CNAME`/`NS` a hostname, `MX` a `"<preference> <hostname>"`
/// pair, and `TXT` between 1 and 255 bytes without control characters.
pub fn rdata_for(record_type: &AllowedRecordType, value: &str) -> Result<RData, Error> {
    let invalid = |reason: &str| Error::InvalidRecordValue {
        record_type: record_type.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    match record_type.as_str() {
        "A" | "AAAA" => {
            let ip = ip_address(value).map_err(|err| invalid(&err.to_string()))?;
            match (record_type.as_str(), ip.addr()) {
                ("A", IpAddr::V4(v4)) => Ok(RData::A(v4)),
                ("AAAA", IpAddr::V6(v6)) => Ok(RData::AAAA(v6)),
                ("A", _) => Err(invalid("expected an IPv4 address")),
                _ => Err(invalid("expected an IPv6 address")),
            }
        }
        "CNAME" => Ok(RData::CNAME(
            target_name(value).ok_or_else(|| invalid("not a valid hostname"))?,
        )),
        "NS" => Ok(RData::NS(
            target_name(value).ok_or_else(|| invalid("not a valid hostname"))?,
        )),
        "MX" => {
            let mut parts = value.split_whitespace();
            let (Some(preference), Some(exchange), None) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(invalid("expected \"<preference> <hostname>\""));
            };
            let preference: u16 = preference
                .parse()
                .map_err(|_| invalid("preference must be a number from 0 to 65535"))?;
            let exchange = target_name(exchange).ok_or_else(|| invalid("not a valid hostname"))?;
            Ok(RData::MX(MX::new(preference, exchange)))
        }
        "TXT" => {
            if value.is_empty() || value.len() > MAX_TXT_LEN {
                return Err(invalid("TXT values must be 1 to 255 bytes long"));
            }
            if value.chars().any(char::is_control) {
                return Err(invalid("TXT values must not contain control characters"));
            }
            Ok(RData::TXT(TXT::new(vec![value.to_string()])))
        }
        other => Err(Error::UnsupportedRecordType(other.to_string())),
    }
}

/// A `YYYYMMDD` zone serial for the given instant.
///
/// # Errors
///
/// Returns [`Error::TimeFormat`] if the date can't be formatted.
pub fn zone_serial(now: OffsetDateTime) -> Result<u32, Error> {
    let serial = now.format(SERIAL_FORMAT)?;
    serial
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("zone serial {serial} is out of range")))
}

/// Render the zone file for `zone`.
///
/// # Errors
///
/// Returns [`Error::DNSError`] if a configured or stored name isn't a valid DNS name,
/// [`Error::Validation`] if a proxy address isn't public, and the [`rdata_for`] errors for
/// stored records that no longer parse.
pub fn render_zone(
    config: &Config,
    zone: &str,
    contents: &ZoneContents,
    serial: u32,
) -> Result<String, Error> {
    let origin = absolute(zone.strip_suffix('.').unwrap_or(zone))?;
    let ttl = u32::try_from(config.record_ttl.as_secs()).unwrap_or(u32::MAX);
    let mut entries: Vec<(Name, RData)> = Vec::new();

    // See RIPE 203[0] for recommended values.
    // [0]: https://www.ripe.net/publications/docs/ripe-203
    let mut ns_admin = config.ns_admin()?;
    ns_admin.set_fqdn(true);
    let soa = SOA::new(
        to_absolute(config.ns_domain.clone().into()),
        ns_admin,
        serial,
        86_400,    // 24 hrs.
        7_200,     // 2 hours.
        3_600_000, // 1000 hours.
        172_800,   // 2 days.
    );
    entries.push((origin.clone(), RData::SOA(soa)));
    for ns in &config.ns_records {
        entries.push((origin.clone(), RData::NS(to_absolute(ns.clone().into()))));
    }

    let proxies = config.proxies()?;
    for domain in &contents.domains {
        let name = absolute(&domain.fqdn())?;
        for proxy in &proxies {
            let rdata = match proxy.addr() {
                IpAddr::V4(v4) => RData::A(v4),
                IpAddr::V6(v6) => RData::AAAA(v6),
            };
            entries.push((name.clone(), rdata));
        }
        let onion = format!("onion={}", domain.onion_address);
        entries.push((name, RData::TXT(TXT::new(vec![onion]))));
    }

    for record in &contents.records {
        let name = absolute(&record.domain)?;
        entries.push((name, rdata_for(&record.record_type, &record.value)?));
    }

    let mut out = String::new();
    // NB: writing to a String can't fail.
    let _ = writeln!(out, "$ORIGIN {origin}");
    let _ = writeln!(out, "$TTL {ttl}");
    for (name, rdata) in &entries {
        let _ = writeln!(
            out,
            "{name}\t{ttl}\tIN\t{}\t{}",
            rdata.to_record_type(),
            rdata_text(rdata)
        );
    }
    Ok(out)
}

fn target_name(value: &str) -> Option<Name> {
    let host = value.strip_suffix('.').unwrap_or(value);
    if !is_valid_hostname(host) {
        return None;
    }
    absolute(host).ok()
}

fn absolute(name: &str) -> Result<Name, Error> {
    Ok(to_absolute(Name::from_ascii(name)?))
}

fn to_absolute(mut name: Name) -> Name {
    name.set_fqdn(true);
    name
}

/// Quote a TXT character-string, escaping anything outside printable ASCII as `\DDD` so a
/// record always stays on its own line.
fn quote_txt(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &b in bytes {
        match b {
            b'"' | b'\\' => {
                out.push('\\');
                out.push(char::from(b));
            }
            0x20..=0x7e => out.push(char::from(b)),
            _ => {
                let _ = write!(out, "\\{b:03}");
            }
        }
    }
    out.push('"');
    out
}

fn rdata_text(rdata: &RData) -> String {
    match rdata {
        RData::TXT(txt) => txt
            .txt_data()
            .iter()
            .map(|s| quote_txt(s))
            .collect::<Vec<_>>()
            .join(" "),
        RData::SOA(soa) => format!(
            "{} {} {} {} {} {} {}",
            soa.mname(),
            soa.rname(),
            soa.serial(),
            soa.refresh(),
            soa.retry(),
            soa.expire(),
            soa.minimum()
        ),
        RData::MX(mx) => format!("{} {}", mx.preference(), mx.exchange()),
        RData::A(v4) => v4.to_string(),
        RData::AAAA(v6) => v6.to_string(),
        RData::CNAME(name) | RData::NS(name) => name.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyConfig;
    use crate::store::{DnsRecord, Domain};
    use crate::validators::{allowed_dns_record_type, domain_name, onion_address};
    use std::collections::{BTreeSet, HashSet};
    use std::str::FromStr;
    use std::time::Duration;
    use time::macros::datetime;
    use trust_dns_client::rr::LowerName;

    fn policy() -> PolicyConfig {
        PolicyConfig {
            min_subdomain_length: 3,
            domain_blacklist: HashSet::default(),
            subdomain_host: "example.com".to_string(),
            fqdn_registration_closed: false,
            allowed_dns_record_types: ["A", "AAAA", "CNAME", "MX", "NS", "TXT", "SRV"]
                .iter()
                .map(ToString::to_string)
                .collect::<BTreeSet<_>>(),
        }
    }

    fn config() -> Config {
        Config {
            policy: policy(),
            store_path: None,
            ns_domain: LowerName::from(Name::from_str("ns1.example.com").unwrap()),
            ns_admin: "admin@example.com".to_string(),
            ns_records: vec![LowerName::from(Name::from_str("ns1.example.com").unwrap())],
            proxy_addrs: vec![
                IpAddr::from_str("93.184.216.34").unwrap(),
                IpAddr::from_str("2606:2800:220:1:248:1893:25c8:1946").unwrap(),
            ],
            record_ttl: Duration::from_secs(600),
        }
    }

    fn rtype(t: &str) -> AllowedRecordType {
        allowed_dns_record_type(t, &policy()).unwrap()
    }

    fn invalid_value(res: Result<RData, Error>) -> String {
        match res {
            Err(Error::InvalidRecordValue { reason, .. }) => reason,
            other => panic!("expected InvalidRecordValue, got {other:?}"),
        }
    }

    #[test]
    fn publishable() {
        assert!(can_publish("A"));
        assert!(can_publish("txt"));
        assert!(!can_publish("SRV"));
        assert!(!can_publish("SOA"));
    }

    #[test]
    fn address_records() {
        assert!(matches!(rdata_for(&rtype("A"), "8.8.8.8"), Ok(RData::A(_))));
        assert!(matches!(
            rdata_for(&rtype("AAAA"), "2606:4700:4700::1111"),
            Ok(RData::AAAA(_))
        ));
        assert!(invalid_value(rdata_for(&rtype("A"), "10.0.0.1")).contains("public"));
        assert!(invalid_value(rdata_for(&rtype("A"), "2606:4700:4700::1111")).contains("IPv4"));
        assert!(invalid_value(rdata_for(&rtype("AAAA"), "8.8.8.8")).contains("IPv6"));
    }

    #[test]
    fn name_records() {
        assert!(matches!(
            rdata_for(&rtype("CNAME"), "target.example.org."),
            Ok(RData::CNAME(name)) if name.to_string() == "target.example.org."
        ));
        assert!(matches!(
            rdata_for(&rtype("NS"), "ns2.example.org"),
            Ok(RData::NS(name)) if name.is_fqdn()
        ));
        invalid_value(rdata_for(&rtype("CNAME"), "192.168.1.1"));
        invalid_value(rdata_for(&rtype("NS"), "bad_host.example.org"));
    }

    #[test]
    fn mx_records() {
        assert!(matches!(
            rdata_for(&rtype("MX"), "10 mail.example.org"),
            Ok(RData::MX(mx)) if mx.preference() == 10
        ));
        assert!(invalid_value(rdata_for(&rtype("MX"), "mail.example.org")).contains("preference"));
        invalid_value(rdata_for(&rtype("MX"), "ten mail.example.org"));
        invalid_value(rdata_for(&rtype("MX"), "10 mail.example.org extra"));
    }

    #[test]
    fn txt_records() {
        assert!(matches!(rdata_for(&rtype("TXT"), "hello"), Ok(RData::TXT(_))));
        invalid_value(rdata_for(&rtype("TXT"), ""));
        invalid_value(rdata_for(&rtype("TXT"), &"a".repeat(256)));
    }

    #[test]
    fn txt_rejects_control_characters() {
        for value in ["x\nevil", "x\revil", "tab\there", "nul\0", "bell\u{7}"] {
            assert!(
                invalid_value(rdata_for(&rtype("TXT"), value)).contains("control characters"),
                "{value:?}"
            );
        }
    }

    #[test]
    fn txt_quoting() {
        assert_eq!(quote_txt(b"plain text"), "\"plain text\"");
        assert_eq!(quote_txt(b"a\\b\"c"), "\"a\\\\b\\\"c\"");
        assert_eq!(quote_txt("café".as_bytes()), "\"caf\\195\\169\"");
        assert_eq!(quote_txt(b"x\ny;"), "\"x\\010y;\"");
    }

    #[test]
    fn stored_txt_stays_on_one_line() {
        let domain = Domain {
            name: domain_name("myapp", &policy()).unwrap(),
            onion_address: onion_address("abcdefghij123456.onion").unwrap(),
        };
        let contents = ZoneContents {
            domains: vec![domain],
            records: vec![DnsRecord {
                domain: "myapp.example.com".to_string(),
                record_type: rtype("TXT"),
                value: "héllo".to_string(),
            }],
        };
        let zone = render_zone(&config(), "example.com", &contents, 1).unwrap();
        assert_eq!(zone.lines().count(), 8);
        assert!(zone.ends_with("myapp.example.com.\t600\tIN\tTXT\t\"h\\195\\169llo\"\n"));
    }

    #[test]
    fn unsupported_type() {
        assert!(matches!(
            rdata_for(&rtype("SRV"), "0 5 5060 sip.example.org"),
            Err(Error::UnsupportedRecordType(t)) if t == "SRV"
        ));
    }

    #[test]
    fn serial() {
        assert_eq!(zone_serial(datetime!(2023-03-12 10:00 UTC)).unwrap(), 20_230_312);
    }

    #[test]
    fn renders_zone() {
        let domain = Domain {
            name: domain_name("myapp", &policy()).unwrap(),
            onion_address: onion_address("abcdefghij123456.onion").unwrap(),
        };
        let contents = ZoneContents {
            domains: vec![domain],
            records: vec![DnsRecord {
                domain: "myapp.example.com".to_string(),
                record_type: rtype("TXT"),
                value: "say \"hi\"".to_string(),
            }],
        };
        let zone = render_zone(&config(), "example.com", &contents, 20_230_312).unwrap();
        let lines: Vec<&str> = zone.lines().collect();

        assert_eq!(lines[0], "$ORIGIN example.com.");
        assert_eq!(lines[1], "$TTL 600");
        assert_eq!(
            lines[2],
            "example.com.\t600\tIN\tSOA\tns1.example.com. admin.example.com. 20230312 86400 7200 3600000 172800"
        );
        assert_eq!(lines[3], "example.com.\t600\tIN\tNS\tns1.example.com.");
        assert_eq!(lines[4], "myapp.example.com.\t600\tIN\tA\t93.184.216.34");
        assert_eq!(
            lines[5],
            "myapp.example.com.\t600\tIN\tAAAA\t2606:2800:220:1:248:1893:25c8:1946"
        );
        assert_eq!(
            lines[6],
            "myapp.example.com.\t600\tIN\tTXT\t\"onion=abcdefghij123456.onion\""
        );
        assert_eq!(lines[7], "myapp.example.com.\t600\tIN\tTXT\t\"say \\\"hi\\\"\"");
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn renders_empty_zone() {
        let zone = render_zone(&config(), "example.com.", &ZoneContents::default(), 1).unwrap();
        assert_eq!(zone.lines().count(), 4);
    }
}
