//! Ordered banner-matching rules.
//!
//! The rules form a priority list: they are tried top to bottom and the first
//! match wins, so a banner mentioning both FTP and HTTP is FTP.

use super::banner::decode_banner;
use super::identity::{ServiceIdentity, ServiceKind};

/// MySQL authentication plugin names seen in server greetings.
const MYSQL_AUTH_PLUGINS: [&str; 3] = [
    "mysql_native_password",
    "caching_sha2_password",
    "sha256_password",
];

/// Telnet option negotiation prefixes: IAC DO and IAC WILL.
const TELNET_IAC_PREFIXES: [&[u8]; 2] = [b"\xff\xfd", b"\xff\xfb"];

/// A banner in every form the rules look at.
pub struct Banner<'a> {
    pub raw: &'a [u8],
    pub text: String,
    upper: String,
    lower: String,
}

impl<'a> Banner<'a> {
    pub fn new(raw: &'a [u8]) -> Self {
        let text = decode_banner(raw);
        Self {
            raw,
            upper: text.to_uppercase(),
            lower: text.to_lowercase(),
            text,
        }
    }
}

/// One entry of the priority list.
pub struct Rule {
    pub name: &'static str,
    pub kind: ServiceKind,
    pub matches: fn(&Banner<'_>) -> bool,
}

/// Banner rules in priority order.
pub static BANNER_RULES: &[Rule] = &[
    Rule {
        name: "ssh-token",
        kind: ServiceKind::Ssh,
        matches: is_ssh,
    },
    Rule {
        name: "ftp-token",
        kind: ServiceKind::Ftp,
        matches: is_ftp,
    },
    Rule {
        name: "telnet-token",
        kind: ServiceKind::Telnet,
        matches: is_telnet_text,
    },
    Rule {
        name: "mysql-greeting",
        kind: ServiceKind::MySql,
        matches: is_mysql,
    },
    Rule {
        name: "http-token",
        kind: ServiceKind::Http,
        matches: is_http,
    },
    Rule {
        name: "telnet-iac",
        kind: ServiceKind::Telnet,
        matches: is_telnet_negotiation,
    },
];

fn is_ssh(banner: &Banner<'_>) -> bool {
    banner.upper.contains("SSH")
}

fn is_ftp(banner: &Banner<'_>) -> bool {
    banner.upper.contains("FTP")
}

fn is_telnet_text(banner: &Banner<'_>) -> bool {
    banner.upper.contains("TELNET")
}

fn is_mysql(banner: &Banner<'_>) -> bool {
    banner.text.contains("MySQL")
        || MYSQL_AUTH_PLUGINS
            .iter()
            .any(|plugin| banner.lower.contains(plugin))
}

fn is_http(banner: &Banner<'_>) -> bool {
    banner.upper.contains("HTTP") || banner.upper.contains("<HTML>")
}

fn is_telnet_negotiation(banner: &Banner<'_>) -> bool {
    TELNET_IAC_PREFIXES
        .iter()
        .any(|prefix| banner.raw.starts_with(prefix))
}

/// Classify an unsolicited banner. Falls back to the banner text itself.
pub fn classify_banner(raw: &[u8]) -> ServiceIdentity {
    let banner = Banner::new(raw);

    match BANNER_RULES.iter().find(|rule| (rule.matches)(&banner)) {
        Some(rule) => {
            tracing::trace!(rule = rule.name, "banner rule matched");
            ServiceIdentity::Recognized(rule.kind)
        }
        None => ServiceIdentity::BannerFallback(banner.text),
    }
}

/// Classify the answer to the synthetic HTTP probe.
pub fn classify_probe_response(raw: &[u8]) -> ServiceIdentity {
    let response = decode_banner(raw);
    if response.contains("HTTP") || response.contains("Not Implemented") {
        ServiceIdentity::Recognized(ServiceKind::Http)
    } else {
        ServiceIdentity::ProtocolFallback
    }
}
