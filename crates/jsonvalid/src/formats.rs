//! Built-in string formats.
//!
//! Only a lookup-by-name contract is exposed to the compiler. Formats supplied through
//! [`crate::ValidationOptions`] replace built-ins with the same name.
use std::{
    net::{Ipv4Addr, Ipv6Addr},
    str::FromStr,
    sync::{Arc, LazyLock},
};

use email_address::EmailAddress;
use regex::Regex;
use serde_json::Value;

/// A user-registered format.
#[derive(Clone)]
pub(crate) enum Format {
    /// Regular expression that must match the whole string.
    Pattern(String),
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
    /// Schema the value is validated against at the current path.
    Schema(Value),
}

macro_rules! pattern_format {
    ($name:ident, $pattern:expr) => {
        fn $name(value: &str) -> bool {
            static RE: LazyLock<Regex> =
                LazyLock::new(|| Regex::new($pattern).expect("Is a valid regex"));
            RE.is_match(value)
        }
    };
}

pattern_format!(
    is_valid_date_time,
    r"^\d{4}-(?:0[0-9]|1[0-2])-[0-9]{2}[tT ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:[zZ]|[+-]\d{2}:\d{2})$"
);
pattern_format!(is_valid_date, r"^\d{4}-(?:0[0-9]|1[0-2])-[0-9]{2}$");
pattern_format!(is_valid_time, r"^\d{2}:\d{2}:\d{2}$");
pattern_format!(is_valid_uri, r"^[a-zA-Z][a-zA-Z0-9+\-.]*:[^\s]*$");
pattern_format!(
    is_valid_hostname_labels,
    r"^[0-9A-Za-z](?:[0-9A-Za-z-]{0,61}[0-9A-Za-z])?(?:\.[0-9A-Za-z](?:[0-9A-Za-z-]{0,61}[0-9A-Za-z])?)*\.?$"
);
pattern_format!(
    is_valid_color,
    r"^(?:#?[0-9A-Fa-f]{3,6}|aqua|black|blue|fuchsia|gray|green|lime|maroon|navy|olive|orange|purple|red|silver|teal|white|yellow|rgb\(\s*(?:[0-9]|[1-9][0-9]|1[0-9][0-9]|2[0-4][0-9]|25[0-5])\s*,\s*(?:[0-9]|[1-9][0-9]|1[0-9][0-9]|2[0-4][0-9]|25[0-5])\s*,\s*(?:[0-9]|[1-9][0-9]|1[0-9][0-9]|2[0-4][0-9]|25[0-5])\s*\)|rgb\(\s*(?:\d?\d%|100%)\s*,\s*(?:\d?\d%|100%)\s*,\s*(?:\d?\d%|100%)\s*\))$"
);
pattern_format!(is_valid_alpha, r"^[a-zA-Z]+$");
pattern_format!(is_valid_alphanumeric, r"^[a-zA-Z0-9]+$");
pattern_format!(is_valid_style, r".:\s*[^;]");
pattern_format!(is_valid_phone, r"^\+(?:[0-9] ?){6,14}[0-9]$");
pattern_format!(is_valid_utc_millisec, r"^[0-9]{1,15}\.?[0-9]{0,15}$");

fn is_valid_hostname(value: &str) -> bool {
    (1..=255).contains(&value.len()) && is_valid_hostname_labels(value)
}

fn is_valid_email(value: &str) -> bool {
    EmailAddress::is_valid(value)
}

fn is_valid_ipv4(value: &str) -> bool {
    Ipv4Addr::from_str(value).is_ok()
}

fn is_valid_ipv6(value: &str) -> bool {
    Ipv6Addr::from_str(value).is_ok()
}

/// Look up a built-in format checker by name.
pub(crate) fn builtin(name: &str) -> Option<fn(&str) -> bool> {
    let check: fn(&str) -> bool = match name {
        "date-time" => is_valid_date_time,
        "date" => is_valid_date,
        "time" => is_valid_time,
        "email" => is_valid_email,
        "ipv4" | "ip-address" => is_valid_ipv4,
        "ipv6" => is_valid_ipv6,
        "uri" => is_valid_uri,
        "hostname" => is_valid_hostname,
        "color" => is_valid_color,
        "alpha" => is_valid_alpha,
        "alphanumeric" => is_valid_alphanumeric,
        "style" => is_valid_style,
        "phone" => is_valid_phone,
        "utc-millisec" => is_valid_utc_millisec,
        _ => return None,
    };
    Some(check)
}
