//! Environment-variable parsing helpers.
//!
//! All config reads go through these so the truthy/falsey rules live in one
//! place.

/// `true` when the variable is set to `1`, `true`, `yes` or `on`
/// (case-insensitive, trimmed).
pub(crate) fn env_var_truthy(var_name: &str) -> bool {
    std::env::var(var_name)
        .map(|raw| is_truthy(&raw))
        .unwrap_or(false)
}

/// `false` only when the variable is explicitly set to `0`, `false`, `no`
/// or `off`. Unset means `true`.
pub(crate) fn env_var_enabled_unless_falsey(var_name: &str) -> bool {
    std::env::var(var_name)
        .map(|raw| !is_falsey(&raw))
        .unwrap_or(true)
}

/// Parses the variable as a `u64`, returning `Some` only for values > 0.
pub(crate) fn env_var_positive_u64(var_name: &str) -> Option<u64> {
    std::env::var(var_name)
        .ok()
        .and_then(|raw| parse_positive_u64(&raw))
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn is_falsey(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn parse_positive_u64(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse::<u64>().ok(),
    };
    parsed.filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_and_falsey_spellings() {
        assert!(is_truthy(" Yes "));
        assert!(is_truthy("1"));
        assert!(!is_truthy("enabled"));
        assert!(is_falsey("OFF"));
        assert!(!is_falsey(""));
    }

    #[test]
    fn positive_integers_accept_hex() {
        assert_eq!(parse_positive_u64("6"), Some(6));
        assert_eq!(parse_positive_u64("0x30"), Some(0x30));
        assert_eq!(parse_positive_u64("0"), None);
        assert_eq!(parse_positive_u64("-3"), None);
    }
}
