use crate::constants::{MAX_DOMAIN_LEN, MAX_LABEL_LEN, STAT_LAST_UPDATED};
use crate::error::{AppError, AppResult};

/// Parse a 24-hour `HH:MM` time into minutes since midnight.
///
/// One- or two-digit hours are accepted ("9:00" and "09:00" are the same).
pub fn parse_time_of_day(time: &str) -> AppResult<u32> {
    let err = |reason: &str| AppError::InvalidConfig {
        field: "time",
        reason: format!("'{time}' {reason}"),
    };

    let (hours, minutes) = time.trim().split_once(':').ok_or_else(|| err("must be in HH:MM format"))?;

    let is_digits = |s: &str| !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(hours) {
        return Err(err("has invalid hours"));
    }
    if minutes.len() != 2 || !is_digits(minutes) {
        return Err(err("has invalid minutes"));
    }

    let hours: u32 = hours.parse().map_err(|_| err("has invalid hours"))?;
    let minutes: u32 = minutes.parse().map_err(|_| err("has invalid minutes"))?;

    if hours >= 24 {
        return Err(err("hours must be 00-23"));
    }
    if minutes >= 60 {
        return Err(err("minutes must be 00-59"));
    }

    Ok(hours * 60 + minutes)
}

/// Validate a schedule day number (0=Sunday, 6=Saturday).
pub fn validate_day(day: u8) -> AppResult<()> {
    if day > 6 {
        return Err(AppError::InvalidConfig {
            field: "days",
            reason: format!("day must be 0-6, got {day}"),
        });
    }
    Ok(())
}

/// Check a counter name can live in the flat stats object.
pub fn validate_stat_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() || name == STAT_LAST_UPDATED {
        return Err(AppError::InvalidStat { name: name.to_string() });
    }
    Ok(())
}

/// Normalize manual add-site input and check it looks like a hostname.
///
/// Accepts dot-separated labels of letters, digits and inner hyphens, which
/// also lets dotted IPv4 addresses through. Returns the lower-cased domain.
pub fn normalize_domain(input: &str) -> AppResult<String> {
    let domain = input.trim().to_lowercase();

    if domain.is_empty() {
        return Err(AppError::InvalidDomain {
            reason: "Please enter a domain".into(),
        });
    }

    if domain.len() > MAX_DOMAIN_LEN || !domain.split('.').all(is_valid_label) {
        return Err(AppError::InvalidDomain {
            reason: "Please enter a valid domain (example: google.com)".into(),
        });
    }

    Ok(domain)
}

fn is_valid_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(first), Some(last)) => {
            bytes.len() <= MAX_LABEL_LEN
                && first.is_ascii_alphanumeric()
                && last.is_ascii_alphanumeric()
                && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_stat_name() {
        assert!(validate_stat_name("blockedAttempts").is_ok());
        assert!(validate_stat_name("customCounter").is_ok());
        assert!(validate_stat_name("lastUpdated").is_err());
        assert!(validate_stat_name("").is_err());
        assert!(validate_stat_name("  ").is_err());
    }

    #[test]
    fn test_parse_time_of_day_valid() {
        assert_eq!(parse_time_of_day("00:00").unwrap(), 0);
        assert_eq!(parse_time_of_day("09:00").unwrap(), 540);
        assert_eq!(parse_time_of_day("9:00").unwrap(), 540);
        assert_eq!(parse_time_of_day("22:00").unwrap(), 1320);
        assert_eq!(parse_time_of_day("23:59").unwrap(), 1439);
    }

    #[test]
    fn test_parse_time_of_day_invalid() {
        assert!(parse_time_of_day("").is_err());
        assert!(parse_time_of_day("0900").is_err());
        assert!(parse_time_of_day("ab:cd").is_err());
        assert!(parse_time_of_day("25:00").is_err());
        assert!(parse_time_of_day("12:60").is_err());
        assert!(parse_time_of_day("12:5").is_err());
        assert!(parse_time_of_day("-1:30").is_err());
    }

    #[test]
    fn test_parse_time_error_is_config() {
        let err = parse_time_of_day("noon").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }

    #[test]
    fn test_validate_day() {
        assert!(validate_day(0).is_ok());
        assert!(validate_day(6).is_ok());
        assert!(validate_day(7).is_err());
    }

    #[test]
    fn test_normalize_domain_valid() {
        assert_eq!(normalize_domain("  Example.COM ").unwrap(), "example.com");
        assert_eq!(normalize_domain("sub-domain.example.co.uk").unwrap(), "sub-domain.example.co.uk");
        assert_eq!(normalize_domain("localhost").unwrap(), "localhost");
        assert_eq!(normalize_domain("192.168.0.1").unwrap(), "192.168.0.1");
    }

    #[test]
    fn test_normalize_domain_invalid() {
        assert!(normalize_domain("").is_err());
        assert!(normalize_domain("   ").is_err());
        assert!(normalize_domain("https://example.com").is_err());
        assert!(normalize_domain("example.com/path").is_err());
        assert!(normalize_domain("-example.com").is_err());
        assert!(normalize_domain("example-.com").is_err());
        assert!(normalize_domain("example..com").is_err());
        assert!(normalize_domain(&"a".repeat(64)).is_err());
        assert!(normalize_domain(&format!("{}.com", "a.".repeat(130))).is_err());
    }

    #[test]
    fn test_empty_domain_has_distinct_message() {
        let empty = normalize_domain("").unwrap_err().to_string();
        let bad = normalize_domain("bad domain").unwrap_err().to_string();
        assert_ne!(empty, bad);
    }
}
