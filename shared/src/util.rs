//! Clock and id helpers shared by every service

/// Current UTC time as Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Custom epoch for snowflake ids: 2025-01-01 00:00:00 UTC
const ID_EPOCH_MS: i64 = 1_735_689_600_000;

/// Generate a Snowflake-style i64 resource id.
///
/// 41 bits of milliseconds since [`ID_EPOCH_MS`] followed by 12 random bits,
/// so ids sort by creation time and stay below 2^53 for JSON clients.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    let ts = (now_millis() - ID_EPOCH_MS) & 0x1FF_FFFF_FFFF;
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000);
    (ts << 12) | rand_bits
}

/// Parse a decimal id as sent on the wire (path segments, query strings).
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_ids_are_positive_and_ordered() {
        let a = snowflake_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > a);
        assert!(b < (1_i64 << 53));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id(" 7 "), Some(7));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
    }
}
