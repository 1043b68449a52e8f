//! FizzBuzz generation and count validation
//!
//! The `count` query parameter is accepted when the raw string contains at
//! least one ASCII digit anywhere and its leading digit run parses to a
//! value of 1 or more. The lenient digit check ("12abc" passes, "abc12"
//! parses as 0 and is rejected) is part of the endpoint's wire contract and
//! must not be tightened.

/// True if the string contains at least one ASCII digit anywhere
pub fn contains_digit(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
}

/// Parse the leading (optionally signed) digit run of the string
///
/// Anything without a leading digit run parses as 0, as does a run that
/// overflows `i64`.
pub fn parse_leading_int(s: &str) -> i64 {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let len = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    let value = digits[..len].parse::<i64>().unwrap_or(0);
    if negative {
        -value
    } else {
        value
    }
}

/// Validate the raw `count` parameter, returning the count when acceptable
pub fn validate_count(raw: &str) -> Option<i64> {
    let count = parse_leading_int(raw);
    if !contains_digit(raw) || count < 1 {
        return None;
    }
    Some(count)
}

/// Produce the FizzBuzz lines for x = 1..=count, newline-terminated
pub fn sequence(count: i64) -> String {
    let mut out = String::new();
    for x in 1..=count {
        if x % 15 == 0 {
            out.push_str("FizzBuzz\n");
        } else if x % 5 == 0 {
            out.push_str("Buzz\n");
        } else if x % 3 == 0 {
            out.push_str("Fizz\n");
        } else {
            out.push_str(&x.to_string());
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_of_15() {
        assert_eq!(
            sequence(15),
            "1\n2\nFizz\n4\nBuzz\nFizz\n7\n8\nFizz\nBuzz\n11\nFizz\n13\n14\nFizzBuzz\n"
        );
    }

    #[test]
    fn test_sequence_of_one() {
        assert_eq!(sequence(1), "1\n");
    }

    #[test]
    fn test_sequence_of_zero_is_empty() {
        assert_eq!(sequence(0), "");
    }

    #[test]
    fn test_contains_digit() {
        assert!(contains_digit("15"));
        assert!(contains_digit("12abc"));
        assert!(contains_digit("abc12"));
        assert!(!contains_digit("abc"));
        assert!(!contains_digit(""));
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("15"), 15);
        assert_eq!(parse_leading_int("12abc"), 12);
        assert_eq!(parse_leading_int("abc12"), 0);
        assert_eq!(parse_leading_int("-3"), -3);
        assert_eq!(parse_leading_int(""), 0);
        // Overflowing digit runs fall back to 0
        assert_eq!(parse_leading_int("99999999999999999999"), 0);
    }

    #[test]
    fn test_validate_count_accepts_trailing_garbage() {
        assert_eq!(validate_count("15"), Some(15));
        assert_eq!(validate_count("12abc"), Some(12));
    }

    #[test]
    fn test_validate_count_rejections() {
        assert_eq!(validate_count("0"), None);
        assert_eq!(validate_count("-5"), None);
        assert_eq!(validate_count("abc"), None);
        // Digit present but leading run parses as 0
        assert_eq!(validate_count("abc12"), None);
        assert_eq!(validate_count(""), None);
    }
}
