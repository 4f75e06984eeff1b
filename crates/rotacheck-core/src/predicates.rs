//! Helper predicates shared by the built-in rules.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp from a JSON value.
///
/// Accepts RFC 3339 strings, naive date-times (interpreted in `timezone`,
/// or host local time when `None`) and integers as epoch milliseconds.
pub fn parse_timestamp(value: &Value, timezone: Option<FixedOffset>) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_text(text.trim(), timezone),
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_text(text: &str, timezone: Option<FixedOffset>) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())?;

    match timezone {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(|local| local.with_timezone(&Utc)),
        None => Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc)),
    }
}

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Read a duration in whole minutes from an integer or an integer string.
pub fn parse_duration_minutes(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

const FISCAL_CODE_MONTHS: &str = "ABCDEHLMPRST";
const OMOCODE_LETTERS: &str = "LMNPQRSTUV";
const FISCAL_CODE_ODD_VALUES: [u32; 26] = [
    1, 0, 5, 7, 9, 13, 15, 17, 19, 21, 2, 4, 18, 20, 11, 3, 6, 8, 12, 14, 16, 10, 22, 25, 24, 23,
];

/// Validate an Italian fiscal code (codice fiscale), including its check character.
pub fn is_valid_fiscal_code(text: &str) -> bool {
    let code: Vec<char> = text.trim().to_ascii_uppercase().chars().collect();
    if code.len() != 16 {
        return false;
    }

    for (idx, ch) in code.iter().enumerate() {
        let ok = match idx {
            0..=5 | 11 | 15 => ch.is_ascii_uppercase(),
            8 => FISCAL_CODE_MONTHS.contains(*ch),
            6 | 7 | 9 | 10 | 12..=14 => ch.is_ascii_digit() || OMOCODE_LETTERS.contains(*ch),
            _ => false,
        };
        if !ok {
            return false;
        }
    }

    let sum: u32 = code[..15]
        .iter()
        .enumerate()
        .map(|(idx, ch)| {
            let ordinal = if ch.is_ascii_digit() {
                *ch as u32 - '0' as u32
            } else {
                *ch as u32 - 'A' as u32
            };
            // Positions are 1-based in the algorithm, so index 0 is "odd".
            if idx % 2 == 0 {
                FISCAL_CODE_ODD_VALUES[ordinal as usize]
            } else {
                ordinal
            }
        })
        .sum();

    let expected = char::from(b'A' + (sum % 26) as u8);
    code[15] == expected
}

/// Validate an IBAN using the ISO 13616 mod-97 check. Spaces are ignored.
pub fn is_valid_iban(text: &str) -> bool {
    let iban: Vec<char> = text
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| ch.to_ascii_uppercase())
        .collect();

    if !(15..=34).contains(&iban.len()) {
        return false;
    }
    if !iban[..2].iter().all(char::is_ascii_uppercase)
        || !iban[2..4].iter().all(char::is_ascii_digit)
        || !iban.iter().all(char::is_ascii_alphanumeric)
    {
        return false;
    }

    let mut remainder: u32 = 0;
    for ch in iban[4..].iter().chain(iban[..4].iter()) {
        let digits = match ch.to_digit(36) {
            Some(digits) => digits,
            None => return false,
        };
        remainder = if digits >= 10 {
            (remainder * 100 + digits) % 97
        } else {
            (remainder * 10 + digits) % 97
        };
    }

    remainder == 1
}

/// Coarse password strength classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Strong,
}

/// Classify a password by length and character variety.
pub fn password_strength(password: &str) -> PasswordStrength {
    let length = password.chars().count();
    let classes = [
        password.chars().any(|ch| ch.is_lowercase()),
        password.chars().any(|ch| ch.is_uppercase()),
        password.chars().any(|ch| ch.is_ascii_digit()),
        password.chars().any(|ch| !ch.is_alphanumeric()),
    ]
    .iter()
    .filter(|present| **present)
    .count();

    if length < 8 || classes < 3 {
        PasswordStrength::Weak
    } else if length >= 12 && classes == 4 {
        PasswordStrength::Strong
    } else {
        PasswordStrength::Fair
    }
}
