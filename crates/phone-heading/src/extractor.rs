// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Phone number heading extraction
//!
//! A heading is the shortest prefix that identifies where a number comes
//! from: the country code for international numbers, the three-digit
//! network or area prefix for domestic ones.

/// Country codes one digit long
const SINGLE_DIGIT_CODES: &[&str] = &["1", "7"];

/// Country codes two digits long
const TWO_DIGIT_CODES: &[&str] = &[
    "44", "49", "33", "39", "34", "81", "82", "86", "91", "98", "92", "94", "95", "90", "66", "65",
    "60", "62", "63", "84", "20", "27", "55", "52", "61",
];

/// Country codes three digits long
const THREE_DIGIT_CODES: &[&str] = &[
    "234", "254", "880", "856", "855", "673", "976", "380", "375", "373", "996", "998", "992",
    "993", "994", "995", "374", "371", "372", "370", "420", "421", "385", "381", "382", "383",
    "389", "386", "387",
];

/// Longest run of digits kept after '+' when the country code is not known
const MAX_UNKNOWN_CODE_DIGITS: usize = 4;

/// Strip everything except ASCII digits and a single leading '+'
///
/// A '+' is kept only when it is the first character kept.
pub fn clean_number(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_digit() || (c == '+' && cleaned.is_empty()) {
            cleaned.push(c);
        }
    }
    cleaned
}

/// Extract the heading of a phone number
///
/// Total over all input: garbage yields an empty or short heading, never an
/// error.
///
/// ```rust
/// use phone_heading::extract_head;
///
/// assert_eq!(extract_head("0965842855"), "096");
/// assert_eq!(extract_head("+12345678901"), "+1");
/// assert_eq!(extract_head("+84 96 584 2855"), "+84");
/// assert_eq!(extract_head("+380 44 123 4567"), "+380");
/// ```
pub fn extract_head(raw: &str) -> String {
    let cleaned = clean_number(raw);

    if let Some(digits) = cleaned.strip_prefix('+')
        && !digits.is_empty()
    {
        return format!("+{}", country_code(digits));
    }

    domestic_head(&cleaned).to_string()
}

fn country_code(digits: &str) -> &str {
    let known = [
        (1, SINGLE_DIGIT_CODES),
        (2, TWO_DIGIT_CODES),
        (3, THREE_DIGIT_CODES),
    ]
    .into_iter()
    .find_map(|(len, codes)| {
        digits
            .get(..len)
            .filter(|candidate| codes.contains(candidate))
    });

    known.unwrap_or_else(|| &digits[..digits.len().min(MAX_UNKNOWN_CODE_DIGITS)])
}

fn domestic_head(cleaned: &str) -> &str {
    if cleaned.len() >= 3 && cleaned.starts_with('0') {
        &cleaned[..3]
    } else if cleaned.len() >= 4 {
        &cleaned[..4]
    } else {
        cleaned
    }
}
