//! Textual-to-number conversion
//!
//! Follows the browser `Number(text)` conversion so that form input is
//! accepted and rejected exactly as the page would: surrounding whitespace is
//! ignored, `0x`/`0o`/`0b` integer prefixes are understood, `Infinity` is a
//! valid literal, and anything else that is not a plain decimal literal is
//! not-a-number.

/// Largest integer magnitude an `f64` holds without precision loss (2^53 - 1)
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Returns true for characters the browser strips when converting text
#[must_use]
pub fn is_number_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

/// Trims the whitespace that number conversion ignores
#[must_use]
pub fn trim_number_text(text: &str) -> &str {
    text.trim_matches(is_number_whitespace)
}

/// Converts text to a number, returning `None` for not-a-number
///
/// Empty (or whitespace-only) text converts to `0`, as in the browser.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let text = trim_number_text(text);
    if text.is_empty() {
        return Some(0.0);
    }

    if let Some(value) = parse_radix_integer(text) {
        return value;
    }

    parse_decimal(text)
}

/// Handles `0x`, `0o` and `0b` literals.
///
/// Outer `None` means the text has no radix prefix; inner `None` means the
/// prefix is present but the digits are invalid.
fn parse_radix_integer(text: &str) -> Option<Option<f64>> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(None);
    }

    let mut value = 0.0_f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * f64::from(radix) + f64::from(d),
            None => return Some(None),
        }
    }
    Some(Some(value))
}

/// Handles signed decimal literals and `Infinity`
fn parse_decimal(text: &str) -> Option<f64> {
    let (negative, unsigned) = match text.as_bytes()[0] {
        b'+' => (false, &text[1..]),
        b'-' => (true, &text[1..]),
        _ => (false, text),
    };

    if unsigned == "Infinity" {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    if !is_decimal_literal(unsigned) {
        return None;
    }

    // The literal is validated above, so the standard parser only has to round.
    text.parse::<f64>().ok()
}

/// `digits [. digits?] [exp]` or `. digits [exp]`, exp = `[eE] [+-]? digits`
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut pos = 0;

    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        frac_digits = count_digits(&bytes[pos..]);
        pos += frac_digits;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let exp_digits = count_digits(&bytes[pos..]);
        if exp_digits == 0 {
            return false;
        }
        pos += exp_digits;
    }

    pos == bytes.len()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Formats a number the way the browser renders it as text
///
/// Shortest round-trip digits; plain notation while the decimal exponent is
/// in `[-7, 21)`, exponent notation (`1e+21`, `1.5e-7`) outside it.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "1.2345e3"
    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return value.to_string(),
    };
    let exponent: i32 = match exponent.parse() {
        Ok(e) => e,
        Err(_) => return value.to_string(),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{int_part}.{frac_part}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", (n - 1).abs())
        } else {
            format!("{first}.{rest}e{sign}{}", (n - 1).abs())
        }
    };

    if value < 0.0 {
        format!("-{body}")
    } else {
        body
    }
}
