//! String primitives for tokenizing and normalizing raw key/value text.
//!
//! Everything here is a pure function: input slices are never mutated and
//! results come back as new owned strings. The whitespace classification is
//! ASCII-only (space, tab, newline, vertical tab, form feed, carriage
//! return), so trimming and collapsing are locale-independent.

use crate::error::Error;

/// ASCII whitespace, the set `trim` and `collapse_whitespace` operate on.
pub(crate) fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Blank characters only (space and tab), a narrower set than [`is_space`].
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

/// Removes leading and trailing ASCII whitespace.
///
/// A string that is entirely whitespace trims to the empty string, which is
/// a valid result.
pub fn trim(s: &str) -> String {
    s.trim_matches(is_space).to_string()
}

/// Replaces every maximal run of whitespace with a single space character.
///
/// Non-whitespace characters pass through unchanged:
///
/// ```
/// assert_eq!(strkv::strutil::collapse_whitespace("a \t b\n\nc"), "a b c");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if is_space(c) {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Removes every blank character (space and tab), leaving all other
/// characters untouched.
///
/// Non-blank whitespace such as newlines survives; this is intentionally
/// narrower than a full whitespace strip.
pub fn strip_blanks(s: &str) -> String {
    s.chars().filter(|&c| !is_blank(c)).collect()
}

/// Number of times `c` appears in `s`, zero if absent.
pub fn count_occurrences(s: &str, c: char) -> usize {
    s.chars().filter(|&x| x == c).count()
}

/// Splits `s` into pieces at `token`.
///
/// Any maximal run of `token` characters counts as one separator, so empty
/// pieces are never produced: `split("a,,b", ',')` yields `["a", "b"]`.
/// Pieces come back in left-to-right order.
///
/// Fails with [`Error::InvalidArgument`] when `token` is NUL or when the
/// input contains no pieces at all (empty, or nothing but separators) - an
/// empty sequence is never returned.
pub fn split(s: &str, token: char) -> Result<Vec<String>, Error> {
    if token == '\0' {
        return Err(Error::InvalidArgument(
            "split token must not be NUL".to_string(),
        ));
    }

    let pieces: Vec<String> = s
        .split(token)
        .filter(|piece| !piece.is_empty())
        .map(|piece| piece.to_string())
        .collect();

    if pieces.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "no pieces when splitting {s:?} on {token:?}"
        )));
    }
    Ok(pieces)
}

/// Returns an owned copy of `s`.
pub fn parse_str(s: &str) -> String {
    s.to_string()
}

/// Best-effort integer coercion with C `atoi` semantics.
///
/// Skips leading whitespace, accepts an optional sign, then consumes the
/// longest run of decimal digits. A string with no valid prefix yields 0;
/// values beyond the `i32` range saturate.
pub fn parse_int(s: &str) -> i32 {
    let rest = s.trim_start_matches(is_space);
    let mut chars = rest.chars().peekable();

    let mut negative = false;
    if let Some(&c) = chars.peek() {
        if c == '+' || c == '-' {
            negative = c == '-';
            chars.next();
        }
    }

    let mut acc: i64 = 0;
    let mut any = false;
    for c in chars {
        let Some(d) = c.to_digit(10) else { break };
        any = true;
        acc = acc.saturating_mul(10).saturating_add(d as i64);
        if acc > i64::from(i32::MAX) + 1 {
            // Already past either i32 bound, further digits cannot matter.
            break;
        }
    }
    if !any {
        return 0;
    }

    let signed = if negative { -acc } else { acc };
    signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Best-effort float coercion with C `atof` semantics.
///
/// Consumes the longest prefix that forms a valid decimal float (optional
/// sign, digits, fraction, exponent) after leading whitespace; anything with
/// no valid prefix yields 0.0.
pub fn parse_float(s: &str) -> f32 {
    let rest = s.trim_start_matches(is_space);
    let bytes = rest.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let dot = i;
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if int_digits == 0 && i == dot + 1 {
            // A lone "." (or "-.") is not a number.
            return 0.0;
        }
    } else if int_digits == 0 {
        return 0.0;
    }

    // Exponent is only part of the prefix when at least one digit follows.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    rest[..i].parse::<f32>().unwrap_or(0.0)
}

/// `true` iff `s` is exactly `"true"`.
///
/// Deliberately strict: no case folding, and `"false"`, `"1"` and `"0"` all
/// coerce to `false` like every other non-`"true"` string.
pub fn parse_bool(s: &str) -> bool {
    s == "true"
}
