//! Best-effort number extraction from free-form text.
//!
//! Nothing here fails. Conversion takes the longest numeric prefix and stops
//! at the first character that cannot belong to it, yielding zero when there
//! is no prefix at all. Bulk filtering drops every character that is not a
//! digit, the separator, or (when allowed) a minus sign before splitting.

/// Parse the leading integer of `text`.
///
/// Leading whitespace and a `+` sign are accepted, and `_` between two
/// digits is skipped. When `negatives` is `false` leading minus signs are
/// dropped instead of being read as a sign. Values beyond `i64` saturate.
///
/// ```
/// use cui_widgets::numeric::parse_integer;
///
/// assert_eq!(parse_integer("42 apples", true), 42);
/// assert_eq!(parse_integer("-7", true), -7);
/// assert_eq!(parse_integer("-7", false), 7);
/// assert_eq!(parse_integer("apples", true), 0);
/// ```
pub fn parse_integer(text: &str, negatives: bool) -> i64 {
    let prefix = scan(text, negatives, false);
    prefix.digits.bytes().fold(0i64, |acc, digit| {
        let digit = i64::from(digit - b'0');
        if prefix.negative {
            acc.saturating_mul(10).saturating_sub(digit)
        } else {
            acc.saturating_mul(10).saturating_add(digit)
        }
    })
}

/// Parse the leading decimal number of `text`, allowing one decimal point.
///
/// ```
/// use cui_widgets::numeric::parse_float;
///
/// assert_eq!(parse_float("3.25 kg", true), 3.25);
/// assert_eq!(parse_float("1.2.3", true), 1.2);
/// assert_eq!(parse_float("-0.5", false), 0.5);
/// ```
pub fn parse_float(text: &str, negatives: bool) -> f64 {
    let prefix = scan(text, negatives, true);
    if prefix.digits.is_empty() && prefix.fraction.is_empty() {
        return 0.0;
    }
    let mut literal = String::with_capacity(prefix.digits.len() + prefix.fraction.len() + 3);
    if prefix.negative {
        literal.push('-');
    }
    literal.push_str(if prefix.digits.is_empty() { "0" } else { &prefix.digits });
    if !prefix.fraction.is_empty() {
        literal.push('.');
        literal.push_str(&prefix.fraction);
    }
    literal.parse().unwrap_or(0.0)
}

/// Whether `text` is exactly the decimal rendering of an integer, so it can
/// be taken as one item without filtering.
pub fn is_plain_integer(text: &str, negatives: bool) -> bool {
    !text.is_empty() && parse_integer(text, negatives).to_string() == text
}

/// Drop every character that is not a digit, `separator`, or (when
/// `negatives` is set) a minus sign.
///
/// ```
/// use cui_widgets::numeric::filter_numeric;
///
/// assert_eq!(filter_numeric("12a,3b4", ',', false), "12,34");
/// assert_eq!(filter_numeric("-1, -2", ',', false), "1,2");
/// assert_eq!(filter_numeric("-1, -2", ',', true), "-1,-2");
/// ```
pub fn filter_numeric(text: &str, separator: char, negatives: bool) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == separator || (negatives && *c == '-'))
        .collect()
}

/// Filter `text`, split it on `separator` and convert every non-empty
/// fragment.
pub fn split_integers(text: &str, separator: char, negatives: bool) -> Vec<i64> {
    filter_numeric(text, separator, negatives)
        .split(separator)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| parse_integer(fragment, negatives))
        .collect()
}

struct Prefix {
    negative: bool,
    digits: String,
    fraction: String,
}

fn scan(text: &str, negatives: bool, float: bool) -> Prefix {
    let mut rest = text.trim_start();
    if !negatives {
        rest = rest.trim_start_matches('-');
    }

    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    } else if negatives {
        if let Some(stripped) = rest.strip_prefix('-') {
            negative = true;
            rest = stripped;
        }
    }

    let (digits, rest) = take_digits(rest);
    let mut fraction = String::new();
    if float {
        if let Some(after_point) = rest.strip_prefix('.') {
            if after_point.starts_with(|c: char| c.is_ascii_digit()) {
                fraction = take_digits(after_point).0;
            }
        }
    }

    Prefix {
        negative,
        digits,
        fraction,
    }
}

/// Take a run of digits, skipping single underscores between digits.
fn take_digits(text: &str) -> (String, &str) {
    let bytes = text.as_bytes();
    let mut digits = String::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_digit() {
            digits.push(b as char);
        } else if b == b'_'
            && !digits.is_empty()
            && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
        {
            // separator between digits
        } else {
            break;
        }
        i += 1;
    }
    (digits, &text[i..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_prefix_stops_at_first_non_digit() {
        assert_eq!(parse_integer("123abc", true), 123);
        assert_eq!(parse_integer("12 34", true), 12);
        assert_eq!(parse_integer("5-3", false), 5);
        assert_eq!(parse_integer("", true), 0);
        assert_eq!(parse_integer("abc", false), 0);
    }

    #[test]
    fn integer_accepts_whitespace_plus_and_underscores() {
        assert_eq!(parse_integer("   17", true), 17);
        assert_eq!(parse_integer("+17", false), 17);
        assert_eq!(parse_integer("1_000", true), 1000);
        assert_eq!(parse_integer("1__000", true), 1);
        assert_eq!(parse_integer("_5", true), 0);
    }

    #[test]
    fn minus_is_stripped_when_negatives_are_disallowed() {
        assert_eq!(parse_integer("-7", false), 7);
        assert_eq!(parse_integer("--7", false), 7);
        assert_eq!(parse_integer("--7", true), 0);
        assert_eq!(parse_integer("-", true), 0);
    }

    #[test]
    fn integer_saturates() {
        assert_eq!(parse_integer("99999999999999999999", true), i64::MAX);
        assert_eq!(parse_integer("-99999999999999999999", true), i64::MIN);
    }

    #[test]
    fn float_prefix_takes_one_point() {
        assert_eq!(parse_float("2.5", true), 2.5);
        assert_eq!(parse_float("2.", true), 2.0);
        assert_eq!(parse_float(".5", true), 0.5);
        assert_eq!(parse_float("-.5", true), -0.5);
        assert_eq!(parse_float("abc", true), 0.0);
        assert_eq!(parse_float("7x", false), 7.0);
    }

    #[test]
    fn plain_integer_detection() {
        assert!(is_plain_integer("123", false));
        assert!(is_plain_integer("-5", true));
        assert!(!is_plain_integer("-5", false));
        assert!(!is_plain_integer("007", true));
        assert!(!is_plain_integer("12a", true));
        assert!(!is_plain_integer("", true));
    }

    #[test]
    fn split_filters_before_splitting() {
        assert_eq!(split_integers("12a,3b4", ',', false), vec![12, 34]);
        assert_eq!(split_integers("123abc, 456def", ',', false), vec![123, 456]);
        assert_eq!(split_integers("-7,-8", ',', false), vec![7, 8]);
        assert_eq!(split_integers("-7,-8", ',', true), vec![-7, -8]);
        assert_eq!(split_integers(",,,", ',', false), Vec::<i64>::new());
        assert_eq!(split_integers("1; 2;3", ';', false), vec![1, 2, 3]);
    }
}
