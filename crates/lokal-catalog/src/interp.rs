//! Caller-side placeholder substitution for resolved templates.
//!
//! Lookup returns templates verbatim; the host substitutes values into
//! `%1`..`%99` and `%n` markers afterwards with these helpers. Both are
//! single-pass: substituted values are never rescanned, and markers
//! without a matching argument are left as-is.

/// Replace positional markers `%1`..`%99` with `args` (1-based).
///
/// Markers greedily take two digits, so `%12` is argument 12, not
/// argument 1 followed by `2`. Markers without a matching argument
/// (including `%0`) are emitted verbatim.
#[must_use]
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        let mut digits = String::new();
        while digits.len() < 2 {
            match chars.peek() {
                Some(c) if c.is_ascii_digit() => {
                    digits.push(*c);
                    chars.next();
                }
                _ => break,
            }
        }
        if digits.is_empty() {
            out.push('%');
            continue;
        }
        let position: usize = digits.parse().unwrap_or(0);
        if position >= 1 && position <= args.len() {
            out.push_str(args[position - 1]);
        } else {
            out.push('%');
            out.push_str(&digits);
        }
    }

    out
}

/// Replace every `%n` marker with the literal count.
#[must_use]
pub fn substitute_count(template: &str, count: i64) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '%' && chars.peek() == Some(&'n') {
            chars.next();
            out.push_str(&count.to_string());
        } else {
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_basic() {
        assert_eq!(
            substitute("Last received block was generated %1 ago.", &["2 minutes"]),
            "Last received block was generated 2 minutes ago."
        );
    }

    #[test]
    fn positional_multiple_and_repeated() {
        assert_eq!(substitute("%1 of %2", &["3", "10"]), "3 of 10");
        assert_eq!(substitute("%1 and %1", &["x"]), "x and x");
    }

    #[test]
    fn positional_missing_arg_left_verbatim() {
        assert_eq!(substitute("%1 of %2", &["3"]), "3 of %2");
        assert_eq!(substitute("%0 stays", &["x"]), "%0 stays");
    }

    #[test]
    fn positional_two_digit_greedy() {
        let args: Vec<String> = (1..=12).map(|i| format!("a{i}")).collect();
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        assert_eq!(substitute("%12", &refs), "a12");
    }

    #[test]
    fn bare_and_trailing_percent() {
        assert_eq!(substitute("100% done", &[]), "100% done");
        assert_eq!(substitute("tail %", &[]), "tail %");
        assert_eq!(substitute_count("tail %", 1), "tail %");
    }

    #[test]
    fn count_basic() {
        assert_eq!(substitute_count("%n gün", 5), "5 gün");
        assert_eq!(substitute_count("%n of %n", 2), "2 of 2");
        assert_eq!(substitute_count("%n blok", -3), "-3 blok");
    }

    #[test]
    fn count_without_marker_is_identity() {
        assert_eq!(substitute_count("no markers here", 9), "no markers here");
    }

    #[test]
    fn count_does_not_touch_positional() {
        assert_eq!(substitute_count("%1 of %n", 4), "%1 of 4");
    }
}
