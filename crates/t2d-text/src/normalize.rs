//! Character repair and normalization
//!
//! Text pasted from web pages or decoded with the wrong code page carries
//! mojibake such as `Â£` for `£`. [`normalize`] repairs the known sequences,
//! folds typographic punctuation to ASCII and collapses whitespace.

/// Mis-decoded sequences and their intended text.
///
/// UTF-8 bytes read as Windows-1252 / Latin-1. Longer keys precede any key
/// that is a prefix of them.
const MOJIBAKE_REPAIRS: &[(&str, &str)] = &[
    ("â‚¬", "€"),
    ("â€™", "'"),
    ("â€˜", "'"),
    ("â€œ", "\""),
    ("â€\u{9d}", "\""),
    ("â€ž", "\""),
    ("â€“", "-"),
    ("â€”", "-"),
    ("â€¦", "..."),
    ("Â£", "£"),
    ("Â¥", "¥"),
    ("Â€", "€"),
    ("Â$", "$"),
    ("Â\u{a0}", " "),
];

/// Subset of [`MOJIBAKE_REPAIRS`] that produces currency glyphs
const CURRENCY_REPAIRS: &[(&str, &str)] = &[
    ("â‚¬", "€"),
    ("Â£", "£"),
    ("Â¥", "¥"),
    ("Â€", "€"),
    ("Â$", "$"),
];

/// Single-character typographic variants and their ASCII forms
fn fold_char(c: char) -> Option<&'static str> {
    match c {
        '\u{201c}' | '\u{201d}' | '\u{201e}' => Some("\""),
        '\u{2018}' | '\u{2019}' | '\u{201a}' => Some("'"),
        '\u{2013}' | '\u{2014}' => Some("-"),
        '\u{a0}' => Some(" "),
        '\u{2026}' => Some("..."),
        _ => None,
    }
}

/// Normalize raw text.
///
/// Repairs mojibake, folds smart quotes, dashes, non-breaking spaces and
/// ellipses, then collapses whitespace runs and trims. Idempotent.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let repaired = repair(text, MOJIBAKE_REPAIRS);

    let mut folded = String::with_capacity(repaired.len());
    for c in repaired.chars() {
        match fold_char(c) {
            Some(replacement) => folded.push_str(replacement),
            None => folded.push(c),
        }
    }

    collapse_whitespace(&folded)
}

/// Currency cleanup applied to recognizer MONEY spans before [`normalize`]
pub fn canonicalize_currency(text: &str) -> String {
    repair(&collapse_whitespace(text), CURRENCY_REPAIRS)
}

/// Collapse whitespace runs to a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Apply a repair table until no key remains.
///
/// A single pass is not enough: removing the artifact in `ÂÂ£` exposes a
/// new `Â£`. Every repair strictly reduces the number of non-ASCII
/// characters, so this terminates.
fn repair(text: &str, table: &[(&str, &str)]) -> String {
    let mut current = text.to_string();
    loop {
        let mut changed = false;
        for (broken, fixed) in table {
            if current.contains(broken) {
                current = current.replace(broken, fixed);
                changed = true;
            }
        }
        if !changed {
            return current;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_repairs_pound_mojibake() {
        assert_eq!(
            normalize("Â£60,000, Â£2,000, Â£5.60 an hour"),
            "£60,000, £2,000, £5.60 an hour"
        );
    }

    #[test]
    fn test_repairs_chained_artifacts() {
        assert_eq!(normalize("ÂÂ£10"), "£10");
        assert_eq!(normalize("costs â‚¬20"), "costs €20");
    }

    #[test]
    fn test_folds_typography() {
        assert_eq!(normalize("\u{201c}smart quotes\u{201d}"), "\"smart quotes\"");
        assert_eq!(normalize("it\u{2019}s"), "it's");
        assert_eq!(
            normalize("en dash \u{2013} and em dash \u{2014}"),
            "en dash - and em dash -"
        );
        assert_eq!(
            normalize("non-breaking space\u{a0}here"),
            "non-breaking space here"
        );
        assert_eq!(normalize("horizontal ellipsis\u{2026}"), "horizontal ellipsis...");
        assert_eq!(normalize("\u{201e}text\u{201c}"), "\"text\"");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  a \t\n  b  "), "a b");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_keeps_valid_currency() {
        assert_eq!(
            normalize("currency symbols: £10, €20, ¥30"),
            "currency symbols: £10, €20, ¥30"
        );
    }

    #[test]
    fn test_canonicalize_currency() {
        assert_eq!(canonicalize_currency("Â£ 5 \n million"), "£ 5 million");
        assert_eq!(canonicalize_currency("â‚¬1"), "€1");
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(s in "\\PC*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalize_idempotent_on_artifacts(
            s in "[ Ââ€£¥‚¬™œ\u{a0}\u{2019}\u{2026}a1.]{0,40}"
        ) {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once.clone());
            prop_assert!(!once.contains('\u{a0}'), "non-breaking space survived");
            prop_assert!(!once.contains("Â£"), "mojibake pound survived");
        }
    }
}
