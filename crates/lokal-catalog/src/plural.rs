//! Numerus rules: map a count to an index into a stored form list.
//!
//! Resources store numerus variants as an ordered list, so rules here are
//! expressed as `(form_count, count -> index)` rather than named CLDR
//! categories. The index a rule produces is always `< form_count()`;
//! callers still clamp against the forms actually stored, since a resource
//! may carry more or fewer forms than its language class expects.

/// Numerus rule class for a language.
///
/// Negative counts categorize by absolute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    /// One invariant form regardless of count (Turkish, Japanese, Chinese,
    /// Korean, and other languages without grammatical number marking).
    OneForm,
    /// Two forms: singular for exactly 1, general otherwise. The default
    /// class for unrecognized languages.
    English,
    /// Two forms: singular for 0 and 1, general otherwise.
    French,
    /// Three forms with the East Slavic ending rules (1/21/31 singular,
    /// 2-4 paucal except the teens, the rest general).
    Russian,
    /// Three forms: 1 singular, 2-4 paucal except the teens, the rest
    /// general.
    Polish,
    /// Six forms in CLDR order: zero, one, two, few, many, other.
    Arabic,
}

impl PluralRule {
    /// Rule class for a locale tag, keyed on the primary language subtag.
    ///
    /// Unknown or malformed tags fall back to [`PluralRule::English`];
    /// this never fails.
    #[must_use]
    pub fn for_locale(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match primary.as_str() {
            "tr" | "az" | "ja" | "zh" | "ko" | "th" | "vi" | "id" => Self::OneForm,
            "fr" => Self::French,
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => Self::Russian,
            "pl" => Self::Polish,
            "ar" => Self::Arabic,
            _ => Self::English,
        }
    }

    /// Number of forms this rule class expects a resource to store.
    #[must_use]
    pub fn form_count(self) -> usize {
        match self {
            Self::OneForm => 1,
            Self::English | Self::French => 2,
            Self::Russian | Self::Polish => 3,
            Self::Arabic => 6,
        }
    }

    /// Index of the form to display for `count`.
    ///
    /// Always `< self.form_count()`.
    #[must_use]
    pub fn form_index(self, count: i64) -> usize {
        let n = count.unsigned_abs();
        match self {
            Self::OneForm => 0,
            Self::English => usize::from(n != 1),
            Self::French => usize::from(n > 1),
            Self::Russian => {
                if n % 10 == 1 && n % 100 != 11 {
                    0
                } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                    1
                } else {
                    2
                }
            }
            Self::Arabic => match n {
                0 => 0,
                1 => 1,
                2 => 2,
                _ if (3..=10).contains(&(n % 100)) => 3,
                _ if (11..=99).contains(&(n % 100)) => 4,
                _ => 5,
            },
        }
    }
}
