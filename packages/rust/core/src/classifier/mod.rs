//! Shelf classification: ordered keyword rules mapping a book to a location.
//!
//! A [`RuleSet`] is a literal, ordered table. The first rule whose predicate
//! matches the lowercased concatenation of title, tags, group and description
//! decides the location; later rules are never consulted. Matching is plain
//! substring containment, so `"war"` also matches `"warranty"`.

mod balanced;
mod primary;

use shelfmark_shared::{BookText, Location, Result, RuleSetName, ShelfLayout, ShelfmarkError};

pub use balanced::BALANCED;
pub use primary::PRIMARY;

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// Keyword predicate over lowercased text.
#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// At least one keyword occurs as a substring.
    Any(&'static [&'static str]),
    /// Every inner predicate holds.
    All(&'static [Predicate]),
    /// The inner predicate does not hold.
    Not(&'static Predicate),
}

impl Predicate {
    /// Evaluate against text that is already lowercase.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Any(keywords) => keywords.iter().any(|k| text.contains(k)),
            Self::All(parts) => parts.iter().all(|p| p.matches(text)),
            Self::Not(inner) => !inner.matches(text),
        }
    }
}

// ---------------------------------------------------------------------------
// Rule / RuleSet
// ---------------------------------------------------------------------------

/// One row of a classification table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Short name used in logs and tests.
    pub name: &'static str,
    pub predicate: Predicate,
    pub destination: Location,
}

/// An ordered, first-match-wins classification table.
#[derive(Debug)]
pub struct RuleSet {
    pub name: &'static str,
    pub rules: &'static [Rule],
    /// Location for books no rule matches.
    pub fallback: Location,
}

impl RuleSet {
    /// Look up a built-in table by its config name.
    pub fn named(name: RuleSetName) -> &'static RuleSet {
        match name {
            RuleSetName::Primary => &PRIMARY,
            RuleSetName::Balanced => &BALANCED,
        }
    }

    /// The first rule matching `text`, if any.
    pub fn matching_rule(&self, text: &BookText<'_>) -> Option<&Rule> {
        let combined = text.combined_lowercase();
        self.rules.iter().find(|r| r.predicate.matches(&combined))
    }

    /// Location for a book. Always returns exactly one location.
    pub fn classify(&self, text: &BookText<'_>) -> Location {
        self.matching_rule(text)
            .map_or(self.fallback, |rule| rule.destination)
    }

    /// Every location this table can produce, fallback last.
    pub fn destinations(&self) -> impl Iterator<Item = Location> + '_ {
        self.rules
            .iter()
            .map(|r| r.destination)
            .chain(std::iter::once(self.fallback))
    }

    /// Ensure every destination exists in `layout`, so classification can
    /// never point at a missing shelf or row.
    pub fn check_against(&self, layout: &ShelfLayout) -> Result<()> {
        match self.destinations().find(|loc| !layout.contains(*loc)) {
            Some(missing) => Err(ShelfmarkError::validation(format!(
                "rule set '{}' places books on {missing}, which is not in the shelf layout",
                self.name
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(t: &str) -> BookText<'_> {
        BookText {
            title: t,
            ..BookText::default()
        }
    }

    #[test]
    fn predicate_combinators() {
        const TEXTBOOK: Predicate = Predicate::Any(&["textbook"]);
        let science = Predicate::All(&[Predicate::Any(&["physics", "chemistry"]), TEXTBOOK]);
        assert!(science.matches("organic chemistry textbook"));
        assert!(!science.matches("organic chemistry"));

        let not_textbook = Predicate::Not(&TEXTBOOK);
        assert!(not_textbook.matches("a novel"));
        assert!(!not_textbook.matches("a textbook"));
    }

    #[test]
    fn substring_matching_is_not_word_bounded() {
        let war = Predicate::Any(&["war"]);
        assert!(war.matches("extended warranty guide"));
    }

    #[test]
    fn first_match_wins() {
        static RULES: [Rule; 2] = [
            Rule {
                name: "first",
                predicate: Predicate::Any(&["dragon"]),
                destination: Location::new("a", 1),
            },
            Rule {
                name: "second",
                predicate: Predicate::Any(&["dragon", "book"]),
                destination: Location::new("b", 1),
            },
        ];
        let set = RuleSet {
            name: "test",
            rules: &RULES,
            fallback: Location::new("c", 1),
        };

        assert_eq!(set.classify(&title("Dragon Book")), Location::new("a", 1));
        assert_eq!(set.classify(&title("Phone Book")), Location::new("b", 1));
        assert_eq!(set.classify(&title("Pamphlet")), Location::new("c", 1));
        assert_eq!(set.matching_rule(&title("Dragon Book")).unwrap().name, "first");
        assert!(set.matching_rule(&title("Pamphlet")).is_none());
    }

    #[test]
    fn matching_is_case_insensitive_across_all_fields() {
        let text = BookText {
            title: "Untitled",
            tags: "",
            group: "HISTORY",
            description: "",
        };
        assert_eq!(PRIMARY.classify(&text), Location::new("hallway", 1));

        let text = BookText {
            title: "Untitled",
            tags: "",
            group: "",
            description: "A Sweeping NOVEL",
        };
        assert_eq!(PRIMARY.classify(&text), Location::new("hallway", 2));
    }

    #[test]
    fn classification_is_deterministic() {
        let text = BookText {
            title: "The Art of War",
            tags: "strategy, classics",
            group: "Shelf 3",
            description: "Ancient treatise",
        };
        let first = PRIMARY.classify(&text);
        for _ in 0..10 {
            assert_eq!(PRIMARY.classify(&text), first);
        }
    }

    #[test]
    fn builtin_tables_fit_the_default_layout() {
        let layout = ShelfLayout::default();
        PRIMARY.check_against(&layout).expect("primary fits");
        BALANCED.check_against(&layout).expect("balanced fits");
    }

    #[test]
    fn check_against_names_the_missing_location() {
        let small = ShelfLayout::new(vec![ShelfLayout::default().shelf("hallway").unwrap().clone()])
            .expect("layout");
        let err = PRIMARY.check_against(&small).unwrap_err();
        assert!(err.to_string().contains("office_a row 1"));
    }

    #[test]
    fn named_returns_matching_table() {
        assert_eq!(RuleSet::named(RuleSetName::Primary).name, "primary");
        assert_eq!(RuleSet::named(RuleSetName::Balanced).name, "balanced");
    }
}
