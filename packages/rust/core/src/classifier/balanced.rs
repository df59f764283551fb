//! Capacity-oriented alternative table.
//!
//! Keeps only the most essential titles on Office A and pushes secondary
//! academic material to Office B, which has the most spare room.

use shelfmark_shared::Location;

use super::{Predicate, Rule, RuleSet};

const NOT_COOKING: Predicate = Predicate::Not(&Predicate::Any(&["cooking"]));

static RULES: [Rule; 16] = [
    Rule {
        name: "core-language",
        predicate: Predicate::Any(&["genki i", "genki ii", "tobira", "clean code"]),
        destination: Location::new("office_a", 1),
    },
    Rule {
        name: "essential-programming",
        predicate: Predicate::Any(&["algorithms", "art of computer", "programming language"]),
        destination: Location::new("office_a", 2),
    },
    Rule {
        name: "core-science-textbook",
        predicate: Predicate::All(&[
            Predicate::Any(&["physics", "chemistry"]),
            Predicate::Any(&["textbook"]),
        ]),
        destination: Location::new("office_a", 3),
    },
    Rule {
        name: "essential-philosophy",
        predicate: Predicate::Any(&["kant", "groundwork", "republic"]),
        destination: Location::new("office_a", 4),
    },
    Rule {
        name: "professional-writing",
        predicate: Predicate::Any(&["writer's reference", "writing"]),
        destination: Location::new("office_a", 5),
    },
    Rule {
        name: "computing-math",
        predicate: Predicate::Any(&["programming", "computer", "software", "math"]),
        destination: Location::new("office_b", 1),
    },
    Rule {
        name: "philosophy",
        predicate: Predicate::Any(&["philosophy", "political", "ethics"]),
        destination: Location::new("office_b", 2),
    },
    Rule {
        name: "reference",
        predicate: Predicate::Any(&["reference", "textbook", "academic"]),
        destination: Location::new("office_b", 3),
    },
    Rule {
        name: "gaming",
        predicate: Predicate::Any(&["game", "gaming", "rpg", "chess", "strategy"]),
        destination: Location::new("office_b", 4),
    },
    Rule {
        name: "cooking",
        predicate: Predicate::Any(&["cooking", "cook", "food", "recipe", "kitchen"]),
        destination: Location::new("dining", 1),
    },
    Rule {
        name: "japanese-language",
        predicate: Predicate::All(&[Predicate::Any(&["japanese", "kanji"]), NOT_COOKING]),
        destination: Location::new("dining", 2),
    },
    Rule {
        name: "other-language",
        predicate: Predicate::All(&[
            Predicate::Any(&["chinese", "korean", "language"]),
            NOT_COOKING,
        ]),
        destination: Location::new("dining", 3),
    },
    Rule {
        name: "light-reading",
        predicate: Predicate::Any(&["fiction", "novel", "poetry"]),
        destination: Location::new("hallway", 1),
    },
    Rule {
        name: "essays",
        predicate: Predicate::Any(&["uncle john", "essay", "anthology"]),
        destination: Location::new("hallway", 2),
    },
    Rule {
        name: "history",
        predicate: Predicate::Any(&["history", "historical", "war", "revolution"]),
        destination: Location::new("crate_h", 1),
    },
    Rule {
        name: "small-classics",
        predicate: Predicate::All(&[
            Predicate::Any(&["dover", "classics", "literature"]),
            Predicate::Not(&Predicate::Any(&["japanese"])),
        ]),
        destination: Location::new("crate_v", 1),
    },
];

/// Alternative table selected with `rule_set = "balanced"`.
pub static BALANCED: RuleSet = RuleSet {
    name: "balanced",
    rules: &RULES,
    fallback: Location::new("office_b", 2),
};

#[cfg(test)]
mod tests {
    use super::*;
    use shelfmark_shared::BookText;

    fn classify(title: &str) -> Location {
        BALANCED.classify(&BookText {
            title,
            ..BookText::default()
        })
    }

    #[test]
    fn balanced_differs_from_primary_for_overflow() {
        assert_eq!(classify("Genki I"), Location::new("office_a", 1));
        assert_eq!(classify("Unknown Mystery Novel"), Location::new("hallway", 1));
        assert_eq!(classify("A History of Rome"), Location::new("crate_h", 1));
        assert_eq!(classify("Something Else Entirely"), Location::new("office_b", 2));
    }

    #[test]
    fn cooking_outranks_language() {
        assert_eq!(classify("Japanese Cooking"), Location::new("dining", 1));
        assert_eq!(classify("Japanese Made Easy"), Location::new("dining", 2));
        assert_eq!(classify("Korean Phrasebook"), Location::new("dining", 3));
    }

    #[test]
    fn classics_exclude_japanese_titles() {
        assert_eq!(classify("Dover Thrift Classics"), Location::new("crate_v", 1));
        // Japanese titles are caught by the language row before reaching classics.
        assert_eq!(classify("Japanese Classics"), Location::new("dining", 2));
    }

    #[test]
    fn genki_without_volume_is_not_essential() {
        // Balanced matches "genki i", so "Genki" alone falls through.
        assert_eq!(classify("Genki"), Location::new("office_b", 2));
    }
}
