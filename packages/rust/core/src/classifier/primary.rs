//! Default topic-first table.
//!
//! Essentials stay on Office A; language overflow goes to the dining room,
//! history and literature to the hallway, reference material to the vertical
//! crate. Order matters: moving a row changes where books land.

use shelfmark_shared::Location;

use super::{Predicate, Rule, RuleSet};

const LANGUAGE: Predicate = Predicate::Any(&[
    "japanese",
    "chinese",
    "korean",
    "language",
    "dictionary",
    "grammar",
]);

const COOKING: Predicate = Predicate::Any(&["cooking", "cook", "food", "recipe", "kitchen", "culinary"]);

const NOT_COOKING: Predicate = Predicate::Not(&Predicate::Any(&["cooking"]));

static RULES: [Rule; 18] = [
    Rule {
        name: "core-language",
        predicate: Predicate::Any(&[
            "genki",
            "tobira",
            "integrated chinese",
            "kanji for international",
        ]),
        destination: Location::new("office_a", 1),
    },
    Rule {
        name: "essential-programming",
        predicate: Predicate::Any(&[
            "algorithms",
            "clean code",
            "programming language",
            "knuth",
            "art of computer",
        ]),
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
        predicate: Predicate::Any(&["kant", "groundwork", "nietzsche", "republic", "analects"]),
        destination: Location::new("office_a", 4),
    },
    Rule {
        name: "professional-writing",
        predicate: Predicate::Any(&["writer's reference", "writing", "professional"]),
        destination: Location::new("office_a", 5),
    },
    Rule {
        name: "japanese-language",
        predicate: Predicate::All(&[
            LANGUAGE,
            NOT_COOKING,
            Predicate::Any(&["japanese", "kanji"]),
        ]),
        destination: Location::new("dining", 1),
    },
    Rule {
        name: "chinese-language",
        predicate: Predicate::All(&[LANGUAGE, NOT_COOKING, Predicate::Any(&["chinese"])]),
        destination: Location::new("dining", 2),
    },
    Rule {
        name: "other-language",
        predicate: Predicate::All(&[LANGUAGE, NOT_COOKING]),
        destination: Location::new("dining", 3),
    },
    Rule {
        name: "history",
        predicate: Predicate::Any(&[
            "history",
            "historical",
            "revolution",
            "war",
            "ancient",
            "medieval",
        ]),
        destination: Location::new("hallway", 1),
    },
    Rule {
        name: "literature",
        predicate: Predicate::Any(&[
            "dover",
            "classics",
            "poetry",
            "shakespeare",
            "literature",
            "fiction",
            "novel",
        ]),
        destination: Location::new("hallway", 2),
    },
    Rule {
        name: "math-science-reference",
        predicate: Predicate::Any(&["mathematics", "math", "dover", "logic", "science", "reference"]),
        destination: Location::new("crate_v", 1),
    },
    Rule {
        name: "gaming",
        predicate: Predicate::Any(&["game", "gaming", "rpg", "d&d", "strategy", "chess"]),
        destination: Location::new("office_b", 4),
    },
    Rule {
        name: "philosophy-overflow",
        predicate: Predicate::Any(&["philosophy", "political", "ethics", "tao"]),
        destination: Location::new("office_b", 1),
    },
    Rule {
        name: "academic",
        predicate: Predicate::Any(&["textbook", "academic", "university"]),
        destination: Location::new("office_b", 2),
    },
    Rule {
        name: "essays-collections",
        predicate: Predicate::Any(&["uncle john", "essay", "anthology", "collection"]),
        destination: Location::new("office_b", 3),
    },
    Rule {
        name: "asian-cooking",
        predicate: Predicate::All(&[
            COOKING,
            Predicate::Any(&["asian", "japanese", "chinese", "sushi", "wok"]),
        ]),
        destination: Location::new("dining", 1),
    },
    Rule {
        name: "global-cooking",
        predicate: Predicate::All(&[
            COOKING,
            Predicate::Any(&["bittman", "international", "global"]),
        ]),
        destination: Location::new("dining", 2),
    },
    Rule {
        name: "kitchen-reference",
        predicate: COOKING,
        destination: Location::new("dining", 3),
    },
];

/// The default classification table.
pub static PRIMARY: RuleSet = RuleSet {
    name: "primary",
    rules: &RULES,
    fallback: Location::new("crate_h", 1),
};

#[cfg(test)]
mod tests {
    use super::*;
    use shelfmark_shared::BookText;

    fn classify(title: &str) -> Location {
        PRIMARY.classify(&BookText {
            title,
            ..BookText::default()
        })
    }

    fn rule_for(title: &str) -> Option<&'static str> {
        PRIMARY
            .matching_rule(&BookText {
                title,
                ..BookText::default()
            })
            .map(|r| r.name)
    }

    #[test]
    fn genki_goes_to_core_language() {
        assert_eq!(classify("Genki I"), Location::new("office_a", 1));
    }

    #[test]
    fn mystery_novel_goes_to_literature() {
        assert_eq!(classify("Unknown Mystery Novel"), Location::new("hallway", 2));
    }

    #[test]
    fn each_rule_is_reachable() {
        let cases = [
            ("Tobira", "core-language"),
            ("Introduction to Algorithms", "essential-programming"),
            ("Physics Textbook", "core-science-textbook"),
            ("Groundwork of the Metaphysics of Morals", "essential-philosophy"),
            ("On Writing", "professional-writing"),
            ("Japanese Grammar Guide", "japanese-language"),
            ("Chinese Dictionary", "chinese-language"),
            ("Korean Made Simple", "other-language"),
            ("The Medieval World", "history"),
            ("Collected Poetry", "literature"),
            ("Logic Primer", "math-science-reference"),
            ("Chess Openings", "gaming"),
            ("Ethics Today", "philosophy-overflow"),
            ("University Handbook", "academic"),
            ("Uncle John's Bathroom Reader", "essays-collections"),
            ("Sushi Cookbook", "asian-cooking"),
            ("How to Cook Everything by Bittman", "global-cooking"),
            ("Kitchen Basics", "kitchen-reference"),
        ];
        for (title, rule) in cases {
            assert_eq!(rule_for(title), Some(rule), "title: {title}");
        }
        assert_eq!(cases.len(), PRIMARY.rules.len());
    }

    #[test]
    fn unmatched_books_fall_back_to_overflow_crate() {
        assert_eq!(rule_for("Zen and Motorcycles"), None);
        assert_eq!(classify("Zen and Motorcycles"), Location::new("crate_h", 1));
        assert_eq!(classify(""), Location::new("crate_h", 1));
    }

    #[test]
    fn earlier_rules_shadow_later_ones() {
        // "chemistry textbook" would also satisfy the academic row.
        assert_eq!(classify("Chemistry Textbook"), Location::new("office_a", 3));
        // "dover" is listed under literature and reference; literature is first.
        assert_eq!(classify("Dover Edition"), Location::new("hallway", 2));
        // "war" is a substring of "warranty".
        assert_eq!(classify("Warranty Handbook"), Location::new("hallway", 1));
    }

    #[test]
    fn language_books_about_cooking_skip_the_language_rows() {
        assert_eq!(classify("Japanese Cooking"), Location::new("dining", 1));
        assert_eq!(rule_for("Japanese Cooking"), Some("asian-cooking"));
        assert_eq!(classify("Chinese Cooking Language"), Location::new("dining", 1));
    }

    #[test]
    fn kanji_needs_a_language_keyword() {
        // "kanji" alone is not a language keyword.
        assert_eq!(rule_for("Kanji Flashcards"), None);
        assert_eq!(classify("Kanji Dictionary"), Location::new("dining", 1));
    }
}
