//! Random project names, `adjective_noun` style.

use rand::seq::SliceRandom;

const ADJECTIVES: &[&str] = &[
    "best", "better", "big", "certain", "clear", "different", "early", "easy", "economic",
    "federal", "free", "full", "good", "great", "hard", "high", "important", "international",
    "large", "late", "little", "local", "long", "low", "major", "new", "old", "only", "other",
    "political", "possible", "public", "real", "recent", "right", "small", "social", "special",
    "strong", "sure", "true", "whole", "young",
];

const NOUNS: &[&str] = &[
    "area", "book", "business", "case", "company", "country", "day", "eye", "fact", "group",
    "hand", "home", "job", "life", "lot", "money", "month", "mother", "night", "number", "part",
    "place", "point", "problem", "program", "question", "right", "room", "school", "state",
    "story", "student", "study", "system", "thing", "time", "water", "way", "week", "word",
    "work", "world", "year",
];

pub fn namegen() -> String {
    let mut rng = rand::thread_rng();
    // Both lists are non-empty, so choose() cannot return None.
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("new");
    let noun = NOUNS.choose(&mut rng).copied().unwrap_or("project");
    format!("{adjective}_{noun}")
}
