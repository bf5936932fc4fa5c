//! The fixed query vocabulary.
//!
//! Every template returns at most five rows shaped as
//! `title, genre, description, director, actors`, with `actors` deduplicated.

/// Movies featuring an actor whose name contains `$value` (case-insensitive).
pub const BY_ACTOR: &str = "
MATCH (a:Actor)
WHERE toLower(a.name) CONTAINS toLower($value)
MATCH (m:Movie)<-[:ACTED_IN]-(a)
OPTIONAL MATCH (d:Director)-[:DIRECTED]->(m)
OPTIONAL MATCH (coActor:Actor)-[:ACTED_IN]->(m)
WITH m, d.name AS director, collect(DISTINCT coActor.name) AS actors
RETURN m.title AS title,
       m.genre AS genre,
       m.description AS description,
       director,
       actors
LIMIT 5
";

/// Movies directed by someone whose name contains `$value` (case-insensitive).
pub const BY_DIRECTOR: &str = "
MATCH (d:Director)
WHERE toLower(d.name) CONTAINS toLower($value)
MATCH (m:Movie)<-[:DIRECTED]-(d)
OPTIONAL MATCH (a:Actor)-[:ACTED_IN]->(m)
WITH m, d.name AS director, collect(DISTINCT a.name) AS actors
RETURN m.title AS title,
       m.genre AS genre,
       m.description AS description,
       director,
       actors
LIMIT 5
";

/// Movies whose genre equals `$value` (case-insensitive).
pub const BY_GENRE: &str = "
MATCH (m:Movie)
WHERE toLower(m.genre) = toLower($value)
OPTIONAL MATCH (d:Director)-[:DIRECTED]->(m)
OPTIONAL MATCH (a:Actor)-[:ACTED_IN]->(m)
WITH m, d.name AS director, collect(DISTINCT a.name) AS actors
RETURN m.title AS title,
       m.genre AS genre,
       m.description AS description,
       director,
       actors
LIMIT 5
";

/// Title/description substring search on `$query`, used when translation fails.
pub const FALLBACK_SEARCH: &str = "
MATCH (m:Movie)
WHERE toLower(m.title) CONTAINS toLower($query)
   OR toLower(m.description) CONTAINS toLower($query)
OPTIONAL MATCH (d:Director)-[:DIRECTED]->(m)
OPTIONAL MATCH (a:Actor)-[:ACTED_IN]->(m)
WITH m, d.name AS director, collect(DISTINCT a.name) AS actors
RETURN m.title AS title,
       m.genre AS genre,
       m.description AS description,
       director,
       actors
LIMIT 5
";

pub const FALLBACK_EXPLANATION: &str = "Fallback to general search due to error";

/// Phrases removed from a prefixed search value, applied in this order.
pub const FILLER_PHRASES: [&str; 6] = [
    "what are the ",
    "list ",
    "show me ",
    "find ",
    " movies",
    "?",
];

/// The three recognised search prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPrefix {
    Actor,
    Director,
    Genre,
}

impl SearchPrefix {
    /// Split `actor:`/`director:`/`genre:` off the front of a query.
    ///
    /// Matching is case-sensitive; the remainder is returned untouched.
    pub fn split(query: &str) -> Option<(Self, &str)> {
        [
            ("actor:", Self::Actor),
            ("director:", Self::Director),
            ("genre:", Self::Genre),
        ]
        .into_iter()
        .find_map(|(tag, prefix)| query.strip_prefix(tag).map(|rest| (prefix, rest)))
    }

    pub fn template(self) -> &'static str {
        match self {
            Self::Actor => BY_ACTOR,
            Self::Director => BY_DIRECTOR,
            Self::Genre => BY_GENRE,
        }
    }

    pub fn explain(self, value: &str) -> String {
        match self {
            Self::Actor => format!("Finding movies featuring actor matching '{value}'"),
            Self::Director => format!("Finding movies directed by '{value}'"),
            Self::Genre => format!("Finding movies in the {value} genre"),
        }
    }
}

/// Normalise the value that follows a search prefix.
///
/// Lower-cases, strips every filler phrase in [`FILLER_PHRASES`] order and
/// trims surrounding whitespace.
pub fn clean_search_value(raw: &str) -> String {
    let mut value = raw.trim().to_lowercase();
    for phrase in FILLER_PHRASES {
        value = value.replace(phrase, "");
    }
    value.trim().to_string()
}
