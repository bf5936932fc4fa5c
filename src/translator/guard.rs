//! Shape check for model-generated queries.
//!
//! Model output is executed as-is unless a [`QueryGuard`] is installed. The
//! guard is deliberately shallow: it knows the graph's vocabulary and the
//! write clauses, not Cypher's grammar.

use std::sync::LazyLock;

use regex::Regex;

static WRITE_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(CREATE|MERGE|DELETE|DETACH|SET|REMOVE|DROP|FOREACH|LOAD\s+CSV|CALL)\b")
        .expect("valid write-clause pattern")
});

// `(m:Movie`, `(:Actor`, `(d:Director:Person`, `(:`Movie`)`, `(n:Actor|Director`
static NODE_LABELS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*(?:`[^`]+`|[A-Za-z_][A-Za-z0-9_]*)?\s*((?::\s*!?(?:`[^`]+`|[A-Za-z_][A-Za-z0-9_]*)\s*(?:[|&]\s*!?(?:`[^`]+`|[A-Za-z_][A-Za-z0-9_]*)\s*)*)+)")
        .expect("valid label pattern")
});

// `WHERE n:User`, `AND NOT m:`Secret``
static LABEL_PREDICATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:WHERE|AND|OR|XOR|NOT|WHEN)\s+(?:`[^`]+`|[A-Za-z_][A-Za-z0-9_]*)\s*((?::\s*!?(?:`[^`]+`|[A-Za-z_][A-Za-z0-9_]*)\s*(?:[|&]\s*!?(?:`[^`]+`|[A-Za-z_][A-Za-z0-9_]*)\s*)*)+)")
        .expect("valid label predicate pattern")
});

// `[:ACTED_IN]`, `[r:DIRECTED|ACTED_IN*1..2]`, `[:`ACTED_IN`]`
static REL_TYPES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*(?:`[^`]+`|[A-Za-z_][A-Za-z0-9_]*)?\s*:\s*((?:`[^`]+`|[A-Za-z0-9_|:!&\s])+)")
        .expect("valid relationship pattern")
});

static NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`([^`]+)`|([A-Za-z_][A-Za-z0-9_]*)").expect("valid name pattern")
});

/// Label or type names in a `:A|B`-style list, backticks removed.
fn names(list: &str) -> impl Iterator<Item = &str> {
    NAME.captures_iter(list)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
}

/// Why a generated query was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardViolation {
    #[error("query contains write clause `{0}`")]
    WriteClause(String),
    #[error("query references unknown label `{0}`")]
    UnknownLabel(String),
    #[error("query references unknown relationship type `{0}`")]
    UnknownRelationship(String),
    #[error("query is empty")]
    Empty,
}

/// Whitelist of node labels and relationship types a query may touch.
#[derive(Debug, Clone)]
pub struct QueryGuard {
    labels: Vec<String>,
    relationships: Vec<String>,
}

impl Default for QueryGuard {
    fn default() -> Self {
        Self::new(["Movie", "Actor", "Director"], ["ACTED_IN", "DIRECTED"])
    }
}

impl QueryGuard {
    pub fn new<L, R>(labels: L, relationships: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            relationships: relationships.into_iter().map(Into::into).collect(),
        }
    }

    pub fn check(&self, cypher: &str) -> Result<(), GuardViolation> {
        let code = strip_string_literals(cypher);
        if code.trim().is_empty() {
            return Err(GuardViolation::Empty);
        }

        if let Some(m) = WRITE_CLAUSE.find(&code) {
            return Err(GuardViolation::WriteClause(m.as_str().to_uppercase()));
        }

        let label_lists = NODE_LABELS
            .captures_iter(&code)
            .chain(LABEL_PREDICATES.captures_iter(&code));
        for caps in label_lists {
            let list = caps.get(1).map_or("", |m| m.as_str());
            if let Some(label) = names(list).find(|name| !self.labels.iter().any(|l| l.as_str() == *name)) {
                return Err(GuardViolation::UnknownLabel(label.to_string()));
            }
        }

        for caps in REL_TYPES.captures_iter(&code) {
            let list = caps.get(1).map_or("", |m| m.as_str());
            if let Some(rel) = names(list).find(|name| !self.relationships.iter().any(|r| r.as_str() == *name)) {
                return Err(GuardViolation::UnknownRelationship(rel.to_string()));
            }
        }

        Ok(())
    }
}

/// Blank out quoted literals so their contents are never read as clauses.
fn strip_string_literals(cypher: &str) -> String {
    let mut out = String::with_capacity(cypher.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in cypher.chars() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                    out.push(c);
                    continue;
                }
                out.push(' ');
            }
            None => {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::templates::{BY_ACTOR, BY_DIRECTOR, BY_GENRE, FALLBACK_SEARCH};

    #[test]
    fn test_accepts_every_builtin_template() {
        let guard = QueryGuard::default();
        for template in [BY_ACTOR, BY_DIRECTOR, BY_GENRE, FALLBACK_SEARCH] {
            assert_eq!(guard.check(template), Ok(()));
        }
    }

    #[test]
    fn test_accepts_similar_movies_pattern() {
        let cypher = "MATCH (m:Movie {title: $title}) MATCH (similar:Movie) \
                      WHERE similar.genre = m.genre AND m <> similar \
                      OPTIONAL MATCH (d:Director)-[:DIRECTED]->(similar) \
                      RETURN similar.title AS title LIMIT 5";
        assert_eq!(QueryGuard::default().check(cypher), Ok(()));
    }

    #[test]
    fn test_rejects_write_clauses() {
        let guard = QueryGuard::default();
        assert_eq!(
            guard.check("MATCH (n) DETACH DELETE n"),
            Err(GuardViolation::WriteClause("DETACH".to_string()))
        );
        assert_eq!(
            guard.check("MATCH (m:Movie) set m.title = 'x'"),
            Err(GuardViolation::WriteClause("SET".to_string()))
        );
    }

    #[test]
    fn test_rejects_unknown_vocabulary() {
        let guard = QueryGuard::default();
        assert_eq!(
            guard.check("MATCH (u:User) RETURN u"),
            Err(GuardViolation::UnknownLabel("User".to_string()))
        );
        assert_eq!(
            guard.check("MATCH (a:Actor)-[:FRIENDS_WITH]->(b:Actor) RETURN a"),
            Err(GuardViolation::UnknownRelationship("FRIENDS_WITH".to_string()))
        );
    }

    #[test]
    fn test_backtick_quoted_names_are_checked() {
        let guard = QueryGuard::default();
        assert_eq!(
            guard.check("MATCH (u:`User`) RETURN u"),
            Err(GuardViolation::UnknownLabel("User".to_string()))
        );
        assert_eq!(
            guard.check("MATCH (:`Movie`)<-[:`FOLLOWS`]-(a:Actor) RETURN a"),
            Err(GuardViolation::UnknownRelationship("FOLLOWS".to_string()))
        );
        assert_eq!(
            guard.check("MATCH (m:`Movie`)<-[:`ACTED_IN`]-(a:Actor) RETURN a.name AS name"),
            Ok(())
        );
    }

    #[test]
    fn test_label_predicates_are_checked() {
        let guard = QueryGuard::default();
        assert_eq!(
            guard.check("MATCH (n) WHERE n:User RETURN n"),
            Err(GuardViolation::UnknownLabel("User".to_string()))
        );
        assert_eq!(
            guard.check("MATCH (n) WHERE n:Actor AND NOT n:`Admin` RETURN n"),
            Err(GuardViolation::UnknownLabel("Admin".to_string()))
        );
        assert_eq!(
            guard.check("MATCH (n)-[:ACTED_IN|DIRECTED]->(m:Movie) WHERE n:Actor OR n:Director RETURN n.name AS name"),
            Ok(())
        );
        // Property access and map literals are not label predicates.
        assert_eq!(
            guard.check("MATCH (m:Movie {title: $title}) WHERE m.genre = $genre RETURN m.title AS title"),
            Ok(())
        );
    }

    #[test]
    fn test_label_expressions_are_checked() {
        assert_eq!(
            QueryGuard::default().check("MATCH (n:Actor|User) RETURN n"),
            Err(GuardViolation::UnknownLabel("User".to_string()))
        );
    }

    #[test]
    fn test_ignores_keywords_inside_literals() {
        let cypher = "MATCH (m:Movie) WHERE m.title = 'Sunset: Create (x:Y)' RETURN m";
        assert_eq!(QueryGuard::default().check(cypher), Ok(()));
    }

    #[test]
    fn test_rejects_blank_query() {
        assert_eq!(QueryGuard::default().check("   "), Err(GuardViolation::Empty));
    }
}
