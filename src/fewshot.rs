//! Few-shot example store and prompt rendering.
//!
//! The store is a configuration object: the exemplar set, the instruction
//! prefix and the dialect name. Retargeting the translator to another query
//! language means swapping the store, not touching translator code.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Smallest and largest accepted exemplar sets.
pub const MIN_EXEMPLARS: usize = 2;
pub const MAX_EXEMPLARS: usize = 5;

/// A worked (question, query) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exemplar {
    pub question: String,
    pub query: String,
}

impl Exemplar {
    pub fn new(question: impl Into<String>, query: impl Into<String>) -> Self {
        Self { question: question.into(), query: query.into() }
    }
}

/// Read-only exemplar configuration, loaded once and shared across queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleStore {
    dialect: String,
    prefix: String,
    exemplars: Vec<Exemplar>,
}

#[derive(Deserialize)]
struct RawExampleStore {
    #[serde(default = "default_dialect")]
    dialect: String,
    #[serde(default = "default_prefix")]
    prefix: String,
    exemplars: Vec<Exemplar>,
}

fn default_dialect() -> String {
    "Cypher".to_string()
}

fn default_prefix() -> String {
    MOVIE_PREFIX.to_string()
}

const MOVIE_PREFIX: &str = "Generate precise Cypher queries for movie questions. \
The graph has (:Person {name})-[:DIRECTED]->(:Movie), (:Person {name})-[:ACTED_IN]->(:Movie) \
and (:Movie {title, released, imdbRating})-[:IN_GENRE]->(:Genre {name}). \
Answer with a single Cypher statement and nothing else.";

impl ExampleStore {
    /// Build a store, rejecting empty text and sets outside
    /// `MIN_EXEMPLARS..=MAX_EXEMPLARS`.
    pub fn new(
        dialect: impl Into<String>,
        prefix: impl Into<String>,
        exemplars: Vec<Exemplar>,
    ) -> Result<Self> {
        let dialect = dialect.into();
        if dialect.trim().is_empty() {
            return Err(Error::Config("dialect name must not be empty".into()));
        }
        if !(MIN_EXEMPLARS..=MAX_EXEMPLARS).contains(&exemplars.len()) {
            return Err(Error::Config(format!(
                "expected {MIN_EXEMPLARS} to {MAX_EXEMPLARS} exemplars, got {}",
                exemplars.len()
            )));
        }
        if let Some(i) = exemplars
            .iter()
            .position(|e| e.question.trim().is_empty() || e.query.trim().is_empty())
        {
            return Err(Error::Config(format!("exemplar {i} has an empty question or query")));
        }
        Ok(Self { dialect, prefix: prefix.into(), exemplars })
    }

    /// Load `{"dialect": .., "prefix": .., "exemplars": [{"question", "query"}]}`.
    /// `dialect` and `prefix` default to the movie configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawExampleStore = serde_json::from_str(json)?;
        Self::new(raw.dialect, raw.prefix, raw.exemplars)
    }

    pub fn exemplars(&self) -> &[Exemplar] {
        &self.exemplars
    }

    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Start a translation request for `question` against this store.
    pub fn request(&self, question: impl Into<String>) -> TranslationRequest<'_> {
        TranslationRequest {
            user_question: question.into(),
            exemplars: &self.exemplars,
        }
    }

    /// Render the few-shot prompt: prefix, exemplars in order, then the open
    /// question with an empty completion slot.
    pub fn render_prompt(&self, request: &TranslationRequest<'_>) -> String {
        let mut blocks = Vec::with_capacity(request.exemplars.len() + 2);
        if !self.prefix.is_empty() {
            blocks.push(self.prefix.clone());
        }
        for exemplar in request.exemplars {
            blocks.push(format!(
                "Question: {}\n{}: {}",
                exemplar.question, self.dialect, exemplar.query
            ));
        }
        blocks.push(format!("Question: {}\n{}:", request.user_question, self.dialect));
        blocks.join("\n\n")
    }
}

impl Default for ExampleStore {
    /// Movie seed set: reverse-relationship lookup, aggregation, multi-hop
    /// filtered traversal, and a collected one-hop listing.
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            prefix: default_prefix(),
            exemplars: vec![
                Exemplar::new(
                    "Who directed The Matrix?",
                    "MATCH (m:Movie {title: 'The Matrix'})<-[:DIRECTED]-(d) RETURN d.name",
                ),
                Exemplar::new(
                    "What genres does Toy Story belong to?",
                    "MATCH (m:Movie {title: 'Toy Story'})-[:IN_GENRE]->(g) RETURN collect(g.name)",
                ),
                Exemplar::new(
                    "Which actors appeared in movies directed by Christopher Nolan after 2005?",
                    "MATCH (d:Person {name: 'Christopher Nolan'})-[:DIRECTED]->(m:Movie)<-[:ACTED_IN]-(a:Person) \
                     WHERE m.released > date('2005-12-31') RETURN DISTINCT a.name",
                ),
                Exemplar::new(
                    "List Tom Hanks' movies",
                    "MATCH (a:Person {name: 'Tom Hanks'})-[:ACTED_IN]->(m) RETURN collect(m.title)",
                ),
            ],
        }
    }
}

/// One question paired with the exemplars that steer its translation.
/// Created per query and consumed by a single translation.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest<'a> {
    pub user_question: String,
    pub exemplars: &'a [Exemplar],
}
