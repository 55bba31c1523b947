//! Sample movie dataset import.
//!
//! Loads a small movie CSV into the store: movies with release date, title
//! and IMDb rating, directors and actors as `Person` nodes, and genres.

use tracing::info;

use crate::storage::GraphStore;
use crate::{Error, Result};

pub const MOVIES_CSV_URL: &str =
    "https://raw.githubusercontent.com/tomasonjo/blog-datasets/main/movies/movies_small.csv";

/// Import statement for [`MOVIES_CSV_URL`]. Idempotent (`MERGE` throughout).
pub fn load_movies_statement(csv_url: &str) -> String {
    format!(
        "LOAD CSV WITH HEADERS FROM '{csv_url}' AS row
MERGE (m:Movie {{id: row.movieId}})
SET m.released = date(row.released),
    m.title = row.title,
    m.imdbRating = toFloat(row.imdbRating)
FOREACH (director IN split(row.director, '|') |
    MERGE (d:Person {{name: trim(director)}})
    MERGE (d)-[:DIRECTED]->(m))
FOREACH (actor IN split(row.actors, '|') |
    MERGE (a:Person {{name: trim(actor)}})
    MERGE (a)-[:ACTED_IN]->(m))
FOREACH (genre IN split(row.genres, '|') |
    MERGE (g:Genre {{name: trim(genre)}})
    MERGE (m)-[:IN_GENRE]->(g))"
    )
}

/// Run the sample import against `store`.
pub async fn load_sample_movies(store: &dyn GraphStore) -> Result<()> {
    let statement = load_movies_statement(MOVIES_CSV_URL);
    store.query(&statement).await.map_err(|e| match e {
        Error::Connection(msg) => Error::Connection(msg),
        other => Error::Execution { message: other.to_string(), statement: statement.clone() },
    })?;
    info!(source = MOVIES_CSV_URL, "sample movie dataset loaded");
    Ok(())
}
