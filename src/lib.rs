//! # cypher-lens: ask a movie graph questions, see the graph that answered
//!
//! A free-text question goes through four stages:
//!
//! 1. **Translate**: few-shot prompt → language model → one Cypher statement
//! 2. **Execute**: natural-language answer from a QA chain, plus the
//!    translated statement re-run with a row cap for visualization
//! 3. **Classify**: result rows → deduplicated node/edge model
//! 4. **Present**: graph view or scalar view, never a partial graph
//!
//! ## Design Principles
//!
//! 1. **Trait seams**: `LanguageModel`, `GraphStore` and `QaDelegate` are the
//!    only contracts with the outside world
//! 2. **Typed rows**: store values become `Item::{Node, Edge, Scalar}` once, at
//!    the store boundary
//! 3. **No ambient state**: every stage takes explicit inputs and returns
//!    explicit outputs; the host owns sessions and credentials
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cypher_lens::{ExampleStore, FixtureStore, Pipeline, PipelineConfig, ScriptedModel};
//!
//! # async fn example() -> cypher_lens::Result<()> {
//! let model = ScriptedModel::new();          // or GroqClient with feature `groq`
//! let store = FixtureStore::new();           // or a driver-backed GraphStore
//! let pipeline = Pipeline::with_qa_chain(
//!     model,
//!     store,
//!     ExampleStore::default(),
//!     &PipelineConfig::default(),
//! )?;
//!
//! let outcome = pipeline.run("Who directed Inception?").await;
//! println!("{}", outcome.answer_text);
//! println!("{}", outcome.translated_query_text);
//! if outcome.has_graph_elements {
//!     println!("{}", outcome.graph_model.to_vis_data());
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod cypher;
pub mod storage;
pub mod llm;
pub mod fewshot;
pub mod translator;
pub mod qa;
pub mod executor;
pub mod classify;
pub mod present;
pub mod state;
pub mod pipeline;
pub mod export;
pub mod dataset;
pub mod config;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Node, Relationship, Path, Value, PropertyMap,
    NodeId, RelId, Item, Row,
};

// ============================================================================
// Re-exports: Collaborator seams
// ============================================================================

pub use storage::{GraphStore, QueryRows, FixtureStore};
pub use llm::{LanguageModel, ScriptedModel, MIN_TEMPERATURE};
#[cfg(feature = "groq")]
pub use llm::GroqClient;
pub use qa::{QaDelegate, QaAnswer, CypherQaChain};

// ============================================================================
// Re-exports: Pipeline
// ============================================================================

pub use fewshot::{ExampleStore, Exemplar, TranslationRequest};
pub use translator::{Translator, TranslatedQuery};
pub use executor::{Executor, ExecutionResult};
pub use classify::{classify, VisualGraphModel, VisualNode, VisualEdge};
pub use present::{present, PipelineOutcome, Presentation, NO_GRAPH_ELEMENTS_NOTICE};
pub use state::{QueryState, Stage, ErrorInfo, ErrorKind, ProgressObserver};
pub use pipeline::Pipeline;
pub use config::{Config, GraphConfig, ModelConfig, PipelineConfig};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Translation error: {message}")]
    Translation { message: String, completion: Option<String> },

    #[error("Execution error: {message} (statement: {statement})")]
    Execution { message: String, statement: String },

    #[error("Language model error: {0}")]
    Model(String),

    #[error("Graph store error: {0}")]
    Store(String),

    #[error("Cypher syntax error at position {position}: {message}")]
    SyntaxError { position: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
