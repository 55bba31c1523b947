//! Presentation decision: graph view or scalar view.

use serde::{Deserialize, Serialize};

use crate::classify::VisualGraphModel;
use crate::executor::ExecutionResult;
use crate::state::{ErrorInfo, Stage};
use crate::Error;

/// Shown in scalar view.
pub const NO_GRAPH_ELEMENTS_NOTICE: &str = "No graph elements found in query results";

/// How the UI should render an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presentation {
    Graph,
    ScalarOnly,
    Failed,
}

/// The only value handed to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub answer_text: String,
    pub translated_query_text: String,
    pub graph_model: VisualGraphModel,
    pub has_graph_elements: bool,
    pub failure: Option<ErrorInfo>,
}

impl PipelineOutcome {
    /// Outcome for a lifecycle that ended at `stage`.
    pub fn failed(stage: Stage, error: &Error) -> Self {
        Self {
            answer_text: String::new(),
            translated_query_text: String::new(),
            graph_model: VisualGraphModel::default(),
            has_graph_elements: false,
            failure: Some(ErrorInfo::new(stage, error)),
        }
    }

    pub fn presentation(&self) -> Presentation {
        match (&self.failure, self.has_graph_elements) {
            (Some(_), _) => Presentation::Failed,
            (None, true) => Presentation::Graph,
            (None, false) => Presentation::ScalarOnly,
        }
    }

    /// The scalar-view notice, when it applies.
    pub fn notice(&self) -> Option<&'static str> {
        (self.presentation() == Presentation::ScalarOnly).then_some(NO_GRAPH_ELEMENTS_NOTICE)
    }
}

/// Binary selection, no partial graphs: without graph elements the model is
/// always empty.
pub fn present(result: ExecutionResult, graph_model: VisualGraphModel, has_graph_elements: bool) -> PipelineOutcome {
    PipelineOutcome {
        answer_text: result.answer_text,
        translated_query_text: result.translated_query.into_string(),
        graph_model: if has_graph_elements { graph_model } else { VisualGraphModel::default() },
        has_graph_elements,
        failure: None,
    }
}
