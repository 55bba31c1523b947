//! The translate → execute → classify → present pipeline.
//!
//! A `Pipeline` holds only read-only collaborators, so one instance can
//! serve many questions at once; every question gets its own results and
//! visual model.

use std::sync::Arc;

use tracing::{info, warn};

use crate::classify::classify;
use crate::config::PipelineConfig;
use crate::executor::Executor;
use crate::fewshot::ExampleStore;
use crate::llm::LanguageModel;
use crate::present::{present, PipelineOutcome};
use crate::qa::{CypherQaChain, QaDelegate};
use crate::state::{ErrorInfo, ProgressObserver, QueryState, Stage};
use crate::storage::GraphStore;
use crate::translator::Translator;
use crate::{Error, Result};

/// One question in, one [`PipelineOutcome`] out.
pub struct Pipeline<M, S, D> {
    translator: Translator<M>,
    executor: Executor<S, D>,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl<M, S, D> Pipeline<M, S, D>
where
    M: LanguageModel,
    S: GraphStore,
    D: QaDelegate,
{
    pub fn new(translator: Translator<M>, executor: Executor<S, D>) -> Self {
        Self { translator, executor, observer: None }
    }

    /// Report every state transition to `observer`.
    pub fn with_observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn translator(&self) -> &Translator<M> {
        &self.translator
    }

    pub fn executor(&self) -> &Executor<S, D> {
        &self.executor
    }

    /// Run one question. Failures end the lifecycle and are carried in
    /// `PipelineOutcome::failure`; nothing is retried.
    pub async fn run(&self, question: &str) -> PipelineOutcome {
        match self.lifecycle(question).await {
            Ok(outcome) => outcome,
            Err((stage, error)) => PipelineOutcome::failed(stage, &error),
        }
    }

    /// Like [`Pipeline::run`], but returns the error itself.
    pub async fn try_run(&self, question: &str) -> Result<PipelineOutcome> {
        self.lifecycle(question).await.map_err(|(_, error)| error)
    }

    async fn lifecycle(&self, question: &str) -> std::result::Result<PipelineOutcome, (Stage, Error)> {
        self.notify(QueryState::Received);
        info!(question, "query received");

        self.notify(QueryState::Translating);
        let examples = self.translator.examples().clone();
        let translated = self
            .translator
            .translate(question, examples.exemplars())
            .await
            .map_err(|e| self.fail(Stage::Translating, e))?;

        self.notify(QueryState::Executing);
        let result = self
            .executor
            .execute(question, &translated)
            .await
            .map_err(|e| self.fail(Stage::Executing, e))?;

        self.notify(QueryState::Classifying);
        let (model, has_graph_elements) = classify(&result.rows);

        let outcome = present(result, model, has_graph_elements);
        info!(
            nodes = outcome.graph_model.node_count(),
            edges = outcome.graph_model.edge_count(),
            has_graph_elements,
            "query presented"
        );
        self.notify(QueryState::Presented);
        Ok(outcome)
    }

    fn fail(&self, stage: Stage, error: Error) -> (Stage, Error) {
        warn!(%stage, error = %error, "query failed");
        self.notify(QueryState::Failed { stage, error: ErrorInfo::new(stage, &error) });
        (stage, error)
    }

    fn notify(&self, state: QueryState) {
        if let Some(observer) = &self.observer {
            observer.on_transition(&state);
        }
    }
}

impl<M, S> Pipeline<M, S, CypherQaChain<M>>
where
    M: LanguageModel + Clone,
    S: GraphStore,
{
    /// Wire a pipeline whose answers come from a [`CypherQaChain`] on the
    /// same model.
    pub fn with_qa_chain(model: M, store: S, examples: ExampleStore, config: &PipelineConfig) -> Result<Self> {
        let examples = Arc::new(examples);
        let translator = Translator::new(model.clone(), examples.clone())?
            .with_timeout(config.translate_timeout());
        let chain = CypherQaChain::new(model).with_top_k(config.qa_top_k);
        let executor = Executor::new(store, chain, examples)
            .with_result_cap(config.result_cap)
            .with_timeout(config.execute_timeout());
        Ok(Self::new(translator, executor))
    }
}
