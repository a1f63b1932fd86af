use crate::error::PipelineError;
use crate::model::Recipe;
use crate::pipelines::{ExtractionInput, RecipeExtractor};
use log::{debug, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Result of a session run
#[derive(Debug)]
pub enum SessionOutcome {
    /// The run is the newest one; its result should be shown
    Current(Result<Recipe, PipelineError>),
    /// A newer run started while this one was in flight; its result was dropped
    Stale { generation: u64 },
}

/// Latest-wins wrapper around a [`RecipeExtractor`].
///
/// Every run gets a generation number. When a run finishes after a newer one
/// has begun, its result is discarded rather than overwriting the newer state.
/// The last input is remembered so the user can retry it verbatim.
pub struct ExtractionSession {
    extractor: RecipeExtractor,
    generation: AtomicU64,
    last_input: Mutex<Option<ExtractionInput>>,
}

impl ExtractionSession {
    pub fn new(extractor: RecipeExtractor) -> Self {
        Self {
            extractor,
            generation: AtomicU64::new(0),
            last_input: Mutex::new(None),
        }
    }

    /// Register a new run and return its generation
    pub fn begin(&self, input: &ExtractionInput) -> u64 {
        *self
            .last_input
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(input.clone());
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Hand back a run's result, or drop it if a newer run has begun
    pub fn finish(
        &self,
        generation: u64,
        result: Result<Recipe, PipelineError>,
    ) -> SessionOutcome {
        if self.is_current(generation) {
            SessionOutcome::Current(result)
        } else {
            debug!(
                "Discarding result of extraction #{} (latest is #{})",
                generation,
                self.generation.load(Ordering::SeqCst)
            );
            SessionOutcome::Stale { generation }
        }
    }

    pub async fn extract(&self, input: ExtractionInput) -> SessionOutcome {
        let generation = self.begin(&input);
        let result = self.extractor.extract(&input).await;
        self.finish(generation, result)
    }

    /// Re-run the most recent input from the start
    pub async fn retry(&self) -> SessionOutcome {
        let last = self
            .last_input
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        match last {
            Some(input) => {
                info!("Retrying last extraction");
                self.extract(input).await
            }
            None => SessionOutcome::Current(Err(PipelineError::InvalidInput(
                "Nothing to retry yet".to_string(),
            ))),
        }
    }
}
