use std::sync::Arc;

use tokio::sync::Mutex;

use crate::grading::{grade, Assertion, CodeRunner, GradingResult};
use crate::sandbox::ExecutionOutcome;

#[derive(Debug, Default)]
struct State {
    generation: u64,
    running: bool,
    result: Option<GradingResult>,
}

/// Async front of a [`CodeRunner`] where the latest submission wins.
///
/// Every [`Session::run`] or [`Session::reset`] supersedes runs still in
/// flight: they finish on their worker thread, but their result is dropped.
#[derive(Debug, Clone)]
pub struct Session {
    runner: Arc<CodeRunner>,
    state: Arc<Mutex<State>>,
}

impl Session {
    pub fn new(runner: CodeRunner) -> Self {
        Self {
            runner: Arc::new(runner),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Returns `None` if a newer `run` or a `reset` happened meanwhile.
    pub async fn run(
        &self,
        source: impl Into<String>,
        assertions: Vec<Assertion>,
    ) -> Option<GradingResult> {
        let generation = self.begin().await;

        let runner = self.runner.clone();
        let source = source.into();
        let assertions = Arc::new(assertions);
        let worker_assertions = assertions.clone();

        let result =
            tokio::task::spawn_blocking(move || runner.run(&source, &worker_assertions)).await;
        let result = result.unwrap_or_else(|e| {
            log::error!("Code runner worker failed: {}", e);
            grade(
                ExecutionOutcome::aborted(format!("Code runner crashed: {}", e)),
                &assertions,
            )
        });

        self.finish(generation, result).await
    }

    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.running = false;
        state.result = None;
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.running
    }

    pub async fn result(&self) -> Option<GradingResult> {
        self.state.lock().await.result.clone()
    }

    async fn begin(&self) -> u64 {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.running = true;
        state.result = None;
        state.generation
    }

    async fn finish(&self, generation: u64, result: GradingResult) -> Option<GradingResult> {
        let mut state = self.state.lock().await;
        if state.generation != generation {
            log::debug!(
                "Discarding stale result (run #{}, latest #{})",
                generation,
                state.generation
            );
            return None;
        }
        state.running = false;
        state.result = Some(result.clone());
        Some(result)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CodeRunner::default())
    }
}
