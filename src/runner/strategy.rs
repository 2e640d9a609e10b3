//! Execution strategies
//!
//! The engine decides what runs and when; a strategy decides what running means.
//! [`RealStrategy`] invokes user code, [`DryRunStrategy`] only lists the tasks that would run.

use crate::runner::Context;
use crate::task::{Action, Criteria, ErrorHandlerFn, FinallyFn, TaskDefinition};
use crate::ui::Log;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[async_trait]
pub trait ExecutionStrategy: Send + Sync {
    /// Run the global setup action
    async fn perform_setup(&self, action: &Action, ctx: &mut Context) -> anyhow::Result<()>;

    /// Run the global teardown action
    async fn perform_teardown(&self, action: &Action, ctx: &mut Context) -> anyhow::Result<()>;

    /// Run the task's actions, then its delayed actions once all actions succeeded
    async fn execute(&self, task: &TaskDefinition, ctx: &mut Context) -> anyhow::Result<()>;

    /// Note that a task was skipped; `criteria` is the one that evaluated to false
    fn skip(&self, task: &TaskDefinition, criteria: Option<&Criteria>);

    /// Pass an action error to one error handler; `Err` means the handler rethrew
    fn handle_error(
        &self,
        handler: &ErrorHandlerFn,
        error: &anyhow::Error,
        ctx: &mut Context,
    ) -> anyhow::Result<()>;

    /// Run the task's finally handler
    fn invoke_finally(&self, handler: &FinallyFn, ctx: &mut Context) -> anyhow::Result<()>;
}

/// Strategy that runs everything for real
pub struct RealStrategy {
    log: Arc<dyn Log>,
}

impl RealStrategy {
    pub fn new(log: Arc<dyn Log>) -> Self {
        RealStrategy { log }
    }
}

#[async_trait]
impl ExecutionStrategy for RealStrategy {
    async fn perform_setup(&self, action: &Action, ctx: &mut Context) -> anyhow::Result<()> {
        self.log.verbose("Executing custom setup action...");
        action.invoke(ctx).await
    }

    async fn perform_teardown(&self, action: &Action, ctx: &mut Context) -> anyhow::Result<()> {
        self.log.verbose("Executing custom teardown action...");
        action.invoke(ctx).await
    }

    async fn execute(&self, task: &TaskDefinition, ctx: &mut Context) -> anyhow::Result<()> {
        for action in task.actions() {
            action.invoke(ctx).await?;
        }
        for action in task.delayed_actions() {
            action.invoke(ctx).await?;
        }
        Ok(())
    }

    fn skip(&self, task: &TaskDefinition, criteria: Option<&Criteria>) {
        match criteria.and_then(Criteria::message) {
            Some(message) => self
                .log
                .verbose(&format!("Skipping task: {}: {}", task.name(), message)),
            None => self.log.verbose(&format!("Skipping task: {}", task.name())),
        }
    }

    fn handle_error(
        &self,
        handler: &ErrorHandlerFn,
        error: &anyhow::Error,
        ctx: &mut Context,
    ) -> anyhow::Result<()> {
        handler(error, ctx)
    }

    fn invoke_finally(&self, handler: &FinallyFn, ctx: &mut Context) -> anyhow::Result<()> {
        handler(ctx)
    }
}

/// Strategy that numbers the tasks that would run and invokes nothing
pub struct DryRunStrategy {
    log: Arc<dyn Log>,
    counter: AtomicUsize,
}

impl DryRunStrategy {
    pub fn new(log: Arc<dyn Log>) -> Self {
        DryRunStrategy {
            log,
            counter: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ExecutionStrategy for DryRunStrategy {
    async fn perform_setup(&self, _action: &Action, _ctx: &mut Context) -> anyhow::Result<()> {
        Ok(())
    }

    async fn perform_teardown(&self, _action: &Action, _ctx: &mut Context) -> anyhow::Result<()> {
        Ok(())
    }

    async fn execute(&self, task: &TaskDefinition, _ctx: &mut Context) -> anyhow::Result<()> {
        let position = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.information(&format!("{}. {}", position, task.name()));
        Ok(())
    }

    fn skip(&self, _task: &TaskDefinition, _criteria: Option<&Criteria>) {}

    fn handle_error(
        &self,
        _handler: &ErrorHandlerFn,
        _error: &anyhow::Error,
        _ctx: &mut Context,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn invoke_finally(&self, _handler: &FinallyFn, _ctx: &mut Context) -> anyhow::Result<()> {
        Ok(())
    }
}
