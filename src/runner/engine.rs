//! Execution engine
//!
//! Walks the run order for a target one task at a time: criteria, actions, error handling,
//! finally handlers, global setup and teardown. The outcome of every task reached is recorded
//! in an [`ExecutionReport`].

use crate::error::{ConfigError, ExecutionError, KilnError, Result};
use crate::graph::Graph;
use crate::runner::{Context, ExecutionReport, ExecutionStrategy, TaskExecutionStatus};
use crate::task::{Action, Criteria, TaskDefinition, TaskRegistry};
use crate::ui::Log;
use std::sync::Arc;
use std::time::Instant;

/// What to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSettings {
    /// Target task name
    pub target: String,

    /// Run only the target, without its dependencies
    pub exclusive: bool,
}

impl ExecutionSettings {
    pub fn new(target: impl Into<String>) -> Self {
        ExecutionSettings {
            target: target.into(),
            exclusive: false,
        }
    }

    pub fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }
}

/// How a single task ended
enum TaskOutcome {
    Completed(TaskExecutionStatus),
    /// Failed with `continue_on_error` set; the run goes on
    Continued,
    /// Failed and the run must stop
    Aborted(anyhow::Error),
}

/// Runs tasks from a registry in dependency order
pub struct Engine {
    log: Arc<dyn Log>,
    setup: Option<Action>,
    teardown: Option<Action>,
}

impl Engine {
    pub fn new(log: Arc<dyn Log>) -> Self {
        Engine {
            log,
            setup: None,
            teardown: None,
        }
    }

    /// Action run once before the first task that is not skipped
    pub fn register_setup_action(&mut self, action: Action) {
        self.setup = Some(action);
    }

    /// Action run once after the last task, whether the run failed or not
    pub fn register_teardown_action(&mut self, action: Action) {
        self.teardown = Some(action);
    }

    /// Compute the run order for the settings without running anything
    pub fn plan(&self, registry: &TaskRegistry, settings: &ExecutionSettings) -> Result<Vec<String>> {
        let graph = Graph::build(registry.tasks())?;
        let order = if settings.exclusive {
            vec![graph.resolve(&settings.target)?.to_string()]
        } else {
            graph.traverse(&settings.target)?
        };
        Ok(order)
    }

    /// Run the target and its dependencies
    ///
    /// Configuration errors are returned before anything runs. A task failure that is neither
    /// handled nor continued aborts the run with [`ExecutionError::TaskFailed`] after the
    /// task's finally handler and the global teardown ran. Continued failures are only
    /// recorded in the returned report.
    pub async fn run_target(
        &self,
        ctx: &mut Context,
        registry: &TaskRegistry,
        strategy: &dyn ExecutionStrategy,
        settings: &ExecutionSettings,
    ) -> Result<ExecutionReport> {
        let order = self.plan(registry, settings)?;
        self.log.verbose(&format!("Run order: {}", order.join(" -> ")));

        let mut report = ExecutionReport::new();
        let result = self.run_tasks(ctx, registry, strategy, &order, &mut report).await;
        let teardown = self.perform_teardown(ctx, strategy).await;

        match (result, teardown) {
            (Ok(()), Ok(())) => Ok(report),
            (Ok(()), Err(source)) => {
                self.log.error(&format!("An error occurred in the teardown: {:#}", source));
                Err(ExecutionError::TeardownFailed { source, report }.into())
            }
            (Err(failure), teardown) => {
                if let Err(source) = teardown {
                    self.log.error(&format!("An error occurred in the teardown: {:#}", source));
                }
                Err(failure.into_error(report))
            }
        }
    }

    async fn run_tasks(
        &self,
        ctx: &mut Context,
        registry: &TaskRegistry,
        strategy: &dyn ExecutionStrategy,
        order: &[String],
        report: &mut ExecutionReport,
    ) -> std::result::Result<(), RunFailure> {
        let mut setup_done = false;

        for name in order {
            let task = registry
                .find_task(name)
                .ok_or_else(|| RunFailure::Config(ConfigError::TargetNotFound(name.clone())))?;
            let started = Instant::now();

            if let Some(criteria) = self.first_failing_criteria(task, ctx)? {
                strategy.skip(task, Some(criteria));
                report.add(task.name(), started.elapsed(), TaskExecutionStatus::Skipped);
                self.invoke_finally(task, ctx, strategy);
                continue;
            }

            if !setup_done {
                setup_done = true;
                self.perform_setup(ctx, strategy).await?;
            }

            self.log.information("");
            self.log.information(&format!("Executing task: {}", task.name()));

            match self.execute_task(task, ctx, strategy).await {
                TaskOutcome::Completed(status) => {
                    report.add(task.name(), started.elapsed(), status);
                    self.invoke_finally(task, ctx, strategy);
                    self.log.verbose(&format!(
                        "Finished executing task: {} ({:?})",
                        task.name(),
                        started.elapsed()
                    ));
                }
                TaskOutcome::Continued => {
                    report.add(task.name(), started.elapsed(), TaskExecutionStatus::Failed);
                    self.invoke_finally(task, ctx, strategy);
                }
                TaskOutcome::Aborted(source) => {
                    report.add(task.name(), started.elapsed(), TaskExecutionStatus::Failed);
                    self.invoke_finally(task, ctx, strategy);
                    return Err(RunFailure::Task {
                        task: task.name().to_string(),
                        source,
                    });
                }
            }
        }

        Ok(())
    }

    /// Evaluate criteria in order and return the first one that is false
    fn first_failing_criteria<'t>(
        &self,
        task: &'t TaskDefinition,
        ctx: &Context,
    ) -> std::result::Result<Option<&'t Criteria>, RunFailure> {
        for criteria in task.criteria() {
            let passed = criteria.evaluate(ctx).map_err(|source| RunFailure::Criteria {
                task: task.name().to_string(),
                source,
            })?;
            if !passed {
                return Ok(Some(criteria));
            }
        }
        Ok(None)
    }

    async fn execute_task(
        &self,
        task: &TaskDefinition,
        ctx: &mut Context,
        strategy: &dyn ExecutionStrategy,
    ) -> TaskOutcome {
        let error = match strategy.execute(task, ctx).await {
            Ok(()) if task.has_actions() => return TaskOutcome::Completed(TaskExecutionStatus::Executed),
            Ok(()) => return TaskOutcome::Completed(TaskExecutionStatus::Delegated),
            Err(error) => error,
        };

        let error = match self.handle_error(task, error, ctx, strategy) {
            None => {
                self.log.warning(&format!(
                    "Error in task '{}' was handled by its error handler",
                    task.name()
                ));
                return TaskOutcome::Completed(TaskExecutionStatus::Handled);
            }
            Some(error) => error,
        };

        if task.continue_on_error() {
            self.log.warning(&format!(
                "Task '{}' failed but continue on error is set: {:#}",
                task.name(),
                error
            ));
            return TaskOutcome::Continued;
        }

        self.log.error(&format!(
            "An error occurred when executing task '{}'.",
            task.name()
        ));
        self.log.error(&format!("Error: {:#}", error));
        TaskOutcome::Aborted(error)
    }

    /// Pass the error through the task's error handlers; returns the error still
    /// unhandled, if any
    fn handle_error(
        &self,
        task: &TaskDefinition,
        error: anyhow::Error,
        ctx: &mut Context,
        strategy: &dyn ExecutionStrategy,
    ) -> Option<anyhow::Error> {
        if task.error_handlers().is_empty() {
            return Some(error);
        }

        self.log.verbose(&format!("Executing error handler for task: {}", task.name()));
        for handler in task.error_handlers() {
            if let Err(rethrown) = strategy.handle_error(handler, &error, ctx) {
                return Some(rethrown);
            }
        }
        None
    }

    fn invoke_finally(&self, task: &TaskDefinition, ctx: &mut Context, strategy: &dyn ExecutionStrategy) {
        let Some(handler) = task.finally_handler() else {
            return;
        };

        self.log.verbose(&format!("Executing finally handler for task: {}", task.name()));
        if let Err(e) = strategy.invoke_finally(handler, ctx) {
            self.log.error(&format!(
                "An error occurred in the finally handler of task '{}': {:#}",
                task.name(),
                e
            ));
        }
    }

    async fn perform_setup(
        &self,
        ctx: &mut Context,
        strategy: &dyn ExecutionStrategy,
    ) -> std::result::Result<(), RunFailure> {
        let Some(action) = &self.setup else {
            return Ok(());
        };

        strategy.perform_setup(action, ctx).await.map_err(|source| {
            self.log.error(&format!("An error occurred in the setup: {:#}", source));
            RunFailure::Setup(source)
        })
    }

    async fn perform_teardown(&self, ctx: &mut Context, strategy: &dyn ExecutionStrategy) -> anyhow::Result<()> {
        match &self.teardown {
            Some(action) => strategy.perform_teardown(action, ctx).await,
            None => Ok(()),
        }
    }
}

/// Why the task walk stopped early
enum RunFailure {
    Config(ConfigError),
    Criteria { task: String, source: anyhow::Error },
    Setup(anyhow::Error),
    Task { task: String, source: anyhow::Error },
}

impl RunFailure {
    fn into_error(self, report: ExecutionReport) -> KilnError {
        match self {
            RunFailure::Config(e) => e.into(),
            RunFailure::Criteria { task, source } => ConfigError::CriteriaFailed {
                task,
                source,
                report,
            }
            .into(),
            RunFailure::Setup(source) => ExecutionError::SetupFailed { source, report }.into(),
            RunFailure::Task { task, source } => ExecutionError::TaskFailed {
                task,
                source,
                report,
            }
            .into(),
        }
    }
}
