//! Task definitions
//!
//! A [`TaskDefinition`] is assembled through a [`TaskBuilder`] while tasks are being
//! registered and is read-only once a run starts.

use crate::runner::Context;
use crate::task::same_task;
use futures::future::{self, BoxFuture};
use std::fmt;
use std::sync::Arc;

type ActionFn = dyn for<'a> Fn(&'a mut Context) -> BoxFuture<'a, anyhow::Result<()>> + Send + Sync;

/// Predicate deciding whether a task runs
pub type CriteriaFn = Arc<dyn Fn(&Context) -> anyhow::Result<bool> + Send + Sync>;

/// Handler invoked with the error of a failed action; returning `Err` rethrows
pub type ErrorHandlerFn = Arc<dyn Fn(&anyhow::Error, &mut Context) -> anyhow::Result<()> + Send + Sync>;

/// Handler invoked once after a task completes, skipped or not
pub type FinallyFn = Arc<dyn Fn(&mut Context) -> anyhow::Result<()> + Send + Sync>;

/// A unit of work, synchronous or asynchronous
#[derive(Clone)]
pub struct Action(Arc<ActionFn>);

impl Action {
    /// Wrap a synchronous closure
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&mut Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::from_async(move |ctx| {
            let result = f(ctx);
            Box::pin(future::ready(result))
        })
    }

    /// Wrap a closure returning a boxed future borrowing the context
    pub fn from_async<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, anyhow::Result<()>> + Send + Sync + 'static,
    {
        Action(Arc::new(f))
    }

    /// Run the action against the context
    pub fn invoke<'a>(&self, ctx: &'a mut Context) -> BoxFuture<'a, anyhow::Result<()>> {
        (self.0)(ctx)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action")
    }
}

/// A criteria predicate with an optional message shown when it causes a skip
#[derive(Clone)]
pub struct Criteria {
    predicate: CriteriaFn,
    message: Option<String>,
}

impl Criteria {
    pub fn new<F>(predicate: F, message: Option<String>) -> Self
    where
        F: Fn(&Context) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Criteria {
            predicate: Arc::new(predicate),
            message,
        }
    }

    pub fn evaluate(&self, ctx: &Context) -> anyhow::Result<bool> {
        (self.predicate)(ctx)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Debug for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criteria")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A named unit of work with its dependencies, criteria, actions and failure handling
#[derive(Clone)]
pub struct TaskDefinition {
    name: String,
    description: Option<String>,
    dependencies: Vec<String>,
    dependees: Vec<String>,
    criteria: Vec<Criteria>,
    actions: Vec<Action>,
    delayed_actions: Vec<Action>,
    error_handlers: Vec<ErrorHandlerFn>,
    finally_handler: Option<FinallyFn>,
    continue_on_error: bool,
}

impl TaskDefinition {
    pub(crate) fn new(name: String) -> Self {
        TaskDefinition {
            name,
            description: None,
            dependencies: Vec::new(),
            dependees: Vec::new(),
            criteria: Vec::new(),
            actions: Vec::new(),
            delayed_actions: Vec::new(),
            error_handlers: Vec::new(),
            finally_handler: None,
            continue_on_error: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Names of the tasks that must run before this one, in declaration order
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Names of the tasks this task declared itself a dependency of
    pub fn dependees(&self) -> &[String] {
        &self.dependees
    }

    pub fn criteria(&self) -> &[Criteria] {
        &self.criteria
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn delayed_actions(&self) -> &[Action] {
        &self.delayed_actions
    }

    pub fn error_handlers(&self) -> &[ErrorHandlerFn] {
        &self.error_handlers
    }

    pub fn finally_handler(&self) -> Option<&FinallyFn> {
        self.finally_handler.as_ref()
    }

    pub fn continue_on_error(&self) -> bool {
        self.continue_on_error
    }

    /// Whether the task does any work of its own, as opposed to only aggregating dependencies
    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty() || !self.delayed_actions.is_empty()
    }
}

impl fmt::Debug for TaskDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("dependencies", &self.dependencies)
            .field("dependees", &self.dependees)
            .field("criteria", &self.criteria)
            .field("actions", &self.actions.len())
            .field("delayed_actions", &self.delayed_actions.len())
            .field("error_handlers", &self.error_handlers.len())
            .field("finally_handler", &self.finally_handler.is_some())
            .field("continue_on_error", &self.continue_on_error)
            .finish()
    }
}

/// Fluent builder for a task that is already registered
///
/// ```
/// # use kiln::task::TaskRegistry;
/// let mut registry = TaskRegistry::new();
/// registry.register_task("Clean").unwrap().does(|_| Ok(()));
/// registry
///     .register_task("Build")
///     .unwrap()
///     .description("Compile everything")
///     .is_dependent_on("Clean")
///     .does(|ctx| {
///         ctx.log().information("building");
///         Ok(())
///     });
/// ```
pub struct TaskBuilder<'r> {
    task: &'r mut TaskDefinition,
}

impl<'r> TaskBuilder<'r> {
    pub(crate) fn new(task: &'r mut TaskDefinition) -> Self {
        TaskBuilder { task }
    }

    /// Name of the task being built
    pub fn name(&self) -> &str {
        &self.task.name
    }

    pub fn description(self, description: impl Into<String>) -> Self {
        self.task.description = Some(description.into());
        self
    }

    /// Add a dependency; a name already present (ignoring case) is not added twice
    pub fn is_dependent_on(self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !contains_ignore_case(&self.task.dependencies, &name) {
            self.task.dependencies.push(name);
        }
        self
    }

    /// Declare this task a dependency of another task
    pub fn is_dependee_of(self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !contains_ignore_case(&self.task.dependees, &name) {
            self.task.dependees.push(name);
        }
        self
    }

    pub fn with_criteria<F>(self, predicate: F) -> Self
    where
        F: Fn(&Context) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.task.criteria.push(Criteria::new(predicate, None));
        self
    }

    /// Add a criteria whose message is logged when it causes the task to be skipped
    pub fn with_criteria_message<F>(self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Context) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.task
            .criteria
            .push(Criteria::new(predicate, Some(message.into())));
        self
    }

    pub fn does<F>(self, f: F) -> Self
    where
        F: Fn(&mut Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.task.actions.push(Action::from_fn(f));
        self
    }

    pub fn does_async<F>(self, f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, anyhow::Result<()>> + Send + Sync + 'static,
    {
        self.task.actions.push(Action::from_async(f));
        self
    }

    /// Add an action that runs after all main actions have succeeded
    pub fn deferred<F>(self, f: F) -> Self
    where
        F: Fn(&mut Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.task.delayed_actions.push(Action::from_fn(f));
        self
    }

    pub fn on_error<F>(self, handler: F) -> Self
    where
        F: Fn(&anyhow::Error, &mut Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.task.error_handlers.push(Arc::new(handler));
        self
    }

    /// Set the handler that always runs once the task is done, replacing any previous one
    pub fn finally<F>(self, handler: F) -> Self
    where
        F: Fn(&mut Context) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.task.finally_handler = Some(Arc::new(handler));
        self
    }

    pub fn continue_on_error(self) -> Self {
        self.task.continue_on_error = true;
        self
    }
}

fn contains_ignore_case(names: &[String], name: &str) -> bool {
    names.iter().any(|n| same_task(n, name))
}
