//! Command-line host
//!
//! A build program registers its tasks and hands the registry to [`App`], which parses the
//! command line, picks the execution mode and turns the outcome into an exit code.

use crate::config::{load_settings, ExecutionMode, Settings};
use crate::error::{KilnError, SettingsError};
use crate::runner::{
    print_descriptions, print_tree, Context, DryRunStrategy, Engine, ExecutionReport, ExecutionSettings,
    RealStrategy,
};
use crate::task::{Action, TaskRegistry};
use crate::ui::{print_report, ConsoleLog, Log, Verbosity};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI application
pub struct App {
    /// Registered tasks
    registry: TaskRegistry,
    setup: Option<Action>,
    teardown: Option<Action>,
    /// Log sink overriding the console
    log: Option<Arc<dyn Log>>,
}

impl App {
    pub fn new(registry: TaskRegistry) -> Self {
        App {
            registry,
            setup: None,
            teardown: None,
            log: None,
        }
    }

    /// Action run once before the first task that is not skipped
    pub fn with_setup(mut self, action: Action) -> Self {
        self.setup = Some(action);
        self
    }

    /// Action run once after the last task
    pub fn with_teardown(mut self, action: Action) -> Self {
        self.teardown = Some(action);
        self
    }

    /// Write to this log instead of the console
    pub fn with_log(mut self, log: Arc<dyn Log>) -> Self {
        self.log = Some(log);
        self
    }

    /// Run with the process arguments
    pub async fn run(self) -> i32 {
        self.run_from(std::env::args_os()).await
    }

    /// Run with the given arguments and return the process exit code
    pub async fn run_from<I, T>(self, args: I) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match build_command().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) => {
                let _ = e.print();
                return e.exit_code();
            }
        };

        let (settings, mode) = match resolve_settings(&matches) {
            Ok(resolved) => resolved,
            Err(e) => {
                eprintln!("Error: {}", e);
                return e.exit_code();
            }
        };

        let log = self
            .log
            .clone()
            .unwrap_or_else(|| Arc::new(ConsoleLog::new(settings.verbosity())) as Arc<dyn Log>);

        match self.execute(&settings, mode, Arc::clone(&log)).await {
            Ok(Some(report)) => {
                if settings.show_report && log.verbosity() > Verbosity::Silent {
                    print_report(&report);
                }
                if report.has_failures() {
                    log.error("One or more tasks failed.");
                    1
                } else {
                    0
                }
            }
            Ok(None) => 0,
            Err(e) => {
                if let Some(report) = e.report() {
                    if settings.show_report && log.verbosity() > Verbosity::Silent {
                        print_report(report);
                    }
                }
                log.error(&format!("Error: {}", e));
                e.exit_code()
            }
        }
    }

    async fn execute(
        &self,
        settings: &Settings,
        mode: ExecutionMode,
        log: Arc<dyn Log>,
    ) -> Result<Option<ExecutionReport>, KilnError> {
        match mode {
            ExecutionMode::Description => {
                print_descriptions(&self.registry, log.as_ref())?;
                Ok(None)
            }
            ExecutionMode::Tree => {
                print_tree(&self.registry, log.as_ref())?;
                Ok(None)
            }
            ExecutionMode::Run | ExecutionMode::DryRun => {
                let mut engine = Engine::new(Arc::clone(&log));
                if let Some(action) = &self.setup {
                    engine.register_setup_action(action.clone());
                }
                if let Some(action) = &self.teardown {
                    engine.register_teardown_action(action.clone());
                }

                let mut ctx = Context::new(Arc::clone(&log)).with_arguments(settings.arguments.clone());
                let execution =
                    ExecutionSettings::new(settings.target()).with_exclusive(settings.exclusive);

                let report = if mode == ExecutionMode::DryRun {
                    log.warning("Performing dry run...");
                    log.warning("NOTE: This is a dry run. No actions will be executed.");
                    let strategy = DryRunStrategy::new(Arc::clone(&log));
                    engine
                        .run_target(&mut ctx, &self.registry, &strategy, &execution)
                        .await?
                } else {
                    let strategy = RealStrategy::new(Arc::clone(&log));
                    engine
                        .run_target(&mut ctx, &self.registry, &strategy, &execution)
                        .await?
                };
                Ok(Some(report))
            }
        }
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("kiln")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Runs build tasks in dependency order")
        .arg(
            Arg::new("target")
                .value_name("TARGET")
                .help("Task to run (defaults to 'Default')"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to kiln.yml settings file"),
        )
        .arg(
            Arg::new("dryrun")
                .long("dryrun")
                .visible_aliases(["noop", "whatif"])
                .help("Show the tasks that would run without running them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("description")
                .long("description")
                .visible_alias("showdescription")
                .help("List tasks with their descriptions")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tree")
                .long("tree")
                .visible_alias("showtree")
                .help("Show the task dependency tree")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclusive")
                .short('e')
                .long("exclusive")
                .help("Run the target without its dependencies")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("argument")
                .short('a')
                .long("argument")
                .value_name("KEY=VALUE")
                .help("Argument made available to tasks")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("verbosity")
                .long("verbosity")
                .value_name("LEVEL")
                .help("silent, quiet, normal, verbose or diagnostic"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print warnings and errors")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue),
        )
}

/// Merge the settings file with the command line; flags win
fn resolve_settings(matches: &ArgMatches) -> Result<(Settings, ExecutionMode), KilnError> {
    let file = matches.get_one::<String>("file").map(PathBuf::from);
    let mut settings = load_settings(file.as_deref())?;

    if let Some(target) = matches.get_one::<String>("target") {
        settings.target = Some(target.clone());
    }
    if let Some(verbosity) = get_verbosity(matches)? {
        settings.verbosity = Some(verbosity);
    }
    settings.exclusive |= matches.get_flag("exclusive");
    settings.dry_run |= matches.get_flag("dryrun");

    if let Some(values) = matches.get_many::<String>("argument") {
        for value in values {
            let (key, val) = parse_argument(value)?;
            settings.arguments.insert(key, val);
        }
    }

    let mode = if matches.get_flag("description") {
        ExecutionMode::Description
    } else if matches.get_flag("tree") {
        ExecutionMode::Tree
    } else if settings.dry_run {
        ExecutionMode::DryRun
    } else {
        ExecutionMode::Run
    };

    Ok((settings, mode))
}

/// Get verbosity level from matches, if any flag sets it
fn get_verbosity(matches: &ArgMatches) -> Result<Option<Verbosity>, SettingsError> {
    if let Some(level) = matches.get_one::<String>("verbosity") {
        return Verbosity::parse(level)
            .map(Some)
            .ok_or_else(|| SettingsError::Invalid(format!("Unknown verbosity: {}", level)));
    }

    let verbosity = if matches.get_flag("silent") {
        Some(Verbosity::Silent)
    } else if matches.get_flag("quiet") {
        Some(Verbosity::Quiet)
    } else if matches.get_flag("verbose") {
        Some(Verbosity::Verbose)
    } else {
        None
    };
    Ok(verbosity)
}

/// Split a `key=value` argument
fn parse_argument(value: &str) -> Result<(String, String), SettingsError> {
    match value.split_once('=') {
        Some((key, val)) if !key.trim().is_empty() => Ok((key.trim().to_string(), val.to_string())),
        _ => Err(SettingsError::Invalid(format!(
            "Argument '{}' must have the form KEY=VALUE",
            value
        ))),
    }
}

/// Run a registry with the process arguments and return the exit code
pub async fn run(registry: TaskRegistry) -> i32 {
    App::new(registry).run().await
}
