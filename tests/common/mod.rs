//! Common test utilities

#![allow(dead_code)]

use kiln::runner::{Context, Engine, ExecutionReport, ExecutionSettings, RealStrategy};
use kiln::task::TaskRegistry;
use kiln::ui::{MemoryLog, Verbosity};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Ordered record of what tasks did
pub type Trace = Arc<Mutex<Vec<String>>>;

pub fn record(trace: &Trace, entry: &str) {
    trace.lock().unwrap().push(entry.to_string());
}

pub fn traced(trace: &Trace) -> Vec<String> {
    trace.lock().unwrap().clone()
}

/// Register a task whose single action appends its name to the trace
pub fn register_traced(registry: &mut TaskRegistry, trace: &Trace, name: &str, dependencies: &[&str]) {
    let t = trace.clone();
    let entry = name.to_string();
    let builder = registry.register_task(name).unwrap().does(move |_| {
        record(&t, &entry);
        Ok(())
    });
    dependencies
        .iter()
        .fold(builder, |builder, dependency| builder.is_dependent_on(*dependency));
}

/// Run a target for real, logging into memory
pub async fn run_target(
    registry: &TaskRegistry,
    target: &str,
) -> (kiln::Result<ExecutionReport>, Arc<MemoryLog>) {
    let log = Arc::new(MemoryLog::new(Verbosity::Diagnostic));
    let engine = Engine::new(log.clone());
    let mut ctx = Context::new(log.clone());
    let result = engine
        .run_target(
            &mut ctx,
            registry,
            &RealStrategy::new(log.clone()),
            &ExecutionSettings::new(target),
        )
        .await;
    (result, log)
}

/// Create a temporary directory with an empty kiln.yml, returning its path as a string
pub fn create_settings_file(content: &str) -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("kiln.yml");
    fs::write(&settings_path, content).unwrap();
    let path = settings_path.to_string_lossy().to_string();
    (temp_dir, path)
}
