//! Execution report printer

use crate::runner::{ExecutionReport, TaskExecutionStatus};
use colored::Colorize;
use std::time::Duration;

const NAME_COLUMN_WIDTH: usize = 30;

/// One line of the report table; task rows carry their status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub text: String,
    pub status: Option<TaskExecutionStatus>,
}

/// Lay out the report table: header, rule, one row per task, rule, total
pub fn report_rows(report: &ExecutionReport) -> Vec<ReportRow> {
    let width = column_width(report);
    let rule = "-".repeat(width + 20);
    let plain = |text: String| ReportRow { text, status: None };

    let mut rows = vec![
        plain(format!("{:<width$}{}", "Task", "Duration", width = width)),
        plain(rule.clone()),
    ];
    for entry in report.entries() {
        rows.push(ReportRow {
            text: format!(
                "{:<width$}{}",
                entry.task_name,
                outcome(entry.status, entry.duration),
                width = width
            ),
            status: Some(entry.status),
        });
    }
    rows.push(plain(rule));
    rows.push(plain(format!(
        "{:<width$}{}",
        "Total:",
        format_duration(report.total_duration()),
        width = width
    )));
    rows
}

/// Render the report as a plain-text table
pub fn render_report(report: &ExecutionReport) -> String {
    report_rows(report)
        .into_iter()
        .map(|row| row.text + "\n")
        .collect()
}

/// Print the report to stdout, colored by task status
pub fn print_report(report: &ExecutionReport) {
    if report.is_empty() {
        return;
    }

    println!();
    for row in report_rows(report) {
        let line = row.text.as_str();
        match row.status {
            Some(TaskExecutionStatus::Executed) => println!("{}", line.green()),
            Some(TaskExecutionStatus::Delegated | TaskExecutionStatus::Skipped) => println!("{}", line.dimmed()),
            Some(TaskExecutionStatus::Handled) => println!("{}", line.yellow()),
            Some(TaskExecutionStatus::Failed) => println!("{}", line.red()),
            None if line.starts_with('-') => println!("{}", line),
            None => println!("{}", line.green()),
        }
    }
}

fn column_width(report: &ExecutionReport) -> usize {
    report
        .entries()
        .iter()
        .map(|entry| entry.task_name.len() + 2)
        .max()
        .unwrap_or(0)
        .max(NAME_COLUMN_WIDTH)
}

fn outcome(status: TaskExecutionStatus, duration: Duration) -> String {
    match status {
        TaskExecutionStatus::Skipped => "Skipped".to_string(),
        TaskExecutionStatus::Failed => format!("{} (Failed)", format_duration(duration)),
        TaskExecutionStatus::Handled => format!("{} (Handled)", format_duration(duration)),
        TaskExecutionStatus::Executed | TaskExecutionStatus::Delegated => format_duration(duration),
    }
}

/// Format as `hh:mm:ss.fffffff`
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:07}",
        total_seconds / 3600,
        (total_seconds / 60) % 60,
        total_seconds % 60,
        duration.subsec_nanos() / 100
    )
}
