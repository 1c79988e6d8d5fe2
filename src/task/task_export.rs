use crate::error::{AppError, Result};
use crate::task::task_models::Task;
use chrono::{DateTime, SecondsFormat, Utc};

pub const CSV_FILENAME: &str = "quicktask_tasks.csv";

pub const CSV_HEADERS: [&str; 6] = [
    "Title",
    "Description",
    "Priority",
    "Status",
    "Due Date",
    "Created At",
];

fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn csv_error(e: impl std::fmt::Display) -> AppError {
    tracing::error!("CSV export failed: {}", e);
    AppError::InternalError
}

/// Renders the fixed export columns; ids and owner references are never written.
pub fn tasks_to_csv(tasks: &[Task]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(CSV_HEADERS).map_err(csv_error)?;

    for task in tasks {
        let due_date = task.due_date.as_ref().map(timestamp).unwrap_or_default();
        writer
            .write_record([
                task.title.as_str(),
                task.description.as_str(),
                task.priority.as_str(),
                task.status.as_str(),
                due_date.as_str(),
                timestamp(&task.created_at).as_str(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}
