//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use adjutant_domain::{ActionItem, ItemStatus};
use adjutant_pipeline::ImportResult;
use adjutant_sync::SyncReport;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format action items.
    pub fn format_items(&self, items: &[ActionItem]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
            OutputFormat::Table => Ok(self.format_items_table(items)),
            OutputFormat::Quiet => Ok(items
                .iter()
                .map(|i| i.external_id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_items_table(&self, items: &[ActionItem]) -> String {
        if items.is_empty() {
            return self.colorize("No action items found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Status", "Due", "Priority", "Owner", "Task", "Source"]);

        for item in items {
            let status = match item.status {
                ItemStatus::Done => "done",
                ItemStatus::Todo => "todo",
            };
            let due = item
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            let source = item
                .provenance
                .folder
                .clone()
                .or_else(|| item.provenance.doc_name.clone())
                .unwrap_or_else(|| item.provenance.kind.as_str().to_string());

            builder.push_record([
                &item.external_id.as_str()[..8], // Truncate ID for readability
                status,
                &due,
                item.priority.as_str(),
                &item.owner,
                &item.text,
                &source,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format an import result summary.
    pub fn format_import(&self, result: &ImportResult) -> Result<String> {
        if matches!(self.format, OutputFormat::Json) {
            return Ok(serde_json::to_string_pretty(result)?);
        }

        let mut out = String::new();
        for (folder, items) in &result.by_folder {
            out.push_str(&format!("{}: {} items\n", folder, items.len()));
        }
        out.push_str(&format!(
            "\n{} items from {} documents ({} todo, {} done), {} failures, {} files skipped\n",
            result.items.len(),
            result.stats.docs_processed,
            result.stats.todo_count,
            result.stats.done_count,
            result.stats.docs_failed,
            result.stats.files_skipped,
        ));

        for failure in &result.failures {
            let name = failure.doc_name.as_deref().unwrap_or("(unknown)");
            out.push_str(&self.error(&format!("{}: {}", name, failure.reason)));
            out.push('\n');
        }

        Ok(out)
    }

    /// Format a workspace sync summary.
    pub fn format_sync(&self, report: &SyncReport) -> String {
        let mut out = self.success(&format!(
            "Workspace sync: {} created, {} updated",
            report.created, report.updated
        ));
        for failure in &report.failures {
            out.push('\n');
            out.push_str(&self.error(&format!("{}: {}", failure.text, failure.reason)));
        }
        out
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        match color {
            "green" => text.green().to_string(),
            "red" => text.red().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
