// Rendering and export of extracted hierarchies

use crate::model::HierarchyResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const DEFAULT_OUTPUT_FILE: &str = "modules.json";
pub const OUTPUT_MIME: &str = "application/json";
pub const DEFAULT_FORMAT: &str = "text";

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const WRAP_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

pub fn render(result: &HierarchyResult, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => to_json(result),
        OutputFormat::Markdown => Ok(render_markdown(result)),
    }
}

/// Indented JSON, the `modules.json` artifact.
pub fn to_json(result: &HierarchyResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

pub fn render_text(result: &HierarchyResult) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str(&format!("📦 {}\n", display_or(&result.product, "Product")));
    report.push_str(RULE);
    report.push('\n');

    if !result.overview.is_empty() {
        report.push_str("Overview:\n");
        report.push_str(&wrap_text(&result.overview, WRAP_WIDTH, "  "));
        report.push('\n');
    }

    report.push_str(&format!(
        "Modules: {}    Features: {}\n\n",
        result.modules.len(),
        result.feature_count()
    ));

    for (idx, module) in result.modules.iter().enumerate() {
        report.push_str(&format!(
            "🧩 Module {}: {}\n",
            idx + 1,
            display_or(&module.module_name, "Unnamed module")
        ));

        if !module.purpose.is_empty() {
            report.push_str("  Purpose:\n");
            report.push_str(&wrap_text(&module.purpose, WRAP_WIDTH, "    "));
        }

        if !module.submodules.is_empty() {
            report.push_str("  Features:\n");
            for sub in &module.submodules {
                report.push_str(&format!("    ✨ {}\n", display_or(&sub.name, "Unnamed feature")));
                report.push_str(&wrap_text(&sub.details, WRAP_WIDTH, "       "));
            }
        }

        report.push_str("\n────────────────────────────────────────────────────────────────────────────────\n\n");
    }

    report
}

pub fn render_markdown(result: &HierarchyResult) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", display_or(&result.product, "Product")));

    if !result.overview.is_empty() {
        md.push_str(&format!("**Overview:** {}\n\n", result.overview));
    }

    for (idx, module) in result.modules.iter().enumerate() {
        md.push_str(&format!(
            "## Module {}: {}\n\n",
            idx + 1,
            display_or(&module.module_name, "Unnamed module")
        ));

        if !module.purpose.is_empty() {
            md.push_str(&format!("**Purpose:** {}\n\n", module.purpose));
        }

        if !module.submodules.is_empty() {
            md.push_str("### Features\n\n");
            for sub in &module.submodules {
                let name = display_or(&sub.name, "Unnamed feature");
                if sub.details.is_empty() {
                    md.push_str(&format!("- **{}**\n", name));
                } else {
                    md.push_str(&format!("- **{}**: {}\n", name, sub.details));
                }
            }
            md.push('\n');
        }
    }

    md
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() { fallback } else { value }
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if !current_line.is_empty()
            && current_line.chars().count() + word.chars().count() + 1 > width - indent.len()
        {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}
