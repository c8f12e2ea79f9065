//! Output formatting for the binding catalog and run reports.

use crate::catalog::DocumentKind;
use crate::materialize::MaterializeReport;
use crate::store::DocumentOrigin;
use serde_json::{Value, json};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

/// The binding catalog as JSON, grouped by document.
pub fn bindings_json(kinds: &[DocumentKind]) -> Value {
    let documents: Vec<Value> = kinds
        .iter()
        .map(|kind| {
            let bindings: Vec<Value> = kind
                .bindings()
                .iter()
                .map(|b| {
                    json!({
                        "variable": b.variable,
                        "type": b.tag,
                        "path": b.path.segments(),
                    })
                })
                .collect();
            json!({
                "document": kind,
                "file": kind.file_name(),
                "template": kind.default_file_name(),
                "bindings": bindings,
            })
        })
        .collect();
    json!({ "documents": documents })
}

/// The binding catalog as an aligned plain-text table.
pub fn bindings_text(kinds: &[DocumentKind]) -> String {
    let width = kinds
        .iter()
        .flat_map(|kind| kind.bindings())
        .map(|b| b.variable.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for kind in kinds {
        out.push_str(&format!("{} ({})\n", kind, kind.file_name()));
        for binding in kind.bindings() {
            out.push_str(&format!(
                "  {:<width$}  {:<8}  {}\n",
                binding.variable,
                binding.tag.as_str(),
                binding.path,
                width = width
            ));
        }
        out.push('\n');
    }
    out
}

/// Render the catalog in the requested format.
pub fn format_bindings(format: OutputFormat, kinds: &[DocumentKind]) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&bindings_json(kinds)),
        OutputFormat::Text => Ok(bindings_text(kinds)),
    }
}

fn origin_label(origin: DocumentOrigin) -> &'static str {
    match origin {
        DocumentOrigin::Existing => "existing",
        DocumentOrigin::Seeded => "seeded from defaults",
        DocumentOrigin::Template => "from defaults",
    }
}

/// Render a run report in the requested format.
pub fn format_report(format: OutputFormat, report: &MaterializeReport) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Text => Ok(report_text(report)),
    }
}

/// One summary line per document.
pub fn report_text(report: &MaterializeReport) -> String {
    let mut out = String::new();
    for doc in &report.documents {
        out.push_str(&format!(
            "{}: {}, {} override(s) applied",
            doc.path.display(),
            origin_label(doc.origin),
            doc.applied.len()
        ));
        if !doc.written {
            out.push_str(", kept as-is");
        }
        if !doc.dropped.is_empty() {
            out.push_str(&format!(", {} override(s) not persisted", doc.dropped.len()));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_json_shape() {
        let value = bindings_json(&DocumentKind::ALL);
        let documents = value["documents"].as_array().unwrap();
        assert_eq!(documents.len(), DocumentKind::ALL.len());

        let credentials = &documents[0];
        assert_eq!(credentials["document"], json!("credentials"));
        assert_eq!(credentials["template"], json!("default_credentials.json"));
        assert_eq!(
            credentials["bindings"][0],
            json!({"variable": "DISCORD_TOKEN", "type": "string", "path": ["discord", "token"]})
        );
    }

    #[test]
    fn test_bindings_text_lists_every_variable() {
        let text = bindings_text(&DocumentKind::ALL);
        for kind in DocumentKind::ALL {
            assert!(text.contains(&kind.file_name()));
            for binding in kind.bindings() {
                assert!(text.contains(binding.variable), "{} missing", binding.variable);
            }
        }
        assert!(text.contains("defaultStats.speed"));
    }

    #[test]
    fn test_report_text() {
        use crate::materialize::DocumentReport;
        use std::path::PathBuf;

        let report = MaterializeReport {
            documents: vec![
                DocumentReport {
                    kind: DocumentKind::Settings,
                    path: PathBuf::from("Configs/settings.json"),
                    origin: DocumentOrigin::Seeded,
                    applied: vec!["COMMAND_PREFIX"],
                    dropped: vec![],
                    rejected: vec![],
                    written: true,
                },
                DocumentReport {
                    kind: DocumentKind::ServerConfig,
                    path: PathBuf::from("Configs/serverconfig.json"),
                    origin: DocumentOrigin::Existing,
                    applied: vec![],
                    dropped: vec!["LOG_CHANNEL"],
                    rejected: vec![],
                    written: false,
                },
            ],
        };
        assert_eq!(
            report_text(&report),
            "Configs/settings.json: seeded from defaults, 1 override(s) applied\n\
             Configs/serverconfig.json: existing, 0 override(s) applied, kept as-is, \
             1 override(s) not persisted\n"
        );
    }

    #[test]
    fn test_report_json_lists_dropped_overrides() {
        let report = MaterializeReport {
            documents: vec![crate::materialize::DocumentReport {
                kind: DocumentKind::ServerConfig,
                path: std::path::PathBuf::from("Configs/serverconfig.json"),
                origin: DocumentOrigin::Existing,
                applied: vec![],
                dropped: vec!["LOG_CHANNEL"],
                rejected: vec![],
                written: false,
            }],
        };
        let text = format_report(OutputFormat::Json, &report).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["documents"][0]["dropped"], json!(["LOG_CHANNEL"]));
        assert_eq!(value["documents"][0]["applied"], json!([]));
    }

    #[test]
    fn test_bindings_text_single_document() {
        let text = format_bindings(OutputFormat::Text, &[DocumentKind::Constants]).unwrap();
        assert!(text.starts_with("constants (constants.json)\n"));
        assert!(text.contains("OFFLINE_STATUS_INTERVAL"));
        assert!(!text.contains("DISCORD_TOKEN"));
    }
}
