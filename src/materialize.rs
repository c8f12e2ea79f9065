//! Materialization of every configuration document.
//!
//! A run loads each document (seeding missing ones from their templates),
//! overlays its environment bindings, then writes them all back. Loading and
//! overlaying finish for every document before anything is rewritten, so a
//! fatal error on a later document leaves earlier live files as they were
//! (apart from freshly seeded ones).

use crate::binding::apply_bindings;
use crate::catalog::DocumentKind;
use crate::config::{RunConfig, ServerConfigPolicy};
use crate::document::ConfigDocument;
use crate::env::{EnvSource, ProcessEnv};
use crate::error::{Error, OverrideError, Result};
use crate::store::{self, DocumentOrigin};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What happened to one document during a run.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub kind: DocumentKind,
    pub path: PathBuf,
    pub origin: DocumentOrigin,
    /// Variables written into the document.
    pub applied: Vec<&'static str>,
    /// Overrides that resolved but were not persisted because the existing
    /// file was kept.
    pub dropped: Vec<&'static str>,
    /// Overrides that were rejected, rendered for display.
    #[serde(serialize_with = "serialize_errors")]
    pub rejected: Vec<OverrideError>,
    /// Whether the document was written back at the end of the run.
    pub written: bool,
}

fn serialize_errors<S: serde::Serializer>(
    errors: &[OverrideError],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MaterializeReport {
    pub documents: Vec<DocumentReport>,
}

impl MaterializeReport {
    pub fn document(&self, kind: DocumentKind) -> Option<&DocumentReport> {
        self.documents.iter().find(|d| d.kind == kind)
    }

    /// Every rejected override across all documents.
    pub fn rejected(&self) -> impl Iterator<Item = &OverrideError> {
        self.documents.iter().flat_map(|d| d.rejected.iter())
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected().count()
    }
}

struct Staged {
    document: ConfigDocument,
    report: DocumentReport,
}

/// Runs the load, overlay and write phases for all documents.
#[derive(Debug, Clone)]
pub struct Materializer {
    config: RunConfig,
}

impl Materializer {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Materialize every document using `env` for overrides.
    pub fn run(&self, env: &dyn EnvSource) -> Result<MaterializeReport> {
        let mut staged = Vec::with_capacity(DocumentKind::ALL.len());
        for kind in DocumentKind::ALL {
            staged.push(self.stage(kind, env)?);
        }

        if self.config.strict {
            let errors: Vec<OverrideError> = staged
                .iter()
                .flat_map(|s| s.report.rejected.iter().cloned())
                .collect();
            if !errors.is_empty() {
                return Err(Error::OverridesRejected { errors });
            }
        }

        let mut report = MaterializeReport::default();
        for Staged {
            document,
            report: mut doc_report,
        } in staged
        {
            self.write(&mut doc_report, &document)?;
            info!(
                document = %doc_report.kind,
                origin = ?doc_report.origin,
                applied = doc_report.applied.len(),
                dropped = doc_report.dropped.len(),
                rejected = doc_report.rejected.len(),
                written = doc_report.written,
                "Materialized document"
            );
            report.documents.push(doc_report);
        }

        Ok(report)
    }

    fn stage(&self, kind: DocumentKind, env: &dyn EnvSource) -> Result<Staged> {
        let paths = &self.config.paths;
        let path = paths.live_path(kind);
        let default_path = paths.default_path(kind);

        let loaded = match kind {
            // Serverconfig is never seeded; its write phase decides whether it lands on disk.
            DocumentKind::ServerConfig => store::load_or_default(kind.name(), &path, &default_path)?,
            _ => store::load_with_default(kind.name(), &path, &default_path)?,
        };
        debug!(document = %kind, origin = ?loaded.origin, path = %path.display(), "Loaded document");

        let mut document = loaded.document;
        let outcome = apply_bindings(&mut document, kind.bindings(), env);

        Ok(Staged {
            document,
            report: DocumentReport {
                kind,
                path,
                origin: loaded.origin,
                applied: outcome.applied,
                dropped: Vec::new(),
                rejected: outcome.errors,
                written: false,
            },
        })
    }

    fn write(&self, report: &mut DocumentReport, document: &ConfigDocument) -> Result<()> {
        match (report.kind, self.config.server_config) {
            (DocumentKind::ServerConfig, ServerConfigPolicy::Preserve) => {
                report.written = store::write_if_absent(&report.path, document)?;
                if !report.written && !report.applied.is_empty() {
                    report.dropped = std::mem::take(&mut report.applied);
                    warn!(
                        path = %report.path.display(),
                        ignored = ?report.dropped,
                        "Kept existing serverconfig; its environment overrides were not persisted"
                    );
                }
            }
            _ => {
                store::write_document(&report.path, document)?;
                report.written = true;
            }
        }
        Ok(())
    }
}

/// Materialize all documents from the process environment.
///
/// Reads the run configuration (see [`RunConfig::discover`]) and overlays
/// the real environment. Called once at startup, before the downstream
/// application is launched.
pub fn materialize_configuration() -> Result<MaterializeReport> {
    let env = ProcessEnv;
    let config = RunConfig::discover(&env)?;
    Materializer::new(config).run(&env)
}
