//! Validation Pipeline
//!
//! Runs the stages in a fixed order: split, decode, then the schema, reference,
//! and include stages over the same tree and body. Syntax-group failures stop
//! the document with a single diagnostic; everything else is collected.

use crate::agent::coerce_validated_config;
use crate::diagnostics::{Diagnostic, DiagnosticReport};
use crate::document::{decode_header, split_frontmatter, ConfigTree, Frontmatter, RawDocument};
use crate::error::CheckError;
use crate::registry::{FragmentRegistry, Registry};
use crate::validation::{
    check_includes, check_schema, resolve_references, Schema, ValidationOptions,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tracing::{debug, info, warn};

/// Validator bound to one schema and one set of options.
///
/// Registries are passed per call so the caller owns their lifetime.
#[derive(Debug, Clone, Default)]
pub struct DocumentValidator {
    schema: Schema,
    options: ValidationOptions,
}

impl DocumentValidator {
    pub fn new(schema: Schema, options: ValidationOptions) -> Self {
        Self { schema, options }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate one document.
    ///
    /// `Err` is reserved for internal invariant violations; every problem with
    /// the document itself is a diagnostic in the report.
    pub fn validate(
        &self,
        document: &RawDocument,
        registry: &Registry,
        fragments: &FragmentRegistry,
    ) -> Result<DiagnosticReport, CheckError> {
        let path = document.display_path();

        let frontmatter = match split_frontmatter(document) {
            Ok(frontmatter) => frontmatter,
            Err(diagnostic) => return Ok(self.short_circuit(path, diagnostic)),
        };
        debug!(
            path = %path,
            header_start_line = frontmatter.header_start_line,
            body_start_line = frontmatter.body_start_line,
            "Split frontmatter"
        );

        let tree = match decode_header(&frontmatter.header_text, frontmatter.header_start_line) {
            Ok(tree) => tree,
            Err(diagnostic) => return Ok(self.short_circuit(path, diagnostic)),
        };
        debug!(path = %path, fields = tree.entries().len(), "Decoded header");

        let diagnostics = self.run_stages(&tree, &frontmatter, registry, fragments);
        let report = DiagnosticReport::assemble(path, diagnostics, || {
            coerce_validated_config(&tree, &self.schema)
        })?;

        if report.passed() {
            info!(
                path = report.path(),
                diagnostics = report.diagnostics().len(),
                "Agent document passed validation"
            );
        } else {
            warn!(
                path = report.path(),
                diagnostics = report.diagnostics().len(),
                "Agent document failed validation"
            );
        }
        Ok(report)
    }

    fn short_circuit(&self, path: String, diagnostic: Diagnostic) -> DiagnosticReport {
        warn!(
            path = %path,
            kind = %diagnostic.kind,
            line = diagnostic.location.line,
            "Agent document stopped at syntax stage"
        );
        DiagnosticReport::short_circuit(path, diagnostic)
    }

    /// Schema, reference, and include findings, concatenated in that order.
    fn run_stages(
        &self,
        tree: &ConfigTree,
        frontmatter: &Frontmatter,
        registry: &Registry,
        fragments: &FragmentRegistry,
    ) -> Vec<Diagnostic> {
        let options = &self.options;
        let schema_stage = || check_schema(tree, &self.schema, options);
        let reference_stage = || resolve_references(tree, registry, options);
        let include_stage = || {
            check_includes(
                &frontmatter.body_text,
                frontmatter.body_start_line,
                fragments,
                options,
            )
        };

        let (schema, references, includes) = if options.parallel_stages {
            thread::scope(|scope| {
                let schema = scope.spawn(schema_stage);
                let references = scope.spawn(reference_stage);
                let includes = include_stage();
                (join_stage(schema), join_stage(references), includes)
            })
        } else {
            (schema_stage(), reference_stage(), include_stage())
        };

        debug!(
            schema = schema.len(),
            references = references.len(),
            includes = includes.len(),
            "Validation stages complete"
        );

        let mut diagnostics = schema;
        diagnostics.extend(references);
        diagnostics.extend(includes);
        diagnostics
    }

    /// Validate many documents on up to `workers` threads. Reports come back
    /// in input order regardless of completion order.
    pub fn validate_all(
        &self,
        documents: &[RawDocument],
        registry: &Registry,
        fragments: &FragmentRegistry,
        workers: usize,
    ) -> Result<Vec<DiagnosticReport>, CheckError> {
        let workers = workers.clamp(1, documents.len().max(1));
        if workers == 1 {
            return documents
                .iter()
                .map(|doc| self.validate(doc, registry, fragments))
                .collect();
        }

        let next = AtomicUsize::new(0);
        let slots: Mutex<Vec<Option<Result<DiagnosticReport, CheckError>>>> =
            Mutex::new((0..documents.len()).map(|_| None).collect());

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(document) = documents.get(index) else {
                        break;
                    };
                    let result = self.validate(document, registry, fragments);
                    slots.lock()[index] = Some(result);
                });
            }
        });

        slots
            .into_inner()
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    Err(CheckError::InvariantViolation(format!(
                        "document {} was never validated",
                        index
                    )))
                })
            })
            .collect()
    }
}

fn join_stage(handle: thread::ScopedJoinHandle<'_, Vec<Diagnostic>>) -> Vec<Diagnostic> {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

/// Validate one document with the default schema.
pub fn validate_document(
    document: &RawDocument,
    registry: &Registry,
    fragments: &FragmentRegistry,
    options: &ValidationOptions,
) -> Result<DiagnosticReport, CheckError> {
    DocumentValidator::new(Schema::v1(), options.clone()).validate(document, registry, fragments)
}

/// Validate many documents concurrently with the default schema.
pub fn validate_documents(
    documents: &[RawDocument],
    registry: &Registry,
    fragments: &FragmentRegistry,
    options: &ValidationOptions,
    workers: usize,
) -> Result<Vec<DiagnosticReport>, CheckError> {
    DocumentValidator::new(Schema::v1(), options.clone())
        .validate_all(documents, registry, fragments, workers)
}
