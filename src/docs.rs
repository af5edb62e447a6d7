//! Documentation sets: partitioning into API reference and tutorials, and
//! writing them into the content tree.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::contract::{DocsSource, Document};
use crate::error::{Result, SyncError};
use crate::writer::write_file;

/// Filename prefix of API reference documents.
pub const API_PREFIX: &str = "api/";

const IMAGE_DIR: &str = "images/";
const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "svg", "webp", "ico"];

/// A documentation set split by kind.
#[derive(Debug, Default)]
pub struct Partition {
    pub api: Vec<Document>,
    pub tutorials: Vec<Document>,
}

pub fn is_api(doc: &Document) -> bool {
    doc.filename.starts_with(API_PREFIX)
}

pub fn is_image(doc: &Document) -> bool {
    if doc.filename.starts_with(IMAGE_DIR) || doc.filename.contains("/images/") {
        return true;
    }
    Path::new(&doc.filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Splits documents into API reference and tutorials. Images outside `api/` are dropped.
pub fn partition(documents: Vec<Document>) -> Partition {
    let mut partition = Partition::default();
    for doc in documents {
        if is_api(&doc) {
            partition.api.push(doc);
        } else if is_image(&doc) {
            debug!(filename = %doc.filename, "[DOCS] Skipping image asset");
        } else {
            partition.tutorials.push(doc);
        }
    }
    partition
}

/// `content/<version>/<locale>/docs`
pub fn docs_dir(content_dir: &Path, version: &str, locale: &str) -> PathBuf {
    content_dir.join(version).join(locale).join("docs")
}

/// Writes each document below `target`, keeping its relative filename.
pub fn write_documents(target: &Path, documents: &[Document]) -> Result<usize> {
    for doc in documents {
        write_file(&target.join(&doc.filename), &doc.content)?;
    }
    Ok(documents.len())
}

/// Which parts of a fetched documentation set end up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocSelection {
    /// Only the API reference is requested; everything returned is written.
    ApiOnly,
    /// The tutorials are written, the API reference is dropped.
    TutorialsOnly,
    /// Both halves are written.
    Everything,
}

/// What was written for one version identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocsReport {
    pub reference: String,
    pub target: String,
    pub api: usize,
    pub tutorials: usize,
}

/// Fetches the documents of `reference` and writes the selected part to `target`.
pub async fn sync_documents<D>(
    source: &D,
    reference: &str,
    selection: DocSelection,
    target_version: &str,
    target: &Path,
) -> Result<DocsReport>
where
    D: DocsSource + ?Sized,
{
    let prefix = match selection {
        DocSelection::ApiOnly => Some(API_PREFIX),
        DocSelection::TutorialsOnly | DocSelection::Everything => None,
    };
    info!(reference, target = %target.display(), ?selection, "[DOCS] Fetching documents");

    let documents = source
        .fetch_documents(reference, prefix)
        .await
        .map_err(|e| SyncError::remote(format!("docs fetch for {reference}"), e))?;

    let mut report = DocsReport {
        reference: reference.to_string(),
        target: target_version.to_string(),
        ..Default::default()
    };

    match selection {
        DocSelection::ApiOnly => {
            report.api = write_documents(target, &documents)?;
        }
        DocSelection::TutorialsOnly => {
            let parts = partition(documents);
            debug!(dropped_api = parts.api.len(), "[DOCS] API reference not written for this reference");
            report.tutorials = write_documents(target, &parts.tutorials)?;
        }
        DocSelection::Everything => {
            let parts = partition(documents);
            report.api = write_documents(target, &parts.api)?;
            report.tutorials = write_documents(target, &parts.tutorials)?;
        }
    }

    info!(
        reference,
        api = report.api,
        tutorials = report.tutorials,
        "[DOCS] Documents written"
    );
    Ok(report)
}
