//! End-to-end pipeline tests over mock providers and sources

use adjutant_domain::traits::{DocumentSource, EntryKind, FolderEntry};
use adjutant_domain::{ItemStatus, Provenance, SourceKind};
use adjutant_extractor::{EngineConfig, ExtractionEngine, ExtractionRequest, PromptBuilder};
use adjutant_llm::MockProvider;
use adjutant_pipeline::{ImportResult, Pipeline};
use adjutant_store::SqliteStore;
use adjutant_sync::MockWorkspace;
use std::collections::HashMap;

/// In-memory DocumentSource with configurable broken documents
#[derive(Default)]
struct MockSource {
    listings: HashMap<String, Vec<FolderEntry>>,
    documents: HashMap<String, String>,
    broken: Vec<String>,
}

impl MockSource {
    fn folder(&mut self, parent: &str, id: &str, name: &str) {
        self.listings.entry(parent.to_string()).or_default().push(FolderEntry {
            id: id.to_string(),
            name: name.to_string(),
            kind: EntryKind::Folder,
        });
        self.listings.entry(id.to_string()).or_default();
    }

    fn doc(&mut self, parent: &str, id: &str, name: &str, text: &str) {
        self.listings.entry(parent.to_string()).or_default().push(FolderEntry {
            id: id.to_string(),
            name: name.to_string(),
            kind: EntryKind::Document,
        });
        self.documents.insert(id.to_string(), text.to_string());
    }

    fn file(&mut self, parent: &str, id: &str, name: &str) {
        self.listings.entry(parent.to_string()).or_default().push(FolderEntry {
            id: id.to_string(),
            name: name.to_string(),
            kind: EntryKind::Other,
        });
    }
}

impl DocumentSource for MockSource {
    type Error = String;

    fn list_children(&self, folder_id: &str) -> Result<Vec<FolderEntry>, Self::Error> {
        self.listings
            .get(folder_id)
            .cloned()
            .ok_or_else(|| format!("unknown folder {}", folder_id))
    }

    fn fetch_text(&self, doc_id: &str) -> Result<String, Self::Error> {
        if self.broken.contains(&doc_id.to_string()) {
            return Err(format!("document {} is unreachable", doc_id));
        }
        self.documents
            .get(doc_id)
            .cloned()
            .ok_or_else(|| format!("unknown document {}", doc_id))
    }
}

/// LLM that answers each document's text with a one-item JSON array
fn llm_for(texts: &[&str]) -> MockProvider {
    let mut llm = MockProvider::new("[]");
    for text in texts {
        let prompt = PromptBuilder::new(*text).build();
        llm.add_response(prompt, format!(r#"[{{"text": "{}"}}]"#, text));
    }
    llm
}

fn pipeline_with(llm: MockProvider) -> Pipeline<MockProvider> {
    let engine = ExtractionEngine::new(llm, EngineConfig::default());
    let store = SqliteStore::new(":memory:").unwrap();
    Pipeline::new(engine, store)
}

fn doc_request(doc_id: &str, text: &str) -> ExtractionRequest {
    ExtractionRequest::new(
        text,
        Provenance::new(SourceKind::CloudDocument).with_doc_id(doc_id),
    )
}

#[tokio::test]
async fn test_run_document_merges_items() {
    let llm = llm_for(&["Email Nick"]);
    let mut pipeline = pipeline_with(llm);

    let items = pipeline
        .run_document(&doc_request("doc-1", "Email Nick"))
        .await
        .unwrap();
    assert_eq!(items.len(), 1);

    let flat = pipeline.flatten().unwrap();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].text, "Email Nick");
}

#[tokio::test]
async fn test_rerun_updates_in_place() {
    let llm = llm_for(&["Email Nick"]);
    let mut pipeline = pipeline_with(llm);

    let request = doc_request("doc-1", "Email Nick");
    pipeline.run_document(&request).await.unwrap();
    pipeline.run_document(&request).await.unwrap();

    // Idempotent merge: one record, not two
    assert_eq!(pipeline.flatten().unwrap().len(), 1);
}

#[tokio::test]
async fn test_done_survives_reextraction() {
    let llm = llm_for(&["Email Nick"]);
    let mut pipeline = pipeline_with(llm);

    let request = doc_request("doc-1", "Email Nick");
    let items = pipeline.run_document(&request).await.unwrap();
    let id = items[0].external_id.clone();

    pipeline.mark_done(&id).unwrap();

    // Fresh extraction of the same source, status omitted by the model
    pipeline.run_document(&request).await.unwrap();

    let flat = pipeline.flatten().unwrap();
    assert_eq!(flat[0].status, ItemStatus::Done);
}

#[tokio::test]
async fn test_batch_partial_failure() {
    // Document 2 fails at the LLM layer; 1 and 3 merge anyway
    let mut llm = llm_for(&["Email Nick", "Book the studio"]);
    llm.add_error(PromptBuilder::new("Broken doc").build());
    llm.add_error(PromptBuilder::new("Broken doc").strict().build());

    let mut pipeline = pipeline_with(llm);

    let requests = vec![
        doc_request("doc-1", "Email Nick"),
        doc_request("doc-2", "Broken doc"),
        doc_request("doc-3", "Book the studio"),
    ];

    let report = pipeline.run_batch(&requests).await.unwrap();
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.docs_processed, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].doc_id.as_deref(), Some("doc-2"));

    // The two successes are in the store despite the failure between them
    assert_eq!(pipeline.flatten().unwrap().len(), 2);
}

#[tokio::test]
async fn test_import_folder_grouping_and_stats() {
    // Categories {A, B}; A/X holds 2 documents and 1 skipped file; B empty
    let mut source = MockSource::default();
    source.folder("root", "cat-a", "A");
    source.folder("root", "cat-b", "B");
    source.folder("cat-a", "leaf-x", "X");
    source.doc("leaf-x", "doc-1", "2026 Planning", "Email Nick");
    source.doc("leaf-x", "doc-2", "2026 Budget", "Book the studio");
    source.file("leaf-x", "img-1", "sketch.png");

    let llm = llm_for(&["Email Nick", "Book the studio"]);
    let mut pipeline = pipeline_with(llm);

    let result = pipeline.import_folder(&source, "root", None).await.unwrap();

    assert_eq!(result.by_folder.len(), 1);
    assert_eq!(result.by_folder["A/X"].len(), 2);
    assert!(!result.by_folder.contains_key("B"));

    assert_eq!(result.items.len(), 2);
    assert_eq!(result.stats.docs_processed, 2);
    assert_eq!(result.stats.files_skipped, 1);
    assert_eq!(result.stats.todo_count, 2);
    assert_eq!(result.stats.items_per_folder["A/X"], 2);
    assert!(result.failures.is_empty());
    assert!(!result.stats.run_id.is_empty());
}

#[tokio::test]
async fn test_import_folder_partial_failure_keeps_merged_items() {
    let mut source = MockSource::default();
    source.folder("root", "cat-a", "A");
    source.folder("cat-a", "leaf-x", "X");
    source.doc("leaf-x", "doc-1", "2026 Planning", "Email Nick");
    source.doc("leaf-x", "doc-2", "2026 Budget", "Book the studio");
    source.broken.push("doc-1".to_string());

    let llm = llm_for(&["Email Nick", "Book the studio"]);
    let mut pipeline = pipeline_with(llm);

    let result = pipeline.import_folder(&source, "root", None).await.unwrap();

    assert_eq!(result.items.len(), 1);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].doc_id.as_deref(), Some("doc-1"));
    assert_eq!(result.stats.docs_failed, 1);

    // The surviving document's item is merged
    assert_eq!(pipeline.flatten().unwrap().len(), 1);
}

#[tokio::test]
async fn test_import_snapshot_supersedes_prior_run() {
    let mut source = MockSource::default();
    source.folder("root", "cat-a", "A");
    source.folder("cat-a", "leaf-x", "X");
    source.doc("leaf-x", "doc-1", "2026 Planning", "Email Nick");

    let llm = llm_for(&["Email Nick", "Book the studio"]);
    let mut pipeline = pipeline_with(llm);

    let first = pipeline.import_folder(&source, "root", None).await.unwrap();

    // Second run sees an extra document; its snapshot replaces the first
    source.doc("leaf-x", "doc-2", "2026 Budget", "Book the studio");
    let second = pipeline.import_folder(&source, "root", None).await.unwrap();
    assert_ne!(first.stats.run_id, second.stats.run_id);

    let loaded: ImportResult = pipeline.last_import().unwrap().unwrap();
    assert_eq!(loaded.stats.run_id, second.stats.run_id);
    assert_eq!(loaded.items.len(), 2);
}

#[tokio::test]
async fn test_sync_to_workspace_is_idempotent_and_best_effort() {
    let llm = llm_for(&["Email Nick"]);
    let mut pipeline = pipeline_with(llm);
    pipeline
        .run_document(&doc_request("doc-1", "Email Nick"))
        .await
        .unwrap();

    let workspace = MockWorkspace::new();

    let report = pipeline.sync_to_workspace(&workspace).unwrap();
    assert_eq!(report.created, 1);

    let report = pipeline.sync_to_workspace(&workspace).unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(workspace.row_count(), 1);

    // Workspace outage: reported, local store untouched
    workspace.set_unreachable(true);
    let report = pipeline.sync_to_workspace(&workspace).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(pipeline.flatten().unwrap().len(), 1);
}
