//! In-memory Notion workspace for tool tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use notion_mcp_client::notion::{
    Block, Database, NotionApi, NotionError, Page, Paginated, QueryRequest, SearchObject, SearchRequest,
};
use serde_json::json;

/// Results per page for block children and database queries.
const PAGE_SIZE: usize = 2;

#[derive(Default)]
pub struct FakeNotion {
    pub search_results: Vec<SearchObject>,
    pub pages: HashMap<String, Page>,
    pub blocks: HashMap<String, Vec<Block>>,
    pub databases: HashMap<String, Database>,
    pub rows: HashMap<String, Vec<Page>>,
    /// Errors returned, in order, before any call succeeds.
    pub failures: Mutex<Vec<NotionError>>,
    pub calls: AtomicUsize,
    pub last_search: Mutex<Option<SearchRequest>>,
}

impl FakeNotion {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with(self, errors: Vec<NotionError>) -> Self {
        *self.failures.lock().unwrap() = errors;
        self
    }

    fn enter(&self) -> Result<(), NotionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut failures = self.failures.lock().unwrap();
        if failures.is_empty() { Ok(()) } else { Err(failures.remove(0)) }
    }
}

fn not_found(id: &str) -> NotionError {
    NotionError::Api {
        status: 404,
        code: Some("object_not_found".into()),
        message: format!("Could not find {id}"),
        retry_after: None,
    }
}

fn paginate<T: Clone>(items: &[T], start_cursor: Option<&str>) -> Paginated<T> {
    let start: usize = start_cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
    let end = (start + PAGE_SIZE).min(items.len());
    let has_more = end < items.len();
    Paginated {
        results: items[start.min(end)..end].to_vec(),
        next_cursor: has_more.then(|| end.to_string()),
        has_more,
    }
}

#[async_trait::async_trait]
impl NotionApi for FakeNotion {
    async fn search(&self, request: &SearchRequest) -> Result<Paginated<SearchObject>, NotionError> {
        self.enter()?;
        *self.last_search.lock().unwrap() = Some(request.clone());
        Ok(Paginated { results: self.search_results.clone(), next_cursor: None, has_more: false })
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError> {
        self.enter()?;
        self.pages.get(page_id).cloned().ok_or_else(|| not_found(page_id))
    }

    async fn list_block_children(
        &self, block_id: &str, start_cursor: Option<&str>,
    ) -> Result<Paginated<Block>, NotionError> {
        self.enter()?;
        let blocks = self.blocks.get(block_id).map(Vec::as_slice).unwrap_or_default();
        Ok(paginate(blocks, start_cursor))
    }

    async fn retrieve_database(&self, database_id: &str) -> Result<Database, NotionError> {
        self.enter()?;
        self.databases
            .get(database_id)
            .cloned()
            .ok_or_else(|| not_found(database_id))
    }

    async fn query_database(&self, database_id: &str, request: &QueryRequest) -> Result<Paginated<Page>, NotionError> {
        self.enter()?;
        let rows = self.rows.get(database_id).ok_or_else(|| not_found(database_id))?;
        Ok(paginate(rows, request.start_cursor.as_deref()))
    }
}

pub fn page(id: &str, title: &str) -> Page {
    serde_json::from_value(json!({
        "id": id,
        "properties": { "Name": { "type": "title", "title": [{ "plain_text": title }] } }
    }))
    .unwrap()
}

pub fn database_row(id: &str, title: &str, database_id: &str) -> Page {
    serde_json::from_value(json!({
        "id": id,
        "parent": { "type": "database_id", "database_id": database_id },
        "properties": { "Name": { "type": "title", "title": [{ "plain_text": title }] } }
    }))
    .unwrap()
}

pub fn database(id: &str, title: &str) -> Database {
    serde_json::from_value(json!({
        "id": id,
        "title": [{ "plain_text": title }],
        "properties": { "Name": { "type": "title", "title": {} } }
    }))
    .unwrap()
}

pub fn paragraph(id: &str, text: &str) -> Block {
    serde_json::from_value(json!({
        "id": id,
        "type": "paragraph",
        "paragraph": { "rich_text": [{ "plain_text": text }] }
    }))
    .unwrap()
}

pub fn rate_limited() -> NotionError {
    NotionError::Api { status: 429, code: Some("rate_limited".into()), message: "slow down".into(), retry_after: None }
}

/// Text of every content item in a tool result.
pub fn texts(result: &rmcp::model::CallToolResult) -> Vec<String> {
    result
        .content
        .iter()
        .filter_map(|content| content.as_text().map(|text| text.text.clone()))
        .collect()
}
