//! Shared Test Fixtures
//!
//! In-memory implementations of both collaborator seams plus a helper for running
//! mock HTTP servers on an ephemeral port.

use crate::error::{SinkError, SourceError};
use crate::records::types::Record;
use crate::sink::client::{SearchIndex, validate_batch};
use crate::source::client::ContentSource;
use crate::source::types::{FetchRequest, StoriesPage, Story};

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

pub fn story(uuid: &str, content: Value) -> Story {
    Story {
        uuid: uuid.to_string(),
        content: Some(content),
    }
}

/// A story whose payload is `{"component": component, "title": title}`.
pub fn component_story(uuid: &str, component: &str, title: &str) -> Story {
    story(uuid, json!({ "component": component, "title": title }))
}

/// `count` stories of component `"article"` with uuids `uuid-0 .. uuid-{count-1}`.
pub fn numbered_stories(count: usize) -> Vec<Story> {
    (0..count)
        .map(|i| component_story(&format!("uuid-{}", i), "article", &format!("Story {}", i)))
        .collect()
}

/// A content source serving a fixed list of stories, paginated the way the real API is.
pub struct FakeSource {
    stories: Vec<Story>,
    total_override: Option<Option<u64>>,
    failing_pages: HashSet<u32>,
    requested: Mutex<Vec<u32>>,
}

impl FakeSource {
    pub fn new(stories: Vec<Story>) -> Self {
        Self {
            stories,
            total_override: None,
            failing_pages: HashSet::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Report `total` instead of the real story count (`None` drops the header).
    pub fn with_total(mut self, total: Option<u64>) -> Self {
        self.total_override = Some(total);
        self
    }

    /// Fail every request for `page`. The probe (page 1 by default) fails too.
    pub fn failing_page(mut self, page: u32) -> Self {
        self.failing_pages.insert(page);
        self
    }

    /// Pages requested so far, in call order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn fetch_page(&self, request: &FetchRequest) -> Result<StoriesPage, SourceError> {
        let page = request.page();
        self.requested.lock().unwrap().push(page);

        if self.failing_pages.contains(&page) {
            return Err(SourceError::Status {
                status: 500,
                body: format!("page {} unavailable", page),
            });
        }

        let per_page = request.options().per_page as usize;
        let start = (page as usize - 1) * per_page;
        let stories = self
            .stories
            .iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect();

        let total = self
            .total_override
            .unwrap_or(Some(self.stories.len() as u64));

        Ok(StoriesPage {
            page,
            total,
            stories,
        })
    }
}

/// A search index that records every accepted batch, optionally failing some indices.
#[derive(Default)]
pub struct RecordingIndex {
    failing_indices: HashSet<String>,
    writes: Mutex<BTreeMap<String, Vec<Record>>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_index(mut self, index_name: &str) -> Self {
        self.failing_indices.insert(index_name.to_string());
        self
    }

    pub fn writes(&self) -> BTreeMap<String, Vec<Record>> {
        self.writes.lock().unwrap().clone()
    }

    /// Index names `save_objects` was called with, successful or not.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchIndex for RecordingIndex {
    async fn save_objects(&self, index_name: &str, records: &[Record]) -> Result<usize, SinkError> {
        self.calls.lock().unwrap().push(index_name.to_string());
        validate_batch(index_name, records)?;

        if self.failing_indices.contains(index_name) {
            return Err(SinkError::Status {
                status: 503,
                body: format!("index {} unavailable", index_name),
            });
        }

        self.writes
            .lock()
            .unwrap()
            .entry(index_name.to_string())
            .or_default()
            .extend(records.iter().cloned());
        Ok(records.len())
    }
}

/// Serves `app` on `127.0.0.1` with an ephemeral port and returns its base URL.
pub async fn spawn_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
