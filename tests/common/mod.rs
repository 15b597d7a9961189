#![allow(dead_code)]

pub mod cli;

use std::sync::Mutex;

use serde_json::json;

use floranet::api::{CommunityBackend, Mutation, Page, RecordPatch, Resource, ResourceBackend};
use floranet::controller::ListQuery;
use floranet::error::{FloranetError, Result};
use floranet::types::{Comment, CommunityPost, Complaint, RecordId};

/// How a field-patch mutation answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchReply {
    /// Return the changed field
    Field,
    /// Return nothing, forcing a refetch
    Empty,
}

type Matcher<R> = Box<dyn Fn(&R, &ListQuery) -> bool + Send + Sync>;
type SideEffect<R> = Box<dyn Fn(&mut R, &Mutation<R>) + Send + Sync>;

/// In-memory stand-in for a paginated REST resource
pub struct MemoryBackend<R: Resource> {
    records: Mutex<Vec<R>>,
    per_page: u32,
    matcher: Matcher<R>,
    side_effect: Option<SideEffect<R>>,
    reply: PatchReply,
    fail_next: Mutex<Option<String>>,
    fail_refetch: Mutex<Option<String>>,
    pub queries: Mutex<Vec<ListQuery>>,
    pub fetched_ids: Mutex<Vec<RecordId>>,
    pub mutations: Mutex<Vec<&'static str>>,
}

impl<R: Resource> MemoryBackend<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: Mutex::new(records),
            per_page: 10,
            matcher: Box::new(|_, _| true),
            side_effect: None,
            reply: PatchReply::Field,
            fail_next: Mutex::new(None),
            fail_refetch: Mutex::new(None),
            queries: Mutex::new(Vec::new()),
            fetched_ids: Mutex::new(Vec::new()),
            mutations: Mutex::new(Vec::new()),
        }
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn matching(mut self, matcher: impl Fn(&R, &ListQuery) -> bool + Send + Sync + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Server-side effect for mutations that are not plain field writes
    pub fn on_mutate(mut self, effect: impl Fn(&mut R, &Mutation<R>) + Send + Sync + 'static) -> Self {
        self.side_effect = Some(Box::new(effect));
        self
    }

    pub fn reply(mut self, reply: PatchReply) -> Self {
        self.reply = reply;
        self
    }

    /// Make the next backend call fail with an API error carrying `message`
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    /// Make the next single-record fetch fail
    pub fn fail_next_refetch(&self, message: &str) {
        *self.fail_refetch.lock().unwrap() = Some(message.to_string());
    }

    /// Change a stored record behind the client's back
    pub fn edit(&self, id: &RecordId, edit: impl FnOnce(&mut R)) {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.id() == id) {
            edit(record);
        }
    }

    pub fn stored(&self, id: &RecordId) -> Option<R> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    pub fn search_log(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|q| q.search_text().to_string())
            .collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    fn take_failure(&self) -> Result<()> {
        match self.fail_next.lock().unwrap().take() {
            Some(message) => Err(FloranetError::Api {
                status: Some(500),
                message,
            }),
            None => Ok(()),
        }
    }
}

impl<R: Resource> ResourceBackend<R> for MemoryBackend<R> {
    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<R>> {
        self.queries.lock().unwrap().push(query.clone());
        self.take_failure()?;

        let matching: Vec<R> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| (self.matcher)(r, query))
            .cloned()
            .collect();

        let total = matching.len() as u64;
        let skip = (query.page() as usize - 1) * self.per_page as usize;
        let items = matching
            .into_iter()
            .skip(skip)
            .take(self.per_page as usize)
            .collect();
        Ok(Page::new(items, query.page(), self.per_page, total))
    }

    async fn fetch_record(&self, id: &RecordId) -> Result<R> {
        self.fetched_ids.lock().unwrap().push(id.clone());
        self.take_failure()?;
        if let Some(message) = self.fail_refetch.lock().unwrap().take() {
            return Err(FloranetError::Api {
                status: Some(503),
                message,
            });
        }
        self.stored(id)
            .ok_or_else(|| FloranetError::RecordNotFound(id.to_string()))
    }

    async fn mutate(&self, id: &RecordId, mutation: &Mutation<R>) -> Result<Option<RecordPatch<R>>> {
        self.mutations.lock().unwrap().push(mutation.kind());
        self.take_failure()?;

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| FloranetError::RecordNotFound(id.to_string()))?;

        let patch = match mutation {
            Mutation::Status(status) => Some(RecordPatch::Status(*status)),
            Mutation::Priority(priority) => Some(RecordPatch::Priority(*priority)),
            Mutation::Remarks(text) => Some(RecordPatch::Remarks(
                (!text.trim().is_empty()).then(|| text.clone()),
            )),
            _ => None,
        };
        if let Some(patch) = &patch {
            record.apply_patch(patch.clone())?;
        }
        if let Some(effect) = &self.side_effect {
            effect(record, mutation);
        }

        Ok(match self.reply {
            PatchReply::Field => patch,
            PatchReply::Empty => None,
        })
    }
}

/// In-memory community post endpoints
pub struct MemoryCommunity {
    posts: Mutex<Vec<CommunityPost>>,
    next_id: Mutex<u64>,
    fail_next: Mutex<Option<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl MemoryCommunity {
    pub fn new(posts: Vec<CommunityPost>) -> Self {
        Self {
            posts: Mutex::new(posts),
            next_id: Mutex::new(100),
            fail_next: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn begin(&self, call: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call.to_string());
        match self.fail_next.lock().unwrap().take() {
            Some(message) => Err(FloranetError::Api {
                status: Some(422),
                message,
            }),
            None => Ok(()),
        }
    }

    fn next_id(&self) -> RecordId {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        RecordId::Int(*next)
    }

    fn with_post<T>(&self, id: &RecordId, f: impl FnOnce(&mut CommunityPost) -> T) -> Result<T> {
        let mut posts = self.posts.lock().unwrap();
        posts
            .iter_mut()
            .find(|p| &p.id == id)
            .map(f)
            .ok_or_else(|| FloranetError::RecordNotFound(id.to_string()))
    }
}

impl CommunityBackend for MemoryCommunity {
    async fn list_posts(&self, archived: bool) -> Result<Vec<CommunityPost>> {
        self.begin("list")?;
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.archived == archived)
            .cloned()
            .collect())
    }

    async fn create_post(&self, content: &str) -> Result<CommunityPost> {
        self.begin("create")?;
        let post = post(self.next_id(), content);
        self.posts.lock().unwrap().insert(0, post.clone());
        Ok(post)
    }

    async fn delete_post(&self, id: &RecordId) -> Result<()> {
        self.begin("delete")?;
        self.posts.lock().unwrap().retain(|p| &p.id != id);
        Ok(())
    }

    async fn like_post(&self, id: &RecordId) -> Result<CommunityPost> {
        self.begin("like")?;
        self.with_post(id, |p| {
            p.liked = !p.liked;
            if p.liked {
                p.likes_count += 1;
            } else {
                p.likes_count = p.likes_count.saturating_sub(1);
            }
            p.clone()
        })
    }

    async fn comment_on_post(&self, id: &RecordId, content: &str) -> Result<Comment> {
        self.begin("comment")?;
        let comment = Comment {
            id: self.next_id(),
            content: content.to_string(),
            author_name: Some("Admin".to_string()),
            created_at: Some("2026-10-16T09:00:00Z".to_string()),
        };
        self.with_post(id, |p| p.comments.push(comment.clone()))?;
        Ok(comment)
    }

    async fn archive_post(&self, id: &RecordId) -> Result<()> {
        self.begin("archive")?;
        self.with_post(id, |p| p.archived = true)
    }

    async fn unarchive_post(&self, id: &RecordId) -> Result<()> {
        self.begin("unarchive")?;
        self.with_post(id, |p| p.archived = false)
    }
}

pub fn complaint(id: u64, title: &str) -> Complaint {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "category": "Maintenance",
        "description": format!("{title} needs attention"),
        "status": "pending",
        "priority": "medium",
        "resident": { "name": "Ana Reyes", "unit": "B-12" },
        "created_at": "2026-03-05T14:30:00Z",
    }))
    .unwrap()
}

pub fn post(id: RecordId, content: &str) -> CommunityPost {
    CommunityPost {
        id,
        content: content.to_string(),
        author: None,
        image_path: None,
        likes_count: 0,
        liked: false,
        comments: Vec::new(),
        archived: false,
        created_at: Some("2026-10-16T08:00:00Z".to_string()),
    }
}

/// Matches complaints whose title contains the search text, case-insensitively,
/// and whose status equals the `status` filter when set
pub fn complaint_matcher(record: &Complaint, query: &ListQuery) -> bool {
    let needle = query.search_text().trim().to_lowercase();
    let title = record.title.clone().unwrap_or_default().to_lowercase();
    let status_ok = query
        .filter("status")
        .is_none_or(|s| record.status.to_string() == s);
    title.contains(&needle) && status_ok
}
