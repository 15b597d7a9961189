//! Community post hub: the list controller pattern without pagination or
//! filters. Active and archived posts are held side by side and posts move
//! between them locally after each successful archive call.

use crate::api::CommunityBackend;
use crate::controller::{ExpandedRowSet, Feedback};
use crate::error::FloranetError;
use crate::projection::{PostCard, Project};
use crate::types::{CommunityPost, RecordId};

pub struct PostHub<B: CommunityBackend> {
    backend: B,
    active: Vec<CommunityPost>,
    archived: Vec<CommunityPost>,
    expanded: ExpandedRowSet,
    feedback: Feedback,
}

impl<B: CommunityBackend> PostHub<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            active: Vec::new(),
            archived: Vec::new(),
            expanded: ExpandedRowSet::default(),
            feedback: Feedback::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn active(&self) -> &[CommunityPost] {
        &self.active
    }

    pub fn archived(&self) -> &[CommunityPost] {
        &self.archived
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn dismiss_feedback(&mut self) {
        self.feedback.dismiss();
    }

    pub fn toggle_expand(&mut self, id: &RecordId) -> bool {
        self.expanded.toggle(id)
    }

    /// Display cards for the active or archived list
    pub fn cards(&self, archived: bool) -> Vec<PostCard> {
        let posts = if archived { &self.archived } else { &self.active };
        posts
            .iter()
            .map(|post| post.project(self.expanded.is_expanded(&post.id)))
            .collect()
    }

    /// Fetch both lists concurrently. On failure both are cleared.
    pub async fn load(&mut self) -> bool {
        let result = futures::try_join!(
            self.backend.list_posts(false),
            self.backend.list_posts(true)
        );

        match result {
            Ok((active, archived)) => {
                tracing::debug!(active = active.len(), archived = archived.len(), "posts loaded");
                self.active = active;
                self.archived = archived;
                true
            }
            Err(e) => {
                self.active.clear();
                self.archived.clear();
                self.fail("load posts", e)
            }
        }
    }

    /// Publish a post; it is prepended to the active list.
    pub async fn create(&mut self, content: &str) -> bool {
        let content = content.trim();
        if content.is_empty() {
            return self.fail(
                "create post",
                FloranetError::Validation("Post content cannot be empty".to_string()),
            );
        }

        match self.backend.create_post(content).await {
            Ok(post) => {
                self.active.insert(0, post);
                self.succeed("Post created")
            }
            Err(e) => self.fail("create post", e),
        }
    }

    pub async fn delete(&mut self, id: &RecordId) -> bool {
        match self.backend.delete_post(id).await {
            Ok(()) => {
                self.active.retain(|p| &p.id != id);
                self.archived.retain(|p| &p.id != id);
                self.succeed("Post deleted")
            }
            Err(e) => self.fail("delete post", e),
        }
    }

    /// Toggle the like. Only the counters are taken from the response.
    pub async fn like(&mut self, id: &RecordId) -> bool {
        match self.backend.like_post(id).await {
            Ok(updated) => {
                if let Some(post) = self.post_mut(id) {
                    post.likes_count = updated.likes_count;
                    post.liked = updated.liked;
                }
                self.succeed(if updated.liked { "Post liked" } else { "Like removed" })
            }
            Err(e) => self.fail("like post", e),
        }
    }

    pub async fn comment(&mut self, id: &RecordId, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return self.fail(
                "comment on post",
                FloranetError::Validation("Comment cannot be empty".to_string()),
            );
        }

        match self.backend.comment_on_post(id, text).await {
            Ok(comment) => {
                if let Some(post) = self.post_mut(id) {
                    post.comments.push(comment);
                }
                self.succeed("Comment added")
            }
            Err(e) => self.fail("comment on post", e),
        }
    }

    pub async fn archive(&mut self, id: &RecordId) -> bool {
        match self.backend.archive_post(id).await {
            Ok(()) => {
                move_post(&mut self.active, &mut self.archived, id, true);
                self.succeed("Post archived")
            }
            Err(e) => self.fail("archive post", e),
        }
    }

    pub async fn unarchive(&mut self, id: &RecordId) -> bool {
        match self.backend.unarchive_post(id).await {
            Ok(()) => {
                move_post(&mut self.archived, &mut self.active, id, false);
                self.succeed("Post restored")
            }
            Err(e) => self.fail("unarchive post", e),
        }
    }

    fn post_mut(&mut self, id: &RecordId) -> Option<&mut CommunityPost> {
        self.active
            .iter_mut()
            .chain(self.archived.iter_mut())
            .find(|p| &p.id == id)
    }

    fn succeed(&mut self, message: &str) -> bool {
        self.feedback = Feedback::success(message);
        true
    }

    fn fail(&mut self, action: &str, error: FloranetError) -> bool {
        if error.is_validation() {
            tracing::debug!(action, error = %error, "post action rejected");
        } else {
            tracing::warn!(action, error = %error, "post action failed");
        }
        self.feedback = Feedback::error(error.feedback_message());
        false
    }
}

fn move_post(from: &mut Vec<CommunityPost>, to: &mut Vec<CommunityPost>, id: &RecordId, archived: bool) {
    if let Some(index) = from.iter().position(|p| &p.id == id) {
        let mut post = from.remove(index);
        post.archived = archived;
        to.insert(0, post);
    }
}

