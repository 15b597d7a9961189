use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{print_json, report_feedback};
use crate::api::HttpBackend;
use crate::error::Result;
use crate::pages::PostHub;
use crate::projection::PostCard;
use crate::types::RecordId;

#[derive(Tabled)]
struct PostTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Post")]
    content: String,
    #[tabled(rename = "Likes")]
    likes: String,
    #[tabled(rename = "Comments")]
    comments: usize,
    #[tabled(rename = "Posted")]
    posted: String,
}

fn truncate(text: &str, max: usize) -> String {
    let text = text.replace('\n', " ");
    if text.chars().count() <= max {
        text
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

fn print_cards(cards: &[PostCard], archived: bool) {
    if cards.is_empty() {
        let which = if archived { "archived" } else { "active" };
        println!("No {which} posts found.");
        return;
    }

    let mut table = Table::new(cards.iter().map(|card| PostTableRow {
        id: card.id.to_string(),
        author: card.author.clone(),
        content: truncate(&card.content, 60),
        likes: if card.liked {
            format!("{} (liked)", card.likes)
        } else {
            card.likes.to_string()
        },
        comments: card.comment_count,
        posted: format!("{} {}", card.posted_date, card.posted_time),
    }));
    table.with(Style::rounded());
    println!("{table}");

    for card in cards.iter().filter(|c| !c.comments.is_empty()) {
        println!("\n{} {}", format!("#{}", card.id).cyan(), card.content);
        for comment in &card.comments {
            println!(
                "  {} {}",
                format!("[{} - {}]", comment.date, comment.author).dimmed(),
                comment.content
            );
        }
    }
}

/// List active or archived posts
pub async fn cmd_posts_list(
    backend: HttpBackend,
    archived: bool,
    expand: &[RecordId],
    json: bool,
) -> Result<()> {
    let mut hub = PostHub::new(backend);
    if !hub.load().await {
        return report_feedback(hub.feedback(), json);
    }
    for id in expand {
        hub.toggle_expand(id);
    }

    if json {
        let posts = if archived { hub.archived() } else { hub.active() };
        return print_json(&json!({ "archived": archived, "posts": posts }));
    }

    print_cards(&hub.cards(archived), archived);
    Ok(())
}

/// A single post action
#[derive(Debug, Clone)]
pub enum PostAction {
    Create(String),
    Delete(RecordId),
    Like(RecordId),
    Comment(RecordId, String),
    Archive(RecordId),
    Unarchive(RecordId),
}

/// Run one post action and report its feedback
pub async fn cmd_posts(backend: HttpBackend, action: PostAction, json: bool) -> Result<()> {
    let mut hub = PostHub::new(backend);
    match &action {
        PostAction::Create(content) => hub.create(content).await,
        PostAction::Delete(id) => hub.delete(id).await,
        PostAction::Like(id) => hub.like(id).await,
        PostAction::Comment(id, text) => hub.comment(id, text).await,
        PostAction::Archive(id) => hub.archive(id).await,
        PostAction::Unarchive(id) => hub.unarchive(id).await,
    };

    if let PostAction::Create(_) = action
        && !json
        && let Some(post) = hub.active().first()
    {
        println!("{} {}", "Created post".dimmed(), format!("#{}", post.id).cyan());
    }
    report_feedback(hub.feedback(), json)
}
