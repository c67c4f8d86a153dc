use crate::models::CommentView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// CommentNode
///
/// One comment in the threaded response shape: the flat fields plus an
/// ordered `replies` list, recursively the same shape. `replies` is left off
/// the wire entirely for leaf comments.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CommentNode {
    pub id: i64,
    pub content: String,
    pub author_id: Uuid,
    pub author_username: String,
    #[serde(rename = "article")]
    #[ts(rename = "article")]
    pub article_id: Uuid,
    pub reply_to: Option<i64>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schema(no_recursion)]
    pub replies: Vec<CommentNode>,
}

impl From<CommentView> for CommentNode {
    fn from(c: CommentView) -> Self {
        CommentNode {
            id: c.id,
            content: c.content,
            author_id: c.author_id,
            author_username: c.author_username,
            article_id: c.article_id,
            reply_to: c.reply_to,
            created_at: c.created_at,
            updated_at: c.updated_at,
            replies: Vec::new(),
        }
    }
}

/// build_comment_tree
///
/// Reshapes a flat, created_at-ascending comment listing into its reply
/// forest. Roots keep the input order, and so does every `replies` list.
///
/// A comment whose `reply_to` names an id that is not in the input (the
/// parent was filtered out of the listing) is dropped, not promoted to
/// root; an orphaned parent takes its whole subtree with it. O(n) in the
/// number of comments.
pub fn build_comment_tree(flat: Vec<CommentView>) -> Vec<CommentNode> {
    let present: HashSet<i64> = flat.iter().map(|c| c.id).collect();

    let mut roots: Vec<CommentView> = Vec::new();
    let mut children: HashMap<i64, Vec<CommentView>> = HashMap::new();

    for comment in flat {
        match comment.reply_to {
            None => roots.push(comment),
            Some(parent) if present.contains(&parent) => {
                children.entry(parent).or_default().push(comment)
            }
            // Parent not in this listing: silently dropped.
            Some(_) => {}
        }
    }

    roots
        .into_iter()
        .map(|root| attach_replies(root, &mut children))
        .collect()
}

/// Moves a comment's collected children under it, depth first. Each child
/// list is removed from the map as it is consumed, so every comment is
/// visited at most once.
fn attach_replies(comment: CommentView, children: &mut HashMap<i64, Vec<CommentView>>) -> CommentNode {
    let mut node = CommentNode::from(comment);
    if let Some(kids) = children.remove(&node.id) {
        node.replies = kids
            .into_iter()
            .map(|kid| attach_replies(kid, children))
            .collect();
    }
    node
}
