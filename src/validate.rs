use crate::error::ApiError;
use crate::models::{Article, CommentView};
use uuid::Uuid;

// Field-level validation rules, mirrored by the declarative constraints in
// the store. Everything here is pure; handlers call these before any write.

const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

fn invalid(field: &'static str, reason: impl Into<String>) -> ApiError {
    ApiError::Validation {
        field,
        reason: reason.into(),
    }
}

/// slugify
///
/// URL-safe transform of a title: lowercase, whitespace becomes a single
/// hyphen, punctuation is stripped, runs of hyphens collapse, and edge
/// hyphens/underscores are trimmed.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = false;

    for ch in title.chars() {
        let mapped = if ch.is_whitespace() || ch == '-' {
            Some('-')
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            Some(ch.to_ascii_lowercase())
        } else {
            None
        };

        if let Some(c) = mapped {
            if c == '-' {
                if !last_was_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                last_was_hyphen = true;
            } else {
                slug.push(c);
                last_was_hyphen = false;
            }
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// assign_slug_if_absent
///
/// Sets the slug from the title on first save only. Idempotent: an article
/// that already carries a slug passes through untouched, so later title
/// edits never change the URL.
pub fn assign_slug_if_absent(mut article: Article) -> Article {
    if article.slug.is_empty() {
        article.slug = slugify(&article.title);
    }
    article
}

/// Title rule: 5 to 100 characters, first character a letter.
pub fn validate_title(title: &str) -> Result<(), ApiError> {
    let count = title.chars().count();
    if count < 5 {
        return Err(invalid("title", "Title must be at least 5 characters long."));
    }
    if count > 100 {
        return Err(invalid("title", "Title must be at most 100 characters long."));
    }
    if !title.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(invalid("title", "Title must start with a letter."));
    }
    Ok(())
}

/// Article body rule: at least 10 characters.
pub fn validate_article_content(content: &str) -> Result<(), ApiError> {
    if content.chars().count() < 10 {
        return Err(invalid(
            "content",
            "Content must be at least 10 characters long.",
        ));
    }
    Ok(())
}

/// Description rule: optional, but at least 10 characters when present.
pub fn validate_description(description: Option<&str>) -> Result<(), ApiError> {
    if let Some(d) = description {
        if d.chars().count() < 10 {
            return Err(invalid(
                "description",
                "Description must be at least 10 characters long.",
            ));
        }
    }
    Ok(())
}

/// Comment body rule: at least 2 characters.
pub fn validate_comment_content(content: &str) -> Result<(), ApiError> {
    if content.chars().count() < 2 {
        return Err(invalid(
            "content",
            "Comment must be at least 2 characters long.",
        ));
    }
    Ok(())
}

/// Username rule: at least 3 characters.
pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.chars().count() < 3 {
        return Err(invalid(
            "username",
            "Username must be at least 3 characters long.",
        ));
    }
    Ok(())
}

/// Password strength: length, case mix, at least four digits, one special
/// character, and never equal to the username.
pub fn validate_password(username: &str, password: &str) -> Result<(), ApiError> {
    if password == username {
        return Err(invalid(
            "password",
            "Password must be different from username.",
        ));
    }
    if password.chars().count() < 8 {
        return Err(invalid(
            "password",
            "Password must be at least 8 characters long.",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(invalid(
            "password",
            "Password must contain at least one uppercase letter.",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(invalid(
            "password",
            "Password must contain at least one lowercase letter.",
        ));
    }
    if password.chars().filter(|c| c.is_ascii_digit()).count() < 4 {
        return Err(invalid(
            "password",
            "Password must contain at least four numbers.",
        ));
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(invalid(
            "password",
            "Password must contain at least one special character.",
        ));
    }
    Ok(())
}

/// validate_reply_target
///
/// A reply must target a comment on the same article. `parent` is the
/// looked-up target of the new comment's `reply_to`; `None` means the id
/// did not resolve at all.
pub fn validate_reply_target(
    article_id: Uuid,
    parent: Option<&CommentView>,
) -> Result<(), ApiError> {
    match parent {
        None => Err(invalid("reply_to", "Reply target does not exist.")),
        Some(parent) if parent.article_id != article_id => {
            Err(invalid("reply_to", "Reply must be on the same article."))
        }
        Some(_) => Ok(()),
    }
}
