use async_trait::async_trait;
use blog_engine::error::ApiError;
use blog_engine::models::{
    Article, ArticleLike, Category, CommentView, Profile, Reaction, UpdateArticleRequest,
    UpdateProfileRequest, UserAccount,
};
use blog_engine::policy::{Actor, Role};
use blog_engine::repository::Repository;
use blog_engine::{AppConfig, AppState};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// --- In-Memory Repository ---

// Stateful stand-in for PostgresRepository: real uniqueness checks, real
// cascades, no database. Handlers exercise the same invariants the store
// enforces declaratively in production.

#[derive(Default)]
struct Inner {
    users: Vec<UserAccount>,
    groups: Vec<(Uuid, String)>,
    profiles: Vec<Profile>,
    articles: Vec<Article>,
    comments: Vec<CommentView>,
    likes: Vec<ArticleLike>,
    // token -> user id
    tokens: HashMap<String, Uuid>,
    next_comment_id: i64,
}

#[derive(Default)]
pub struct MemoryRepository {
    inner: Mutex<Inner>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an account + profile + group memberships directly, bypassing
    /// the registration flow. Returns (user_id, profile_id).
    pub fn seed_user(
        &self,
        username: &str,
        password_hash: &str,
        groups: &[&str],
        is_superuser: bool,
    ) -> (Uuid, Uuid) {
        let mut inner = self.inner.lock().unwrap();
        let user_id = Uuid::new_v4();
        let profile_id = Uuid::new_v4();
        let now = Utc::now();

        inner.users.push(UserAccount {
            id: user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_superuser,
            created_at: now,
        });
        inner.profiles.push(Profile {
            id: profile_id,
            user_id,
            username: username.to_string(),
            created_at: now,
            updated_at: now,
            ..Profile::default()
        });
        for group in groups {
            inner.groups.push((user_id, group.to_string()));
        }
        (user_id, profile_id)
    }

    /// Seeds an article owned by the given profile. Returns its id.
    pub fn seed_article(&self, author_id: Uuid, title: &str, slug: &str) -> Uuid {
        let mut inner = self.inner.lock().unwrap();
        let author_username = inner
            .profiles
            .iter()
            .find(|p| p.id == author_id)
            .map(|p| p.username.clone())
            .unwrap_or_default();
        let id = Uuid::new_v4();
        let now = Utc::now();
        inner.articles.push(Article {
            id,
            author_id,
            author_username,
            title: title.to_string(),
            slug: slug.to_string(),
            content: "seeded article content".to_string(),
            created_at: now,
            updated_at: now,
            ..Article::default()
        });
        id
    }

    pub fn token_count(&self) -> usize {
        self.inner.lock().unwrap().tokens.len()
    }

    pub fn profile_count(&self) -> usize {
        self.inner.lock().unwrap().profiles.len()
    }

    fn username_of_profile(inner: &Inner, profile_id: Uuid) -> String {
        inner
            .profiles
            .iter()
            .find(|p| p.id == profile_id)
            .map(|p| p.username.clone())
            .unwrap_or_default()
    }

    fn likes_of(inner: &Inner, article_id: Uuid) -> Vec<Uuid> {
        inner
            .likes
            .iter()
            .filter(|l| l.article_id == article_id)
            .map(|l| l.user_id)
            .collect()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_actor(&self, user_id: Uuid) -> Result<Option<Actor>, ApiError> {
        let inner = self.inner.lock().unwrap();
        let Some(user) = inner.users.iter().find(|u| u.id == user_id) else {
            return Ok(None);
        };
        let Some(profile) = inner.profiles.iter().find(|p| p.user_id == user_id) else {
            return Ok(None);
        };
        let mut roles: BTreeSet<Role> = inner
            .groups
            .iter()
            .filter(|(id, _)| *id == user_id)
            .filter_map(|(_, g)| Role::from_group(g))
            .collect();
        if user.is_superuser {
            roles.insert(Role::Superuser);
        }
        Ok(Some(Actor {
            user_id,
            profile_id: profile.id,
            username: user.username.clone(),
            roles,
        }))
    }

    async fn find_actor_by_api_token(&self, token: &str) -> Result<Option<Actor>, ApiError> {
        let user_id = {
            let inner = self.inner.lock().unwrap();
            inner.tokens.get(token).copied()
        };
        match user_id {
            Some(id) => self.get_actor(id).await,
            None => Ok(None),
        }
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserAccount>, ApiError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserAccount>, ApiError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>, ApiError> {
        Ok(self.inner.lock().unwrap().users.clone())
    }

    async fn register_user(
        &self,
        username: &str,
        password_hash: &str,
        api_token: &str,
    ) -> Result<(UserAccount, Profile), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.username == username) {
            return Err(ApiError::Conflict(
                "A user with this username already exists.".to_string(),
            ));
        }
        let now = Utc::now();
        let user = UserAccount {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_superuser: false,
            created_at: now,
        };
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id: user.id,
            username: username.to_string(),
            created_at: now,
            updated_at: now,
            ..Profile::default()
        };
        inner.users.push(user.clone());
        inner.groups.push((user.id, "Users".to_string()));
        inner.profiles.push(profile.clone());
        inner.tokens.insert(api_token.to_string(), user.id);
        Ok((user, profile))
    }

    async fn update_user(
        &self,
        id: Uuid,
        username: Option<String>,
        password_hash: Option<String>,
    ) -> Result<Option<UserAccount>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(ref name) = username {
            if inner.users.iter().any(|u| u.username == *name && u.id != id) {
                return Err(ApiError::Conflict(
                    "A user with this username already exists.".to_string(),
                ));
            }
        }
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = username {
            user.username = name;
        }
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        if inner.users.len() == before {
            return Ok(false);
        }
        // Cascade: profile, memberships, tokens, then the profile's content.
        let profile_ids: Vec<Uuid> = inner
            .profiles
            .iter()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        inner.profiles.retain(|p| p.user_id != id);
        inner.groups.retain(|(uid, _)| *uid != id);
        inner.tokens.retain(|_, uid| *uid != id);
        inner
            .articles
            .retain(|a| !profile_ids.contains(&a.author_id));
        inner
            .comments
            .retain(|c| !profile_ids.contains(&c.author_id));
        inner.likes.retain(|l| !profile_ids.contains(&l.user_id));
        Ok(true)
    }

    async fn get_or_create_api_token(
        &self,
        user_id: Uuid,
        candidate: &str,
    ) -> Result<String, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some((token, _)) = inner.tokens.iter().find(|(_, uid)| **uid == user_id) {
            return Ok(token.clone());
        }
        inner.tokens.insert(candidate.to_string(), user_id);
        Ok(candidate.to_string())
    }

    async fn delete_api_token(&self, user_id: Uuid) -> Result<bool, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.tokens.len();
        inner.tokens.retain(|_, uid| *uid != user_id);
        Ok(inner.tokens.len() != before)
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, ApiError> {
        Ok(self.inner.lock().unwrap().profiles.clone())
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, ApiError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<Option<Profile>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(profile) = inner.profiles.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(v) = req.first_name {
            profile.first_name = v;
        }
        if let Some(v) = req.last_name {
            profile.last_name = v;
        }
        if let Some(v) = req.profession {
            profile.profession = v;
        }
        if let Some(v) = req.bio {
            profile.bio = v;
        }
        profile.updated_at = Utc::now();
        Ok(Some(profile.clone()))
    }

    async fn list_articles(
        &self,
        category: Option<Category>,
        tag: Option<String>,
        search: Option<String>,
    ) -> Result<Vec<Article>, ApiError> {
        let inner = self.inner.lock().unwrap();
        let mut articles: Vec<Article> = inner
            .articles
            .iter()
            .filter(|a| category.is_none_or(|c| a.category == c))
            .filter(|a| {
                tag.as_deref().is_none_or(|t| {
                    a.tags
                        .iter()
                        .any(|have| have.to_lowercase().contains(&t.to_lowercase()))
                })
            })
            .filter(|a| {
                search
                    .as_deref()
                    .is_none_or(|s| a.title.to_lowercase().contains(&s.to_lowercase()))
            })
            .cloned()
            .collect();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        for article in &mut articles {
            article.likes = Self::likes_of(&inner, article.id);
        }
        Ok(articles)
    }

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>, ApiError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.articles.iter().find(|a| a.id == id).cloned().map(|mut a| {
            a.likes = Self::likes_of(&inner, a.id);
            a
        }))
    }

    async fn create_article(&self, article: Article) -> Result<Article, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .articles
            .iter()
            .any(|a| a.title == article.title || a.slug == article.slug)
        {
            return Err(ApiError::Conflict(
                "An article with this title already exists.".to_string(),
            ));
        }
        let now = Utc::now();
        let stored = Article {
            created_at: now,
            updated_at: now,
            ..article
        };
        inner.articles.push(stored.clone());
        Ok(stored)
    }

    async fn update_article(
        &self,
        id: Uuid,
        req: UpdateArticleRequest,
    ) -> Result<Option<Article>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(ref title) = req.title {
            if inner.articles.iter().any(|a| a.title == *title && a.id != id) {
                return Err(ApiError::Conflict(
                    "An article with this title already exists.".to_string(),
                ));
            }
        }
        let Some(article) = inner.articles.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        // The slug deliberately stays as created.
        if let Some(v) = req.title {
            article.title = v;
        }
        if let Some(v) = req.category {
            article.category = v;
        }
        if let Some(v) = req.description {
            article.description = Some(v);
        }
        if let Some(v) = req.content {
            article.content = v;
        }
        if let Some(v) = req.status {
            article.status = v;
        }
        if let Some(v) = req.tags {
            article.tags = v;
        }
        article.updated_at = Utc::now();
        let mut updated = article.clone();
        updated.likes = Self::likes_of(&inner, id);
        Ok(Some(updated))
    }

    async fn delete_article(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.articles.len();
        inner.articles.retain(|a| a.id != id);
        if inner.articles.len() == before {
            return Ok(false);
        }
        // Cascade: comments and likes scoped to the article.
        inner.comments.retain(|c| c.article_id != id);
        inner.likes.retain(|l| l.article_id != id);
        Ok(true)
    }

    async fn list_comments(
        &self,
        article_id: Option<Uuid>,
        author_id: Option<Uuid>,
    ) -> Result<Vec<CommentView>, ApiError> {
        let inner = self.inner.lock().unwrap();
        let mut comments: Vec<CommentView> = inner
            .comments
            .iter()
            .filter(|c| article_id.is_none_or(|a| c.article_id == a))
            .filter(|c| author_id.is_none_or(|a| c.author_id == a))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn get_comment(&self, id: i64) -> Result<Option<CommentView>, ApiError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn create_comment(
        &self,
        author_id: Uuid,
        article_id: Uuid,
        content: &str,
        reply_to: Option<i64>,
    ) -> Result<CommentView, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_comment_id += 1;
        let now = Utc::now();
        let comment = CommentView {
            id: inner.next_comment_id,
            author_id,
            author_username: Self::username_of_profile(&inner, author_id),
            article_id,
            content: content.to_string(),
            reply_to,
            created_at: now,
            updated_at: now,
        };
        inner.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, id: i64, content: &str) -> Result<Option<CommentView>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(comment) = inner.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        comment.content = content.to_string();
        comment.updated_at = Utc::now();
        Ok(Some(comment.clone()))
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.comments.len();
        inner.comments.retain(|c| c.id != id);
        Ok(inner.comments.len() != before)
    }

    async fn list_likes(&self, article_id: Option<Uuid>) -> Result<Vec<ArticleLike>, ApiError> {
        let inner = self.inner.lock().unwrap();
        let mut likes: Vec<ArticleLike> = inner
            .likes
            .iter()
            .filter(|l| article_id.is_none_or(|a| l.article_id == a))
            .cloned()
            .collect();
        likes.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(likes)
    }

    async fn get_like(&self, id: Uuid) -> Result<Option<ArticleLike>, ApiError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.likes.iter().find(|l| l.id == id).cloned())
    }

    async fn create_like(
        &self,
        user_id: Uuid,
        article_id: Uuid,
        reaction: Reaction,
    ) -> Result<ArticleLike, ApiError> {
        // Check and insert under one lock: the same indivisibility the
        // ON CONFLICT insert gives the production store.
        let mut inner = self.inner.lock().unwrap();
        if inner
            .likes
            .iter()
            .any(|l| l.user_id == user_id && l.article_id == article_id)
        {
            return Err(ApiError::Conflict(
                "Each user is allowed to like an article only once.".to_string(),
            ));
        }
        let like = ArticleLike {
            id: Uuid::new_v4(),
            user_id,
            user_username: Self::username_of_profile(&inner, user_id),
            article_id,
            reaction,
            created_at: Utc::now(),
        };
        inner.likes.push(like.clone());
        Ok(like)
    }

    async fn delete_like(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.likes.len();
        inner.likes.retain(|l| l.id != id);
        Ok(inner.likes.len() != before)
    }
}

// --- State Helpers ---

/// AppState over a fresh in-memory repository, default (local) config.
pub fn test_state() -> (Arc<MemoryRepository>, AppState) {
    let repo = Arc::new(MemoryRepository::new());
    let state = AppState {
        repo: repo.clone(),
        config: AppConfig::default(),
    };
    (repo, state)
}
