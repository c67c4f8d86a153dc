use crate::error::ApiError;
use crate::models::{
    Article, ArticleLike, Category, CommentView, Profile, Reaction, UpdateArticleRequest,
    UpdateProfileRequest, UserAccount,
};
use crate::policy::{Actor, Role};
use async_trait::async_trait;
use sqlx::{PgPool, Row, query_builder::QueryBuilder};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Abstract contract for all persistence operations, shared as
/// `Arc<dyn Repository>` across Axum's task boundaries. Handlers only ever
/// talk to this trait; tests swap in an in-memory implementation.
///
/// Every operation that enforces a uniqueness or cross-entity invariant
/// (like creation, registration, token get-or-create) is a single atomic
/// statement or transaction; the check and the write never run separately.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Actor Resolution ---
    /// Loads the actor for a login id: identity plus the full role set
    /// (group memberships and the superuser flag), resolved in one go.
    async fn get_actor(&self, user_id: Uuid) -> Result<Option<Actor>, ApiError>;
    /// Resolves an actor from an opaque API token.
    async fn find_actor_by_api_token(&self, token: &str) -> Result<Option<Actor>, ApiError>;

    // --- Users & Tokens ---
    async fn get_user(&self, id: Uuid) -> Result<Option<UserAccount>, ApiError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserAccount>, ApiError>;
    async fn list_users(&self) -> Result<Vec<UserAccount>, ApiError>;
    /// Atomic registration: account + Users group membership + profile +
    /// API token in one transaction. A taken username is a conflict.
    async fn register_user(
        &self,
        username: &str,
        password_hash: &str,
        api_token: &str,
    ) -> Result<(UserAccount, Profile), ApiError>;
    async fn update_user(
        &self,
        id: Uuid,
        username: Option<String>,
        password_hash: Option<String>,
    ) -> Result<Option<UserAccount>, ApiError>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError>;
    /// Returns the account's API token, storing `candidate` if it has none
    /// yet. One round trip, no read-then-insert race.
    async fn get_or_create_api_token(
        &self,
        user_id: Uuid,
        candidate: &str,
    ) -> Result<String, ApiError>;
    async fn delete_api_token(&self, user_id: Uuid) -> Result<bool, ApiError>;

    // --- Profiles ---
    async fn list_profiles(&self) -> Result<Vec<Profile>, ApiError>;
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, ApiError>;
    async fn update_profile(
        &self,
        id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<Option<Profile>, ApiError>;

    // --- Articles ---
    /// Filtered listing: exact category (case-insensitively parsed by the
    /// handler), tag substring, title search. Newest first.
    async fn list_articles(
        &self,
        category: Option<Category>,
        tag: Option<String>,
        search: Option<String>,
    ) -> Result<Vec<Article>, ApiError>;
    async fn get_article(&self, id: Uuid) -> Result<Option<Article>, ApiError>;
    /// Inserts a fully assembled article (id and slug already set) together
    /// with its tag rows. Duplicate title or slug is a conflict.
    async fn create_article(&self, article: Article) -> Result<Article, ApiError>;
    async fn update_article(
        &self,
        id: Uuid,
        req: UpdateArticleRequest,
    ) -> Result<Option<Article>, ApiError>;
    async fn delete_article(&self, id: Uuid) -> Result<bool, ApiError>;

    // --- Comments ---
    /// Flat listing ordered by creation time ascending, the shape the
    /// comment tree builder expects.
    async fn list_comments(
        &self,
        article_id: Option<Uuid>,
        author_id: Option<Uuid>,
    ) -> Result<Vec<CommentView>, ApiError>;
    async fn get_comment(&self, id: i64) -> Result<Option<CommentView>, ApiError>;
    async fn create_comment(
        &self,
        author_id: Uuid,
        article_id: Uuid,
        content: &str,
        reply_to: Option<i64>,
    ) -> Result<CommentView, ApiError>;
    async fn update_comment(&self, id: i64, content: &str) -> Result<Option<CommentView>, ApiError>;
    async fn delete_comment(&self, id: i64) -> Result<bool, ApiError>;

    // --- Likes ---
    async fn list_likes(&self, article_id: Option<Uuid>) -> Result<Vec<ArticleLike>, ApiError>;
    async fn get_like(&self, id: Uuid) -> Result<Option<ArticleLike>, ApiError>;
    /// One atomic insert-unless-present. A like that already exists for
    /// this (user, article) pair comes back as `Conflict`.
    async fn create_like(
        &self,
        user_id: Uuid,
        article_id: Uuid,
        reaction: Reaction,
    ) -> Result<ArticleLike, ApiError>;
    async fn delete_like(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The production implementation, backed by a PostgreSQL pool.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fills `tags` and `likes` for a batch of article rows with two
    /// grouped side-table queries instead of one pair per article.
    async fn attach_article_extras(&self, articles: &mut [Article]) -> Result<(), ApiError> {
        if articles.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = articles.iter().map(|a| a.id).collect();

        let tag_rows = sqlx::query(
            "SELECT article_id, tag FROM article_tags WHERE article_id = ANY($1) ORDER BY tag",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tags: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in tag_rows {
            tags.entry(row.try_get("article_id")?)
                .or_default()
                .push(row.try_get("tag")?);
        }

        let like_rows = sqlx::query(
            "SELECT article_id, user_id FROM article_likes WHERE article_id = ANY($1) ORDER BY created_at",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut likes: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in like_rows {
            likes
                .entry(row.try_get("article_id")?)
                .or_default()
                .push(row.try_get("user_id")?);
        }

        for article in articles {
            article.tags = tags.remove(&article.id).unwrap_or_default();
            article.likes = likes.remove(&article.id).unwrap_or_default();
        }
        Ok(())
    }
}

/// Maps a unique-index violation onto the taxonomy's `Conflict`; everything
/// else stays an opaque internal error.
fn conflict_on_unique(e: sqlx::Error, message: &str) -> ApiError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::Conflict(message.to_string())
        }
        _ => ApiError::from(e),
    }
}

const ARTICLE_COLUMNS: &str = "a.id, a.author_id, u.username AS author_username, a.title, a.slug, \
     a.category, a.description, a.content, a.status, a.created_at, a.updated_at";

const COMMENT_COLUMNS: &str = "c.id, c.author_id, u.username AS author_username, c.article_id, \
     c.content, c.reply_to, c.created_at, c.updated_at";

const PROFILE_COLUMNS: &str = "p.id, p.user_id, u.username, p.first_name, p.last_name, \
     p.profession, p.bio, p.created_at, p.updated_at";

const LIKE_COLUMNS: &str =
    "l.id, l.user_id, u.username AS user_username, l.article_id, l.reaction, l.created_at";

#[async_trait]
impl Repository for PostgresRepository {
    // --- ACTOR RESOLUTION ---

    async fn get_actor(&self, user_id: Uuid) -> Result<Option<Actor>, ApiError> {
        let row = sqlx::query(
            "SELECT u.id AS user_id, u.username, u.is_superuser, p.id AS profile_id \
             FROM users u JOIN profiles p ON p.user_id = u.id WHERE u.id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };

        let group_rows =
            sqlx::query_scalar::<_, String>("SELECT group_name FROM group_memberships WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        let mut roles: std::collections::BTreeSet<Role> =
            group_rows.iter().filter_map(|g| Role::from_group(g)).collect();
        if row.try_get::<bool, _>("is_superuser")? {
            roles.insert(Role::Superuser);
        }

        Ok(Some(Actor {
            user_id: row.try_get("user_id")?,
            profile_id: row.try_get("profile_id")?,
            username: row.try_get("username")?,
            roles,
        }))
    }

    async fn find_actor_by_api_token(&self, token: &str) -> Result<Option<Actor>, ApiError> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM api_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        match user_id {
            Some(id) => self.get_actor(id).await,
            None => Ok(None),
        }
    }

    // --- USERS & TOKENS ---

    async fn get_user(&self, id: Uuid) -> Result<Option<UserAccount>, ApiError> {
        Ok(sqlx::query_as::<_, UserAccount>(
            "SELECT id, username, password_hash, is_superuser, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserAccount>, ApiError> {
        Ok(sqlx::query_as::<_, UserAccount>(
            "SELECT id, username, password_hash, is_superuser, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_users(&self) -> Result<Vec<UserAccount>, ApiError> {
        Ok(sqlx::query_as::<_, UserAccount>(
            "SELECT id, username, password_hash, is_superuser, created_at FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    /// register_user
    ///
    /// One transaction provisions everything a fresh account needs: the
    /// users row, membership of the Users group, the authoring profile and
    /// the opaque API token. Either all of it lands or none of it does.
    async fn register_user(
        &self,
        username: &str,
        password_hash: &str,
        api_token: &str,
    ) -> Result<(UserAccount, Profile), ApiError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, UserAccount>(
            "INSERT INTO users (id, username, password_hash, is_superuser) \
             VALUES ($1, $2, $3, false) \
             RETURNING id, username, password_hash, is_superuser, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "A user with this username already exists."))?;

        sqlx::query("INSERT INTO group_memberships (user_id, group_name) VALUES ($1, 'Users')")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        let mut profile = sqlx::query_as::<_, Profile>(
            "INSERT INTO profiles (id, user_id, first_name, last_name, profession, bio) \
             VALUES ($1, $2, '', '', '', '') \
             RETURNING id, user_id, first_name, last_name, profession, bio, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .fetch_one(&mut *tx)
        .await?;
        profile.username = user.username.clone();

        sqlx::query("INSERT INTO api_tokens (token, user_id) VALUES ($1, $2)")
            .bind(api_token)
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((user, profile))
    }

    async fn update_user(
        &self,
        id: Uuid,
        username: Option<String>,
        password_hash: Option<String>,
    ) -> Result<Option<UserAccount>, ApiError> {
        sqlx::query_as::<_, UserAccount>(
            "UPDATE users SET username = COALESCE($2, username), \
             password_hash = COALESCE($3, password_hash) \
             WHERE id = $1 \
             RETURNING id, username, password_hash, is_superuser, created_at",
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "A user with this username already exists."))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// get_or_create_api_token
    ///
    /// Insert-or-keep in a single statement: the RETURNING clause hands back
    /// whichever token survives, the fresh candidate or the stored one.
    async fn get_or_create_api_token(
        &self,
        user_id: Uuid,
        candidate: &str,
    ) -> Result<String, ApiError> {
        Ok(sqlx::query_scalar::<_, String>(
            "INSERT INTO api_tokens (token, user_id) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET user_id = api_tokens.user_id \
             RETURNING token",
        )
        .bind(candidate)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn delete_api_token(&self, user_id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM api_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- PROFILES ---

    async fn list_profiles(&self) -> Result<Vec<Profile>, ApiError> {
        Ok(sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles p \
             JOIN users u ON p.user_id = u.id ORDER BY p.created_at",
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, ApiError> {
        Ok(sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles p \
             JOIN users u ON p.user_id = u.id WHERE p.id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<Option<Profile>, ApiError> {
        Ok(sqlx::query_as::<_, Profile>(
            "WITH updated AS ( \
                 UPDATE profiles SET \
                     first_name = COALESCE($2, first_name), \
                     last_name = COALESCE($3, last_name), \
                     profession = COALESCE($4, profession), \
                     bio = COALESCE($5, bio), \
                     updated_at = NOW() \
                 WHERE id = $1 \
                 RETURNING id, user_id, first_name, last_name, profession, bio, created_at, updated_at \
             ) \
             SELECT p.id, p.user_id, u.username, p.first_name, p.last_name, \
                    p.profession, p.bio, p.created_at, p.updated_at \
             FROM updated p JOIN users u ON p.user_id = u.id",
        )
        .bind(id)
        .bind(req.first_name)
        .bind(req.last_name)
        .bind(req.profession)
        .bind(req.bio)
        .fetch_optional(&self.pool)
        .await?)
    }

    // --- ARTICLES ---

    /// list_articles
    ///
    /// Flexible filtering via QueryBuilder with bound parameters throughout.
    async fn list_articles(
        &self,
        category: Option<Category>,
        tag: Option<String>,
        search: Option<String>,
    ) -> Result<Vec<Article>, ApiError> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles a \
             JOIN profiles p ON a.author_id = p.id \
             JOIN users u ON p.user_id = u.id \
             WHERE true",
        ));

        if let Some(c) = category {
            builder.push(" AND a.category = ");
            builder.push_bind(c);
        }

        if let Some(t) = tag {
            builder.push(
                " AND EXISTS (SELECT 1 FROM article_tags at \
                  WHERE at.article_id = a.id AND at.tag ILIKE ",
            );
            builder.push_bind(format!("%{}%", t));
            builder.push(")");
        }

        if let Some(s) = search {
            builder.push(" AND a.title ILIKE ");
            builder.push_bind(format!("%{}%", s));
        }

        builder.push(" ORDER BY a.created_at DESC");

        let mut articles = builder
            .build_query_as::<Article>()
            .fetch_all(&self.pool)
            .await?;
        self.attach_article_extras(&mut articles).await?;
        Ok(articles)
    }

    async fn get_article(&self, id: Uuid) -> Result<Option<Article>, ApiError> {
        let article = sqlx::query_as::<_, Article>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles a \
             JOIN profiles p ON a.author_id = p.id \
             JOIN users u ON p.user_id = u.id \
             WHERE a.id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match article {
            Some(article) => {
                let mut batch = [article];
                self.attach_article_extras(&mut batch).await?;
                let [article] = batch;
                Ok(Some(article))
            }
            None => Ok(None),
        }
    }

    /// create_article
    ///
    /// The slug travels in on the assembled article (set exactly once by the
    /// handler); this insert and the tag rows commit together.
    async fn create_article(&self, article: Article) -> Result<Article, ApiError> {
        let mut tx = self.pool.begin().await?;

        let mut created = sqlx::query_as::<_, Article>(
            "INSERT INTO articles (id, author_id, title, slug, category, description, content, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, author_id, title, slug, category, description, content, status, \
                       created_at, updated_at",
        )
        .bind(article.id)
        .bind(article.author_id)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(article.category)
        .bind(&article.description)
        .bind(&article.content)
        .bind(article.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "An article with this title already exists."))?;

        for tag in &article.tags {
            sqlx::query("INSERT INTO article_tags (article_id, tag) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(article.id)
                .bind(tag)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        created.author_username = article.author_username;
        created.tags = article.tags;
        Ok(created)
    }

    /// update_article
    ///
    /// COALESCE keeps columns whose request field is absent. The slug is
    /// not in the column list at all: it never changes after creation.
    async fn update_article(
        &self,
        id: Uuid,
        req: UpdateArticleRequest,
    ) -> Result<Option<Article>, ApiError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Article>(
            "UPDATE articles SET \
                 title = COALESCE($2, title), \
                 category = COALESCE($3, category), \
                 description = COALESCE($4, description), \
                 content = COALESCE($5, content), \
                 status = COALESCE($6, status), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, author_id, title, slug, category, description, content, status, \
                       created_at, updated_at",
        )
        .bind(id)
        .bind(req.title)
        .bind(req.category)
        .bind(req.description)
        .bind(req.content)
        .bind(req.status)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "An article with this title already exists."))?;

        let Some(updated) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(tags) = req.tags {
            sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for tag in &tags {
                sqlx::query("INSERT INTO article_tags (article_id, tag) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                    .bind(id)
                    .bind(tag)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        self.get_article(updated.id).await
    }

    async fn delete_article(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- COMMENTS ---

    async fn list_comments(
        &self,
        article_id: Option<Uuid>,
        author_id: Option<Uuid>,
    ) -> Result<Vec<CommentView>, ApiError> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c \
             JOIN profiles p ON c.author_id = p.id \
             JOIN users u ON p.user_id = u.id \
             WHERE true",
        ));

        if let Some(article) = article_id {
            builder.push(" AND c.article_id = ");
            builder.push_bind(article);
        }

        if let Some(author) = author_id {
            builder.push(" AND c.author_id = ");
            builder.push_bind(author);
        }

        builder.push(" ORDER BY c.created_at ASC, c.id ASC");

        Ok(builder
            .build_query_as::<CommentView>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_comment(&self, id: i64) -> Result<Option<CommentView>, ApiError> {
        Ok(sqlx::query_as::<_, CommentView>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments c \
             JOIN profiles p ON c.author_id = p.id \
             JOIN users u ON p.user_id = u.id \
             WHERE c.id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// create_comment
    ///
    /// Insert and author join in one query via a CTE, so the enriched view
    /// comes straight back.
    async fn create_comment(
        &self,
        author_id: Uuid,
        article_id: Uuid,
        content: &str,
        reply_to: Option<i64>,
    ) -> Result<CommentView, ApiError> {
        Ok(sqlx::query_as::<_, CommentView>(
            "WITH inserted AS ( \
                 INSERT INTO comments (author_id, article_id, content, reply_to) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, author_id, article_id, content, reply_to, created_at, updated_at \
             ) \
             SELECT i.id, i.author_id, u.username AS author_username, i.article_id, \
                    i.content, i.reply_to, i.created_at, i.updated_at \
             FROM inserted i \
             JOIN profiles p ON i.author_id = p.id \
             JOIN users u ON p.user_id = u.id",
        )
        .bind(author_id)
        .bind(article_id)
        .bind(content)
        .bind(reply_to)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_comment(&self, id: i64, content: &str) -> Result<Option<CommentView>, ApiError> {
        Ok(sqlx::query_as::<_, CommentView>(
            "WITH updated AS ( \
                 UPDATE comments SET content = $2, updated_at = NOW() \
                 WHERE id = $1 \
                 RETURNING id, author_id, article_id, content, reply_to, created_at, updated_at \
             ) \
             SELECT c.id, c.author_id, u.username AS author_username, c.article_id, \
                    c.content, c.reply_to, c.created_at, c.updated_at \
             FROM updated c \
             JOIN profiles p ON c.author_id = p.id \
             JOIN users u ON p.user_id = u.id",
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- LIKES ---

    async fn list_likes(&self, article_id: Option<Uuid>) -> Result<Vec<ArticleLike>, ApiError> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {LIKE_COLUMNS} FROM article_likes l \
             JOIN profiles p ON l.user_id = p.id \
             JOIN users u ON p.user_id = u.id \
             WHERE true",
        ));

        if let Some(article) = article_id {
            builder.push(" AND l.article_id = ");
            builder.push_bind(article);
        }

        builder.push(" ORDER BY l.created_at ASC");

        Ok(builder
            .build_query_as::<ArticleLike>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_like(&self, id: Uuid) -> Result<Option<ArticleLike>, ApiError> {
        Ok(sqlx::query_as::<_, ArticleLike>(&format!(
            "SELECT {LIKE_COLUMNS} FROM article_likes l \
             JOIN profiles p ON l.user_id = p.id \
             JOIN users u ON p.user_id = u.id \
             WHERE l.id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// create_like
    ///
    /// `ON CONFLICT DO NOTHING` on the (user, article) unique index makes
    /// the duplicate check and the insert one indivisible operation; an
    /// empty RETURNING set means the like already existed.
    async fn create_like(
        &self,
        user_id: Uuid,
        article_id: Uuid,
        reaction: Reaction,
    ) -> Result<ArticleLike, ApiError> {
        let inserted = sqlx::query_as::<_, ArticleLike>(
            "WITH inserted AS ( \
                 INSERT INTO article_likes (id, user_id, article_id, reaction) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (user_id, article_id) DO NOTHING \
                 RETURNING id, user_id, article_id, reaction, created_at \
             ) \
             SELECT i.id, i.user_id, u.username AS user_username, i.article_id, \
                    i.reaction, i.created_at \
             FROM inserted i \
             JOIN profiles p ON i.user_id = p.id \
             JOIN users u ON p.user_id = u.id",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(article_id)
        .bind(reaction)
        .fetch_optional(&self.pool)
        .await?;

        inserted.ok_or_else(|| {
            ApiError::Conflict("Each user is allowed to like an article only once.".to_string())
        })
    }

    async fn delete_like(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM article_likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
