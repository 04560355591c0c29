//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use folio_core::domain::{Like, Post, PostStatus, User};
use folio_core::error::RepoError;
use folio_core::ports::{LikeRepository, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_like::{self, Entity as PostLikeEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::errors::classify;
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Keep the first character of the local part, e.g. `j***@example.com`.
pub(crate) fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(classify)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(classify)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_status(&self, status: PostStatus) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Status.eq(post::Status::from(status)))
            .order_by_desc(post::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(classify)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn all_ids(&self) -> Result<Vec<Uuid>, RepoError> {
        PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(classify)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: PostStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: Set(id),
            status: Set(status.into()),
            published_at: Set(published_at.map(Into::into)),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };

        let updated = model.update(&self.db).await.map_err(classify)?;
        Ok(updated.into())
    }

    async fn set_likes_count(&self, id: Uuid, count: u64) -> Result<(), RepoError> {
        let count = i64::try_from(count)
            .map_err(|_| RepoError::Constraint(format!("likes_count {count} out of range")))?;

        let result = PostEntity::update_many()
            .col_expr(post::Column::LikesCount, Expr::value(count))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(classify)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL like relation, keyed by `(post_id, user_id)`.
pub struct PostgresLikeRepository {
    db: DbConn,
}

impl PostgresLikeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn exists(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let found = PostLikeEntity::find_by_id((post_id, user_id))
            .one(&self.db)
            .await
            .map_err(classify)?;

        Ok(found.is_some())
    }

    async fn insert(&self, like: Like) -> Result<bool, RepoError> {
        let model: post_like::ActiveModel = like.into();

        let inserted = PostLikeEntity::insert(model)
            .on_conflict(
                OnConflict::columns([post_like::Column::PostId, post_like::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(classify)?;

        Ok(inserted > 0)
    }

    async fn delete(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let result = PostLikeEntity::delete_by_id((post_id, user_id))
            .exec(&self.db)
            .await
            .map_err(classify)?;

        Ok(result.rows_affected > 0)
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        PostLikeEntity::find()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(classify)
    }
}
