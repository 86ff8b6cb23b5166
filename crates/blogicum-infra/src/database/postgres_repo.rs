//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};

use blogicum_core::domain::{Category, Comment, Id, Location, Post, User};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blogicum_core::visibility::PostQuery;

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Translate a [`PostQuery`] into a SELECT over `posts`.
///
/// The visibility clause left-joins `categories` so that posts without a
/// category pass the "category published" test.
pub(crate) fn post_select(query: &PostQuery) -> Select<PostEntity> {
    let mut select = PostEntity::find();

    if let Some(author_id) = query.author_id {
        select = select.filter(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }
    if let Some(location_id) = query.location_id {
        select = select.filter(post::Column::LocationId.eq(location_id));
    }
    if let Some(is_published) = query.is_published {
        select = select.filter(post::Column::IsPublished.eq(is_published));
    }
    if let Some(from) = query.pub_date_from {
        let from: sea_orm::prelude::DateTimeWithTimeZone = from.into();
        select = select.filter(post::Column::PubDate.gte(from));
    }
    if let Some(until) = query.pub_date_until {
        let until: sea_orm::prelude::DateTimeWithTimeZone = until.into();
        select = select.filter(post::Column::PubDate.lt(until));
    }
    if let Some(now) = query.visible_at {
        let now: sea_orm::prelude::DateTimeWithTimeZone = now.into();
        select = select
            .join(JoinType::LeftJoin, post::Relation::Category.def())
            .filter(post::Column::IsPublished.eq(true))
            .filter(post::Column::PubDate.lte(now))
            .filter(
                Condition::any()
                    .add(post::Column::CategoryId.is_null())
                    .add(category::Column::IsPublished.eq(true)),
            );
    }

    select
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        post_select(query).count(self.db.as_ref()).await.map_err(map_db_err)
    }

    async fn find_page(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let result = post_select(query)
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct CommentCount {
    post_id: i64,
    total: i64,
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: Id) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_posts(&self, post_ids: &[Id]) -> Result<HashMap<Id, u64>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "total")
            .filter(comment::Column::PostId.is_in(post_ids.to_vec()))
            .group_by(comment::Column::PostId)
            .into_model::<CommentCount>()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.post_id, row.total.max(0) as u64))
            .collect())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<Category>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list(&self, is_published: Option<bool>) -> Result<Vec<Category>, RepoError> {
        let mut select = CategoryEntity::find();
        if let Some(flag) = is_published {
            select = select.filter(category::Column::IsPublished.eq(flag));
        }
        let result = select
            .order_by_asc(category::Column::Title)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn find_by_ids(&self, ids: &[Id]) -> Result<Vec<Location>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let result = LocationEntity::find()
            .filter(location::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list(&self, is_published: Option<bool>) -> Result<Vec<Location>, RepoError> {
        let mut select = LocationEntity::find();
        if let Some(flag) = is_published {
            select = select.filter(location::Column::IsPublished.eq(flag));
        }
        let result = select
            .order_by_asc(location::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
