//! Staff console operations. Callers are expected to have checked the staff
//! role; nothing here is subject to the visibility rules.

use chrono::{DateTime, Utc};

use super::{BlogService, PostSummary};
use crate::domain::{Category, Id, Location, Post};
use crate::error::{DomainError, RepoError};
use crate::forms::{CategoryForm, LocationForm};
use crate::pagination::{Page, PageRequest};
use crate::visibility::PostQuery;

/// Filters of the admin post list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminPostFilter {
    pub is_published: Option<bool>,
    pub author_id: Option<Id>,
    pub category_id: Option<Id>,
    pub location_id: Option<Id>,
    pub pub_date_from: Option<DateTime<Utc>>,
    pub pub_date_until: Option<DateTime<Utc>>,
}

impl From<AdminPostFilter> for PostQuery {
    fn from(filter: AdminPostFilter) -> Self {
        PostQuery {
            author_id: filter.author_id,
            category_id: filter.category_id,
            location_id: filter.location_id,
            is_published: filter.is_published,
            pub_date_from: filter.pub_date_from,
            pub_date_until: filter.pub_date_until,
            visible_at: None,
        }
    }
}

impl BlogService {
    pub async fn admin_categories(
        &self,
        is_published: Option<bool>,
    ) -> Result<Vec<Category>, DomainError> {
        Ok(self.repos.categories.list(is_published).await?)
    }

    pub async fn admin_create_category(&self, form: CategoryForm) -> Result<Category, DomainError> {
        let form = form.validate()?;
        self.ensure_slug_free(&form.slug, None).await?;

        let mut category = Category::new(String::new(), String::new(), String::new());
        form.apply_to(&mut category);
        let category = self.repos.categories.save(category).await?;
        tracing::info!(category_id = category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    pub async fn admin_update_category(
        &self,
        category_id: Id,
        form: CategoryForm,
    ) -> Result<Category, DomainError> {
        let mut category = self
            .repos
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| DomainError::not_found("category", category_id))?;
        let form = form.validate()?;
        self.ensure_slug_free(&form.slug, Some(category_id)).await?;

        form.apply_to(&mut category);
        Ok(self.repos.categories.save(category).await?)
    }

    /// Posts of the category stay, without a category.
    pub async fn admin_delete_category(&self, category_id: Id) -> Result<(), DomainError> {
        self.repos
            .categories
            .delete(category_id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::not_found("category", category_id),
                other => other.into(),
            })?;
        tracing::info!(category_id, "Category deleted");
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str, owner: Option<Id>) -> Result<(), DomainError> {
        match self.repos.categories.find_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::Duplicate(format!(
                "Category with slug '{slug}' already exists"
            ))),
            _ => Ok(()),
        }
    }

    pub async fn admin_locations(
        &self,
        is_published: Option<bool>,
    ) -> Result<Vec<Location>, DomainError> {
        Ok(self.repos.locations.list(is_published).await?)
    }

    pub async fn admin_create_location(&self, form: LocationForm) -> Result<Location, DomainError> {
        let form = form.validate()?;
        let mut location = Location::new(String::new());
        form.apply_to(&mut location);
        let location = self.repos.locations.save(location).await?;
        tracing::info!(location_id = location.id, "Location created");
        Ok(location)
    }

    pub async fn admin_update_location(
        &self,
        location_id: Id,
        form: LocationForm,
    ) -> Result<Location, DomainError> {
        let mut location = self
            .repos
            .locations
            .find_by_id(location_id)
            .await?
            .ok_or_else(|| DomainError::not_found("location", location_id))?;
        let form = form.validate()?;
        form.apply_to(&mut location);
        Ok(self.repos.locations.save(location).await?)
    }

    /// Posts at the location stay, without a location.
    pub async fn admin_delete_location(&self, location_id: Id) -> Result<(), DomainError> {
        self.repos
            .locations
            .delete(location_id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::not_found("location", location_id),
                other => other.into(),
            })?;
        tracing::info!(location_id, "Location deleted");
        Ok(())
    }

    /// Every post, hidden ones included.
    pub async fn admin_posts(
        &self,
        filter: AdminPostFilter,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, DomainError> {
        self.list_posts(&filter.into(), page).await
    }

    /// The publication toggle authors cannot reach.
    pub async fn admin_set_post_published(
        &self,
        post_id: Id,
        is_published: bool,
    ) -> Result<Post, DomainError> {
        let mut post = self
            .repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;
        post.publication.is_published = is_published;
        let post = self.repos.posts.save(post).await?;
        tracing::info!(post_id, is_published, "Post publication changed");
        Ok(post)
    }
}
