//! Staff console: categories, locations and post moderation.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::Id;
use blogicum_core::error::ValidationErrors;
use blogicum_core::forms::{CategoryForm, LocationForm, parse_timestamp};
use blogicum_core::pagination::PageRequest;
use blogicum_core::services::AdminPostFilter;
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{
    AdminPostQuery, CategoryRequest, LocationRequest, PublishRequest, PublishedFilter,
};

use super::present;
use crate::middleware::auth::Staff;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn category_form(req: CategoryRequest) -> CategoryForm {
    CategoryForm {
        title: req.title,
        description: req.description,
        slug: req.slug,
        is_published: req.is_published,
    }
}

fn location_form(req: LocationRequest) -> LocationForm {
    LocationForm {
        name: req.name,
        is_published: req.is_published,
    }
}

/// GET /admin/categories/
pub async fn list_categories(
    state: web::Data<AppState>,
    _staff: Staff,
    query: web::Query<PublishedFilter>,
) -> AppResult<HttpResponse> {
    let categories = state.blog.admin_categories(query.is_published).await?;
    let body: Vec<_> = categories.into_iter().map(present::category).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /admin/categories/
pub async fn create_category(
    state: web::Data<AppState>,
    _staff: Staff,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .blog
        .admin_create_category(category_form(body.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(present::category(category)))
}

/// PUT /admin/categories/{id}/
pub async fn update_category(
    state: web::Data<AppState>,
    _staff: Staff,
    path: web::Path<Id>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .blog
        .admin_update_category(path.into_inner(), category_form(body.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(present::category(category)))
}

/// DELETE /admin/categories/{id}/ - its posts stay, without a category.
pub async fn delete_category(
    state: web::Data<AppState>,
    _staff: Staff,
    path: web::Path<Id>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.blog.admin_delete_category(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(id, "Category deleted")))
}

/// GET /admin/locations/
pub async fn list_locations(
    state: web::Data<AppState>,
    _staff: Staff,
    query: web::Query<PublishedFilter>,
) -> AppResult<HttpResponse> {
    let locations = state.blog.admin_locations(query.is_published).await?;
    let body: Vec<_> = locations.into_iter().map(present::location).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /admin/locations/
pub async fn create_location(
    state: web::Data<AppState>,
    _staff: Staff,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    let location = state
        .blog
        .admin_create_location(location_form(body.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(present::location(location)))
}

/// PUT /admin/locations/{id}/
pub async fn update_location(
    state: web::Data<AppState>,
    _staff: Staff,
    path: web::Path<Id>,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    let location = state
        .blog
        .admin_update_location(path.into_inner(), location_form(body.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(present::location(location)))
}

/// DELETE /admin/locations/{id}/
pub async fn delete_location(
    state: web::Data<AppState>,
    _staff: Staff,
    path: web::Path<Id>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.blog.admin_delete_location(id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(id, "Location deleted")))
}

/// GET /admin/posts/ - every post, hidden ones included.
pub async fn list_posts(
    state: web::Data<AppState>,
    _staff: Staff,
    query: web::Query<AdminPostQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let mut errors = ValidationErrors::new();
    let mut bound = |field: &'static str, raw: Option<&str>| {
        let raw = raw?;
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            errors.add(field, "Enter a valid date/time.");
        }
        parsed
    };
    let pub_date_from = bound("pub_date_from", query.pub_date_from.as_deref());
    let pub_date_until = bound("pub_date_until", query.pub_date_until.as_deref());
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let filter = AdminPostFilter {
        is_published: query.is_published,
        author_id: query.author_id,
        category_id: query.category_id,
        location_id: query.location_id,
        pub_date_from,
        pub_date_until,
    };
    let page = PageRequest::parse(query.page.as_deref());

    let posts = state.blog.admin_posts(filter, page).await?;
    Ok(HttpResponse::Ok().json(present::page(posts, present::post)))
}

/// POST /admin/posts/{id}/publish/
pub async fn set_post_published(
    state: web::Data<AppState>,
    Staff(staff): Staff,
    path: web::Path<Id>,
    body: web::Json<PublishRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .blog
        .admin_set_post_published(path.into_inner(), body.is_published)
        .await?;
    tracing::info!(post_id = post.id, staff_id = staff.user_id, "Publication toggled");

    let message = if post.publication.is_published {
        "Post published"
    } else {
        "Post hidden"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(post.id, message)))
}
