use actix_web::{HttpResponse, web};

use blogicum_core::pagination::PageRequest;
use blogicum_shared::dto::{CategoryPageResponse, PageQuery};

use super::present;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /category/{slug}/ - visible posts of a published category.
pub async fn category_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::parse(query.page.as_deref());
    let result = state
        .blog
        .category_page(&viewer.context(), &path, page)
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPageResponse {
        category: present::category(result.category),
        posts: present::page(result.posts, present::post),
    }))
}
