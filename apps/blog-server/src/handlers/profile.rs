//! Profile pages and the requester's own account form.

use actix_web::{HttpResponse, web};

use blogicum_core::pagination::PageRequest;
use blogicum_shared::dto::{PageQuery, ProfileRequest, ProfileResponse};

use super::present;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /profile/{username}/ - hidden posts are listed for the owner only.
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::parse(query.page.as_deref());
    let result = state
        .blog
        .profile_page(&viewer.context(), &path, page)
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile: present::user(&result.user, result.is_owner),
        is_owner: result.is_owner,
        posts: present::page(result.posts, present::post),
    }))
}

/// GET /profile/edit/
pub async fn edit_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.blog.own_profile(&identity.context()).await?;

    Ok(HttpResponse::Ok().json(ProfileRequest {
        username: user.username,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
    }))
}

/// POST /profile/edit/
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .blog
        .update_profile(&identity.context(), present::profile_form(body.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(present::user(&user, true)))
}
