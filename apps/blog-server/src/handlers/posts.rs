//! Post pages: the home feed, single posts and their author-only edits.

use actix_web::{HttpResponse, http::header, web};

use blogicum_core::domain::Id;
use blogicum_core::pagination::PageRequest;
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::{PageQuery, PostRequest};

use super::present;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppResult, allowed};
use crate::state::AppState;

/// GET / - visible posts, newest first.
pub async fn index(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::parse(query.page.as_deref());
    let posts = state.blog.home_page(&viewer.context(), page).await?;

    Ok(HttpResponse::Ok().json(present::page(posts, present::post)))
}

/// GET /posts/{id}/
pub async fn detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Id>,
) -> AppResult<HttpResponse> {
    let detail = state
        .blog
        .post_detail(&viewer.context(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(present::post_detail(detail)))
}

/// POST /posts/create/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let ctx = identity.context();
    let post = state
        .blog
        .create_post(&ctx, present::post_form(body.into_inner()))
        .await?;
    let detail = state.blog.post_detail(&ctx, post.id).await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/posts/{}/", post.id)))
        .json(present::post_detail(detail)))
}

/// GET /posts/{id}/edit/ - current values of the edit form.
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Id>,
) -> AppResult<HttpResponse> {
    let post = allowed(
        state
            .blog
            .post_for_edit(&identity.context(), path.into_inner())
            .await?,
    )?;

    Ok(HttpResponse::Ok().json(PostRequest {
        title: post.title,
        text: post.text,
        pub_date: post.pub_date.to_rfc3339(),
        image: post.image,
        location_id: post.location_id,
        category_id: post.category_id,
    }))
}

/// POST /posts/{id}/edit/
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Id>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let ctx = identity.context();
    let post = allowed(
        state
            .blog
            .update_post(&ctx, path.into_inner(), present::post_form(body.into_inner()))
            .await?,
    )?;
    let detail = state.blog.post_detail(&ctx, post.id).await?;

    Ok(HttpResponse::Ok().json(present::post_detail(detail)))
}

/// POST /posts/{id}/delete/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Id>,
) -> AppResult<HttpResponse> {
    let ctx = identity.context();
    let post = allowed(state.blog.delete_post(&ctx, path.into_inner()).await?)?;
    let owner = state.blog.own_profile(&ctx).await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::LOCATION, format!("/profile/{}/", owner.username)))
        .json(ApiResponse::ok_with_message(post.id, "Post deleted")))
}
