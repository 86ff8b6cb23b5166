//! Comment writes. Reading happens on the post page.

use actix_web::{HttpResponse, http::header, web};

use blogicum_core::domain::Id;
use blogicum_core::services::CommentView;
use blogicum_shared::ApiResponse;
use blogicum_shared::dto::CommentRequest;

use super::present;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppResult, allowed};
use crate::state::AppState;

/// POST /posts/{id}/comment/
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Id>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let view = state
        .blog
        .add_comment(
            &identity.context(),
            post_id,
            present::comment_form(body.into_inner()),
        )
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/posts/{post_id}/")))
        .json(present::comment(view)))
}

/// GET /posts/{id}/edit_comment/{comment_id}/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Id, Id)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = allowed(
        state
            .blog
            .comment_for_edit(&identity.context(), post_id, comment_id)
            .await?,
    )?;

    Ok(HttpResponse::Ok().json(CommentRequest { text: comment.text }))
}

/// POST /posts/{id}/edit_comment/{comment_id}/
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Id, Id)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let ctx = identity.context();
    let comment = allowed(
        state
            .blog
            .update_comment(
                &ctx,
                post_id,
                comment_id,
                present::comment_form(body.into_inner()),
            )
            .await?,
    )?;
    let author = state.blog.own_profile(&ctx).await?;

    Ok(HttpResponse::Ok().json(present::comment(CommentView {
        comment,
        author: author.username,
    })))
}

/// POST /posts/{id}/delete_comment/{comment_id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Id, Id)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = allowed(
        state
            .blog
            .delete_comment(&identity.context(), post_id, comment_id)
            .await?,
    )?;

    Ok(HttpResponse::Ok()
        .insert_header((header::LOCATION, format!("/posts/{post_id}/")))
        .json(ApiResponse::ok_with_message(comment.id, "Comment deleted")))
}
