use std::sync::Arc;

use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::from_fn;
use actix_web::{App, test, web};
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use blogicum_core::domain::{Category, Post, User};
use blogicum_core::ports::Repositories;
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

use crate::middleware::error::not_found;
use crate::observability;
use crate::state::AppState;

struct Harness {
    state: AppState,
    repos: Repositories,
}

impl Harness {
    fn new() -> Self {
        let repos = InMemoryStore::new().repositories();
        let state = AppState::from_parts(
            repos.clone(),
            "memory",
            Arc::new(JwtTokenService::new(JwtConfig::default())),
            Arc::new(Argon2PasswordService::with_cost(1024, 1, 1).unwrap()),
        );
        Self { state, repos }
    }

    async fn user(&self, username: &str, is_staff: bool) -> (User, String) {
        let mut user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "unused".to_string(),
        );
        user.is_staff = is_staff;
        let user = self.repos.users.save(user).await.unwrap();
        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username, user.roles())
            .unwrap();
        (user, format!("Bearer {token}"))
    }

    async fn post(&self, author: &User, configure: impl FnOnce(&mut Post)) -> Post {
        let mut post = Post::new(
            author.id,
            "A day in Moscow".to_string(),
            "Walked a lot.".to_string(),
            Utc::now() - Duration::hours(1),
        );
        configure(&mut post);
        self.repos.posts.save(post).await.unwrap()
    }
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .wrap(from_fn(observability::request_id))
                .app_data(web::Data::new($harness.state.clone()))
                .configure(super::configure_routes)
                .default_service(web::to(not_found)),
        )
        .await
    };
}

async fn body_json<B: actix_web::body::MessageBody>(res: ServiceResponse<B>) -> Value {
    test::read_body_json(res).await
}

macro_rules! send {
    ($app:expr, $req:expr $(,)?) => {
        test::call_service(&$app, $req.to_request()).await
    };
}

#[actix_web::test]
async fn test_health_reports_storage() {
    let harness = Harness::new();
    let app = app!(harness);

    let res = send!(app, test::TestRequest::get().uri("/health/"));
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body = body_json(res).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_web::test]
async fn test_hidden_post_is_404_for_anonymous_and_200_for_author() {
    let harness = Harness::new();
    let (author, token) = harness.user("author", false).await;
    let post = harness
        .post(&author, |p| p.pub_date = Utc::now() + Duration::days(3))
        .await;
    let app = app!(harness);
    let uri = format!("/posts/{}/", post.id);

    let res = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["status"], 404);

    let res = send!(
        app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, token)),
    );
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["post"]["id"], post.id);
    assert_eq!(body["post"]["author"], "author");
}

#[actix_web::test]
async fn test_non_author_edit_redirects_to_post() {
    let harness = Harness::new();
    let (author, _) = harness.user("author", false).await;
    let (_, stranger_token) = harness.user("stranger", false).await;
    let post = harness.post(&author, |_| {}).await;
    let app = app!(harness);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header((header::AUTHORIZATION, stranger_token.clone()))
            .set_json(json!({
                "title": "Hijacked",
                "text": "Nope",
                "pub_date": "2020-01-01T00:00:00Z"
            })),
    );
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        res.headers().get(header::LOCATION).unwrap(),
        &format!("/posts/{}/", post.id)
    );

    let res = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/delete/", post.id))
            .insert_header((header::AUTHORIZATION, stranger_token)),
    );
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let stored = harness.repos.posts.find_by_id(post.id).await.unwrap();
    assert_eq!(stored, Some(post));
}

#[actix_web::test]
async fn test_anonymous_edit_requires_login() {
    let harness = Harness::new();
    let (author, _) = harness.user("author", false).await;
    let post = harness.post(&author, |_| {}).await;
    let app = app!(harness);

    let res = send!(
        app,
        test::TestRequest::get().uri(&format!("/posts/{}/edit/", post.id)),
    );
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_missing_post_edit_is_404() {
    let harness = Harness::new();
    let (_, token) = harness.user("author", false).await;
    let app = app!(harness);

    let res = send!(
        app,
        test::TestRequest::get()
            .uri("/posts/404/edit/")
            .insert_header((header::AUTHORIZATION, token)),
    );
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_home_page_is_paginated_by_ten() {
    let harness = Harness::new();
    let (author, _) = harness.user("author", false).await;
    for hours in 1..=12 {
        harness
            .post(&author, |p| p.pub_date = Utc::now() - Duration::hours(hours))
            .await;
    }
    let app = app!(harness);

    let body = body_json(send!(app, test::TestRequest::get().uri("/"))).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["total"], 12);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["has_next"], true);

    let body = body_json(send!(app, test::TestRequest::get().uri("/?page=2"))).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["page"], 2);
    assert_eq!(body["has_previous"], true);

    // Out of range and garbage page numbers are clamped.
    let body = body_json(send!(app, test::TestRequest::get().uri("/?page=99"))).await;
    assert_eq!(body["page"], 2);
    let body = body_json(send!(app, test::TestRequest::get().uri("/?page=abc"))).await;
    assert_eq!(body["page"], 1);
}

#[actix_web::test]
async fn test_create_post_requires_authentication() {
    let harness = Harness::new();
    let (_, token) = harness.user("author", false).await;
    let app = app!(harness);
    let payload = json!({
        "title": "First trip",
        "text": "Went to Kazan.",
        "pub_date": "2024-05-01T10:30"
    });

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .set_json(payload.clone()),
    );
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .insert_header((header::AUTHORIZATION, token))
            .set_json(payload),
    );
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    assert_eq!(body["post"]["author"], "author");
    assert_eq!(body["post"]["is_published"], true);
    assert_eq!(body["comments"], json!([]));
}

#[actix_web::test]
async fn test_invalid_post_form_lists_field_errors() {
    let harness = Harness::new();
    let (_, token) = harness.user("author", false).await;
    let app = app!(harness);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/posts/create/")
            .insert_header((header::AUTHORIZATION, token))
            .set_json(json!({ "title": "", "text": "", "pub_date": "yesterday" })),
    );
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(res).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"pub_date"));
}

#[actix_web::test]
async fn test_comment_flow() {
    let harness = Harness::new();
    let (author, _) = harness.user("author", false).await;
    let (_, reader_token) = harness.user("reader", false).await;
    let post = harness.post(&author, |_| {}).await;
    let app = app!(harness);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", post.id))
            .insert_header((header::AUTHORIZATION, reader_token.clone()))
            .set_json(json!({ "text": "Lovely!" })),
    );
    assert_eq!(res.status(), StatusCode::CREATED);
    let comment = body_json(res).await;
    assert_eq!(comment["author"], "reader");

    let res = send!(
        app,
        test::TestRequest::post()
            .uri(&format!(
                "/posts/{}/edit_comment/{}/",
                post.id, comment["id"]
            ))
            .insert_header((header::AUTHORIZATION, reader_token))
            .set_json(json!({ "text": "Lovely indeed!" })),
    );
    assert_eq!(res.status(), StatusCode::OK);

    let body = body_json(
        send!(
            app,
            test::TestRequest::get().uri(&format!("/posts/{}/", post.id)),
        ),
    )
    .await;
    assert_eq!(body["post"]["comment_count"], 1);
    assert_eq!(body["comments"][0]["text"], "Lovely indeed!");
}

#[actix_web::test]
async fn test_unpublished_category_page_is_404() {
    let harness = Harness::new();
    let mut category = Category::new(
        "Travel".to_string(),
        "Trips".to_string(),
        "travel".to_string(),
    );
    category.publication.is_published = false;
    harness.repos.categories.save(category).await.unwrap();
    let app = app!(harness);

    let res = send!(app, test::TestRequest::get().uri("/category/travel/"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_profile_email_is_shown_to_owner_only() {
    let harness = Harness::new();
    let (_, token) = harness.user("leo", false).await;
    let app = app!(harness);

    let body = body_json(send!(app, test::TestRequest::get().uri("/profile/leo/"))).await;
    assert_eq!(body["is_owner"], false);
    assert!(body["profile"].get("email").is_none());

    let body = body_json(
        send!(
            app,
            test::TestRequest::get()
                .uri("/profile/leo/")
                .insert_header((header::AUTHORIZATION, token)),
        ),
    )
    .await;
    assert_eq!(body["is_owner"], true);
    assert_eq!(body["profile"]["email"], "leo@example.com");
}

#[actix_web::test]
async fn test_admin_console_is_staff_only() {
    let harness = Harness::new();
    let (_, user_token) = harness.user("reader", false).await;
    let (_, staff_token) = harness.user("editor", true).await;
    let app = app!(harness);
    let payload = json!({ "title": "Travel", "description": "Trips", "slug": "travel" });

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/admin/categories/")
            .insert_header((header::AUTHORIZATION, user_token))
            .set_json(payload.clone()),
    );
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/admin/categories/")
            .insert_header((header::AUTHORIZATION, staff_token.clone()))
            .set_json(payload.clone()),
    );
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/admin/categories/")
            .insert_header((header::AUTHORIZATION, staff_token))
            .set_json(payload),
    );
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let harness = Harness::new();
    let app = app!(harness);

    let res = send!(
        app,
        test::TestRequest::post().uri("/auth/register/").set_json(json!({
            "username": "leo",
            "email": "leo@example.com",
            "password": "war-and-peace"
        })),
    );
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_json(json!({ "username": "leo", "password": "wrong-password" })),
    );
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/login/")
            .set_json(json!({ "username": "leo", "password": "war-and-peace" })),
    );
    assert_eq!(res.status(), StatusCode::OK);
    let token = body_json(res).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let body = body_json(
        send!(
            app,
            test::TestRequest::get()
                .uri("/auth/me/")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}"))),
        ),
    )
    .await;
    assert_eq!(body["username"], "leo");
    assert_eq!(body["roles"], json!(["user"]));
}

#[actix_web::test]
async fn test_unknown_route_and_bad_id_are_404() {
    let harness = Harness::new();
    let app = app!(harness);

    let res = send!(app, test::TestRequest::get().uri("/nowhere/"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["instance"], "/nowhere/");

    let res = send!(app, test::TestRequest::get().uri("/posts/abc/"));
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_rename_then_delete_points_at_new_profile() {
    let harness = Harness::new();
    let (author, token) = harness.user("leo", false).await;
    let post = harness.post(&author, |_| {}).await;
    let app = app!(harness);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/profile/edit/")
            .insert_header((header::AUTHORIZATION, token.clone()))
            .set_json(json!({ "username": "tolstoy", "email": "" })),
    );
    assert_eq!(res.status(), StatusCode::OK);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/delete/", post.id))
            .insert_header((header::AUTHORIZATION, token.clone())),
    );
    assert_eq!(res.status(), StatusCode::OK);
    let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
    assert_eq!(location, "/profile/tolstoy/");

    let res = send!(app, test::TestRequest::get().uri("/profile/tolstoy/"));
    assert_eq!(res.status(), StatusCode::OK);

    let body = body_json(send!(
        app,
        test::TestRequest::get()
            .uri("/auth/me/")
            .insert_header((header::AUTHORIZATION, token)),
    ))
    .await;
    assert_eq!(body["username"], "tolstoy");
}

#[actix_web::test]
async fn test_password_change_and_logout() {
    let harness = Harness::new();
    let app = app!(harness);

    let res = send!(
        app,
        test::TestRequest::post().uri("/auth/register/").set_json(json!({
            "username": "leo",
            "email": "leo@example.com",
            "password": "war-and-peace"
        })),
    );
    assert_eq!(res.status(), StatusCode::CREATED);
    let token = format!(
        "Bearer {}",
        body_json(res).await["access_token"].as_str().unwrap()
    );

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/password_change/")
            .set_json(json!({
                "old_password": "war-and-peace",
                "new_password": "resurrection"
            })),
    );
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/password_change/")
            .insert_header((header::AUTHORIZATION, token.clone()))
            .set_json(json!({
                "old_password": "anna-karenina",
                "new_password": "resurrection"
            })),
    );
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["errors"][0]["field"], "old_password");

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/password_change/")
            .insert_header((header::AUTHORIZATION, token.clone()))
            .set_json(json!({
                "old_password": "war-and-peace",
                "new_password": "resurrection"
            })),
    );
    assert_eq!(res.status(), StatusCode::OK);

    for (password, status) in [
        ("war-and-peace", StatusCode::UNAUTHORIZED),
        ("resurrection", StatusCode::OK),
    ] {
        let res = send!(
            app,
            test::TestRequest::post()
                .uri("/auth/login/")
                .set_json(json!({ "username": "leo", "password": password })),
        );
        assert_eq!(res.status(), status);
    }

    let res = send!(app, test::TestRequest::post().uri("/auth/logout/"));
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = send!(
        app,
        test::TestRequest::post()
            .uri("/auth/logout/")
            .insert_header((header::AUTHORIZATION, token)),
    );
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn test_admin_post_list_filters_by_pub_date() {
    let harness = Harness::new();
    let (author, _) = harness.user("author", false).await;
    let (_, staff_token) = harness.user("editor", true).await;
    let recent = harness.post(&author, |_| {}).await;
    harness
        .post(&author, |p| p.pub_date = Utc::now() - Duration::days(30))
        .await;
    harness
        .post(&author, |p| p.pub_date = Utc::now() + Duration::days(30))
        .await;
    let app = app!(harness);

    let from = (Utc::now() - Duration::days(7)).format("%Y-%m-%dT%H:%M");
    let until = (Utc::now() + Duration::days(1)).format("%Y-%m-%dT%H:%M");
    let res = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/admin/posts/?pub_date_from={from}&pub_date_until={until}"))
            .insert_header((header::AUTHORIZATION, staff_token.clone())),
    );
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], recent.id);

    let res = send!(
        app,
        test::TestRequest::get()
            .uri("/admin/posts/?pub_date_from=last-week")
            .insert_header((header::AUTHORIZATION, staff_token)),
    );
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["errors"][0]["field"], "pub_date_from");
}
