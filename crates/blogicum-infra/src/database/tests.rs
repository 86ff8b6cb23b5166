use blogicum_core::domain::{Category, Post, UNSAVED_ID};
use blogicum_core::ports::{BaseRepository, CommentRepository, PostRepository};
use blogicum_core::visibility::PostQuery;
use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

use crate::database::entity::{category, comment, post};
use crate::database::postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository, post_select,
};

fn post_model(id: i64, author_id: i64) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        title: "Test Post".to_owned(),
        text: "Content".to_owned(),
        pub_date: (now - Duration::hours(1)).into(),
        image: None,
        is_published: true,
        created_at: now.into(),
        author_id,
        location_id: None,
        category_id: None,
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(42, 7)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(42).await.unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, 42);
    assert_eq!(post.author_id, 7);
    assert!(post.publication.is_published);
}

#[tokio::test]
async fn test_insert_new_post_returns_generated_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(5, 7)]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let post = Post::new(7, "Test Post".into(), "Content".into(), Utc::now());
    assert_eq!(post.id, UNSAVED_ID);

    let saved = repo.save(post).await.unwrap();
    assert_eq!(saved.id, 5);
}

#[tokio::test]
async fn test_delete_missing_category_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let repo = PostgresCategoryRepository::new(db);

    let result = BaseRepository::<Category, i64>::delete(&repo, 99).await;
    assert!(matches!(
        result,
        Err(blogicum_core::error::RepoError::NotFound)
    ));
}

#[tokio::test]
async fn test_find_page_maps_rows_in_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(2, 1), post_model(1, 1)]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let posts = repo
        .find_page(&PostQuery::public(Utc::now()), 0, 10)
        .await
        .unwrap();
    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_comments_of_post() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            comment::Model {
                id: 1,
                text: "first".to_owned(),
                created_at: now.into(),
                author_id: 3,
                post_id: 42,
            },
            comment::Model {
                id: 2,
                text: "second".to_owned(),
                created_at: (now + Duration::minutes(1)).into(),
                author_id: 4,
                post_id: 42,
            },
        ]])
        .into_connection();
    let repo = PostgresCommentRepository::new(db);

    let comments = repo.find_by_post(42).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert!(comments[0].created_at <= comments[1].created_at);
}

#[test]
fn test_visibility_clause_in_generated_sql() {
    let sql = post_select(&PostQuery::public(Utc::now()))
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains(r#"LEFT JOIN "categories""#));
    assert!(sql.contains(r#""posts"."is_published""#));
    assert!(sql.contains(r#""posts"."pub_date" <="#));
    assert!(sql.contains(r#""posts"."category_id" IS NULL"#));
    assert!(sql.contains(r#""categories"."is_published""#));
}

#[test]
fn test_own_profile_query_has_no_visibility_clause() {
    let query = PostQuery {
        author_id: Some(7),
        ..PostQuery::all()
    };
    let sql = post_select(&query)
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains(r#""posts"."author_id" = 7"#));
    assert!(!sql.contains("categories"));
}

#[test]
fn test_pub_date_range_is_half_open() {
    let now = Utc::now();
    let query = PostQuery {
        pub_date_from: Some(now - Duration::days(7)),
        pub_date_until: Some(now),
        ..PostQuery::all()
    };
    let sql = post_select(&query)
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains(r#""posts"."pub_date" >="#));
    assert!(sql.contains(r#""posts"."pub_date" <"#));
    assert!(!sql.contains(r#""posts"."pub_date" <="#));
}

#[tokio::test]
async fn test_repositories_share_one_pool() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(3, 1)]])
        .append_query_results(vec![vec![category::Model {
            id: 8,
            title: "Travel".to_owned(),
            description: "Trips".to_owned(),
            slug: "travel".to_owned(),
            is_published: true,
            created_at: Utc::now().into(),
        }]])
        .into_connection();
    let pool = Arc::new(db);

    let posts = PostgresPostRepository::new(Arc::clone(&pool));
    let categories = PostgresCategoryRepository::new(Arc::clone(&pool));

    let post: Option<Post> = posts.find_by_id(3).await.unwrap();
    let category: Option<Category> = categories.find_by_id(8).await.unwrap();

    assert_eq!(post.unwrap().id, 3);
    assert_eq!(category.unwrap().slug, "travel");
    assert_eq!(Arc::strong_count(&pool), 3);
}
