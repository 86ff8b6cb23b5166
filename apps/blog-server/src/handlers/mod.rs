//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod categories;
mod comments;
mod health;
mod pages;
mod posts;
mod present;
mod profile;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::{AppError, extractor_error};

/// Configure all application routes.
///
/// Fixed segments (`/posts/create/`, `/profile/edit/`) are registered before
/// the parameterised routes that would otherwise capture them.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| extractor_error(err, req)))
        .app_data(web::QueryConfig::default().error_handler(|err, req| extractor_error(err, req)))
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
        )
        .route("/health/", web::get().to(health::health_check))
        // Blog
        .route("/", web::get().to(posts::index))
        .route("/posts/create/", web::post().to(posts::create))
        .route("/posts/{id}/", web::get().to(posts::detail))
        .service(
            web::resource("/posts/{id}/edit/")
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::update)),
        )
        .route("/posts/{id}/delete/", web::post().to(posts::delete))
        .route("/posts/{id}/comment/", web::post().to(comments::add))
        .service(
            web::resource("/posts/{id}/edit_comment/{comment_id}/")
                .route(web::get().to(comments::edit_form))
                .route(web::post().to(comments::update)),
        )
        .route(
            "/posts/{id}/delete_comment/{comment_id}/",
            web::post().to(comments::delete),
        )
        .route("/category/{slug}/", web::get().to(categories::category_posts))
        .service(
            web::resource("/profile/edit/")
                .route(web::get().to(profile::edit_form))
                .route(web::post().to(profile::update)),
        )
        .route("/profile/{username}/", web::get().to(profile::profile))
        // Static pages
        .route("/pages/about/", web::get().to(pages::about))
        .route("/pages/rules/", web::get().to(pages::rules))
        // Auth routes
        .service(
            web::scope("/auth")
                .route("/register/", web::post().to(auth::register))
                .route("/login/", web::post().to(auth::login))
                .route("/logout/", web::post().to(auth::logout))
                .route("/password_change/", web::post().to(auth::password_change))
                .route("/me/", web::get().to(auth::me)),
        )
        // Staff console
        .service(
            web::scope("/admin")
                .service(
                    web::resource("/categories/")
                        .route(web::get().to(admin::list_categories))
                        .route(web::post().to(admin::create_category)),
                )
                .service(
                    web::resource("/categories/{id}/")
                        .route(web::put().to(admin::update_category))
                        .route(web::delete().to(admin::delete_category)),
                )
                .service(
                    web::resource("/locations/")
                        .route(web::get().to(admin::list_locations))
                        .route(web::post().to(admin::create_location)),
                )
                .service(
                    web::resource("/locations/{id}/")
                        .route(web::put().to(admin::update_location))
                        .route(web::delete().to(admin::delete_location)),
                )
                .route("/posts/", web::get().to(admin::list_posts))
                .route("/posts/{id}/publish/", web::post().to(admin::set_post_published)),
        );
}
