use actix_web::HttpResponse;

use blogicum_shared::dto::StaticPageResponse;

const ABOUT: &str = "Blogicum is a place to keep a travel and everyday diary: \
write posts, schedule them for later, file them under categories and places, \
and discuss them with other readers.";

const RULES: &str = "Be polite to other authors. Publish only what you have the \
right to publish. Posts that break these rules are hidden by the moderators.";

fn page(title: &str, body: &str) -> HttpResponse {
    HttpResponse::Ok().json(StaticPageResponse {
        title: title.to_string(),
        body: body.to_string(),
    })
}

/// GET /pages/about/
pub async fn about() -> HttpResponse {
    page("About the project", ABOUT)
}

/// GET /pages/rules/
pub async fn rules() -> HttpResponse {
    page("Rules", RULES)
}
