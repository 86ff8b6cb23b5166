//! Conversions between domain values and wire documents.

use blogicum_core::domain::{Category, Location, User};
use blogicum_core::forms::{CommentForm, PostForm, ProfileForm};
use blogicum_core::pagination::Page;
use blogicum_core::services::{CommentView, PostDetail, PostSummary};
use blogicum_shared::dto::{
    CategoryRef, CategoryResponse, CommentRequest, CommentResponse, LocationResponse,
    PageResponse, PostDetailResponse, PostRequest, PostResponse, ProfileRequest, UserResponse,
};

pub fn page<T, U>(page: Page<T>, item: impl FnMut(T) -> U) -> PageResponse<U> {
    let (total_pages, has_next, has_previous) =
        (page.total_pages(), page.has_next(), page.has_previous());
    let page = page.map(item);
    PageResponse {
        items: page.items,
        page: page.number,
        per_page: page.per_page,
        total: page.total,
        total_pages,
        has_next,
        has_previous,
    }
}

pub fn post(summary: PostSummary) -> PostResponse {
    let PostSummary {
        post,
        author,
        category,
        location,
        comment_count,
    } = summary;
    PostResponse {
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        image: post.image,
        is_published: post.publication.is_published,
        created_at: post.publication.created_at,
        author,
        category: category.map(|c| CategoryRef {
            slug: c.slug,
            title: c.title,
        }),
        location: location.map(|l| l.name),
        comment_count,
    }
}

pub fn post_detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.summary),
        comments: detail.comments.into_iter().map(comment).collect(),
    }
}

pub fn comment(view: CommentView) -> CommentResponse {
    CommentResponse {
        id: view.comment.id,
        post_id: view.comment.post_id,
        text: view.comment.text,
        created_at: view.comment.created_at,
        author: view.author,
    }
}

/// `with_email` only for the account owner.
pub fn user(user: &User, with_email: bool) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        full_name: user.display_name(),
        email: with_email.then(|| user.email.clone()),
        date_joined: user.date_joined,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
        is_published: category.publication.is_published,
        created_at: category.publication.created_at,
    }
}

pub fn location(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
        is_published: location.publication.is_published,
        created_at: location.publication.created_at,
    }
}

pub fn post_form(req: PostRequest) -> PostForm {
    PostForm {
        title: req.title,
        text: req.text,
        pub_date: req.pub_date,
        image: req.image,
        location_id: req.location_id,
        category_id: req.category_id,
    }
}

pub fn comment_form(req: CommentRequest) -> CommentForm {
    CommentForm { text: req.text }
}

pub fn profile_form(req: ProfileRequest) -> ProfileForm {
    ProfileForm {
        username: req.username,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
    }
}
