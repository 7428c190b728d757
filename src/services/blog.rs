//! Blog services - Articoli, categorie, commenti e risposte

use crate::core::response::message;
use crate::core::slug::slug_or_from;
use crate::core::{ApiCreated, ApiResponse, ApiResult, AppError, AppState, Path, Query, ValidatedJson};
use crate::dtos::{
    BlogCategoryDTO, BlogDTO, BlogListQuery, CommentListQuery, CommentThreadDTO, CreateBlogDTO,
    CreateCommentDTO, NewBlog, PageQuery, UpdateBlogDTO,
};
use crate::entities::{BlogCategory, Comment, Reply, User};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::State,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// ************************* CATEGORIE ************************* //

#[instrument(skip(state))]
pub async fn list_all_categories(State(state): State<Arc<AppState>>) -> ApiResult<Vec<BlogCategory>> {
    Ok(ApiResponse::ok(state.blog_category.list_all().await?))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<BlogCategory>> {
    let page = state
        .blog_category
        .list(query.search.as_deref(), query.page_params())
        .await?;
    Ok(ApiResponse::paginated(page))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<i32>,
) -> ApiResult<BlogCategory> {
    let category = state
        .blog_category
        .read(&category_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog category not found"))?;
    Ok(ApiResponse::ok(category))
}

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<BlogCategoryDTO>,
) -> ApiCreated<BlogCategory> {
    if slug_or_from(body.slug.as_deref(), &body.name).is_empty() {
        return Err(AppError::bad_request("Unable to derive a slug from the name"));
    }
    Ok(ApiResponse::created(state.blog_category.create(&body).await?))
}

#[instrument(skip(state, body))]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<BlogCategoryDTO>,
) -> ApiResult<BlogCategory> {
    if state.blog_category.read(&category_id).await?.is_none() {
        return Err(AppError::not_found("Blog category not found"));
    }
    Ok(ApiResponse::ok(state.blog_category.update(&category_id, &body).await?))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.blog_category.delete(&category_id).await? {
        return Err(AppError::not_found("Blog category not found"));
    }
    Ok(message("Blog category deleted"))
}

// ************************* ARTICOLI ************************* //

/// Lista pubblica: solo articoli pubblicati, filtro per slug di categoria e ricerca
#[instrument(skip(state))]
pub async fn list_published_blogs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlogListQuery>,
) -> ApiResult<Vec<BlogDTO>> {
    let page = state.blog.list(&query, true).await?;
    let storage = state.storage.as_ref();
    Ok(ApiResponse::paginated(page.map(|b| BlogDTO::from_blog(b, storage))))
}

#[instrument(skip(state))]
pub async fn list_blogs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlogListQuery>,
) -> ApiResult<Vec<BlogDTO>> {
    let page = state.blog.list(&query, false).await?;
    let storage = state.storage.as_ref();
    Ok(ApiResponse::paginated(page.map(|b| BlogDTO::from_blog(b, storage))))
}

#[instrument(skip(state))]
pub async fn get_blog_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<BlogDTO> {
    let blog = state
        .blog
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;
    Ok(ApiResponse::ok(BlogDTO::from_blog(blog, state.storage.as_ref())))
}

#[instrument(skip(state))]
pub async fn get_blog(
    State(state): State<Arc<AppState>>,
    Path(blog_id): Path<i32>,
) -> ApiResult<BlogDTO> {
    let blog = state
        .blog
        .read(&blog_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;
    Ok(ApiResponse::ok(BlogDTO::from_blog(blog, state.storage.as_ref())))
}

#[instrument(skip(state, current_user, body), fields(author_id = %current_user.id))]
pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    ValidatedJson(body): ValidatedJson<CreateBlogDTO>,
) -> ApiCreated<BlogDTO> {
    let slug = slug_or_from(body.slug.as_deref(), &body.title);
    if slug.is_empty() {
        return Err(AppError::bad_request("Unable to derive a slug from the title"));
    }
    if state.blog.slug_taken(&slug, None).await? {
        return Err(AppError::bad_request("Slug already in use"));
    }

    let blog = state
        .blog
        .create(&NewBlog {
            title: body.title,
            slug,
            category_id: body.category_id,
            author_id: Some(current_user.id),
            excerpt: body.excerpt,
            content: body.content,
            image_key: body.image_key,
            is_published: body.is_published,
        })
        .await?;

    info!(blog_id = blog.id, "Blog created");
    Ok(ApiResponse::created(BlogDTO::from_blog(blog, state.storage.as_ref())))
}

#[instrument(skip(state, body))]
pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    Path(blog_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateBlogDTO>,
) -> ApiResult<BlogDTO> {
    let current = state
        .blog
        .read(&blog_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;
    if let Some(slug) = &body.slug {
        if state.blog.slug_taken(slug, Some(blog_id)).await? {
            return Err(AppError::bad_request("Slug already in use"));
        }
    }

    let blog = state.blog.update(&blog_id, &body).await?;

    // l'immagine sostituita non è più referenziata
    if let (Some(old), Some(new)) = (&current.image_key, &body.image_key) {
        if old != new {
            if let Err(e) = state.storage.delete(old).await {
                warn!("Failed to delete replaced blog image {}: {}", old, e);
            }
        }
    }

    Ok(ApiResponse::ok(BlogDTO::from_blog(blog, state.storage.as_ref())))
}

#[instrument(skip(state))]
pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    Path(blog_id): Path<i32>,
) -> ApiResult<Option<()>> {
    // 1. Leggere l'articolo per conoscere la chiave dell'immagine
    // 2. Aprire la transazione e cancellare la riga
    // 3. Cancellare l'immagine dallo storage
    // 4. Se lo storage fallisce rollback: la riga resta e si risponde 500
    // 5. Commit
    let blog = state
        .blog
        .read(&blog_id)
        .await?
        .ok_or_else(|| AppError::not_found("Blog not found"))?;

    let mut tx = state.pool.begin().await?;
    if !state.blog.delete_tx(&mut *tx, blog_id).await? {
        return Err(AppError::not_found("Blog not found"));
    }

    if let Some(key) = &blog.image_key {
        debug!(%key, "Deleting blog image");
        if let Err(e) = state.storage.delete(key).await {
            error!("Image delete failed, blog {} kept: {}", blog_id, e);
            tx.rollback().await?;
            return Err(e.into());
        }
    }

    tx.commit().await?;
    info!("Blog deleted");
    Ok(message("Blog deleted"))
}

// ************************* COMMENTI ************************* //

fn group_replies(comments: Vec<Comment>, replies: Vec<Reply>) -> Vec<CommentThreadDTO> {
    let mut by_comment: HashMap<i32, Vec<Reply>> = HashMap::new();
    for reply in replies {
        by_comment.entry(reply.comment_id).or_default().push(reply);
    }
    comments
        .into_iter()
        .map(|comment| CommentThreadDTO {
            replies: by_comment.remove(&comment.id).unwrap_or_default(),
            comment,
        })
        .collect()
}

#[instrument(skip(state))]
pub async fn list_blog_comments(
    State(state): State<Arc<AppState>>,
    Path(blog_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<CommentThreadDTO>> {
    if !state.blog.is_published(blog_id).await? {
        return Err(AppError::not_found("Blog not found"));
    }
    let page = state.comment.list_for_blog(blog_id, query.page_params()).await?;
    let ids: Vec<i32> = page.items.iter().map(|c| c.id).collect();
    let replies = state.comment.replies_for(&ids).await?;

    let threads = group_replies(page.items, replies);
    Ok(ApiResponse::paginated(crate::core::Page {
        items: threads,
        pagination: page.pagination,
    }))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(blog_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<CreateCommentDTO>,
) -> ApiCreated<Comment> {
    if !state.blog.is_published(blog_id).await? {
        return Err(AppError::not_found("Blog not found"));
    }
    let comment = state
        .comment
        .create(blog_id, current_user.id, body.content.trim())
        .await?;
    info!(comment_id = comment.id, "Comment created");
    Ok(ApiResponse::created(comment))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(comment_id): Path<i32>,
    ValidatedJson(body): ValidatedJson<CreateCommentDTO>,
) -> ApiCreated<Reply> {
    if state.comment.read(&comment_id).await?.is_none() {
        return Err(AppError::not_found("Comment not found"));
    }
    let reply = state
        .comment
        .create_reply(comment_id, current_user.id, body.content.trim())
        .await?;
    Ok(ApiResponse::created(reply))
}

#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CommentListQuery>,
) -> ApiResult<Vec<Comment>> {
    Ok(ApiResponse::paginated(state.comment.list(&query).await?))
}

#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<i32>,
) -> ApiResult<Option<()>> {
    if !state.comment.delete(&comment_id).await? {
        return Err(AppError::not_found("Comment not found"));
    }
    Ok(message("Comment deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn comment(id: i32) -> Comment {
        Comment {
            id,
            blog_id: 1,
            user_id: 2,
            user_name: "Lena".to_string(),
            content: format!("comment {}", id),
            created_at: Utc::now(),
        }
    }

    fn reply(id: i32, comment_id: i32) -> Reply {
        Reply {
            id,
            comment_id,
            user_id: 3,
            user_name: "Ravi".to_string(),
            content: format!("reply {}", id),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_group_replies_keeps_comment_order() {
        let threads = group_replies(
            vec![comment(5), comment(4)],
            vec![reply(1, 4), reply(2, 5), reply(3, 4)],
        );
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0].comment.id, 5);
        assert_eq!(threads[0].replies.len(), 1);
        assert_eq!(
            threads[1].replies.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }
}
