//! Blog DTOs - Data Transfer Objects per articoli, categorie e commenti

use crate::core::PageParams;
use crate::core::slug::SLUG_RE;
use crate::entities::{Blog, Comment, Reply};
use crate::external::ObjectStorage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Articolo come visto dal client: la chiave dell'immagine diventa un URL pubblico
#[derive(Serialize, Debug)]
pub struct BlogDTO {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub author_id: Option<i32>,
    pub author_name: Option<String>,
    pub image_key: Option<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl BlogDTO {
    pub fn from_blog(blog: Blog, storage: &dyn ObjectStorage) -> Self {
        let image_url = blog.image_key.as_deref().map(|key| storage.public_url(key));
        Self {
            id: blog.id,
            title: blog.title,
            slug: blog.slug,
            excerpt: blog.excerpt,
            content: blog.content,
            category_id: blog.category_id,
            category_name: blog.category_name,
            category_slug: blog.category_slug,
            author_id: blog.author_id,
            author_name: blog.author_name,
            image_key: blog.image_key,
            image_url,
            is_published: blog.is_published,
            created_at: blog.created_at,
        }
    }
}

#[derive(Deserialize, Debug, Validate)]
pub struct CreateBlogDTO {
    #[validate(length(min = 3, max = 255, message = "Title must be between 3 and 255 characters"))]
    pub title: String,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
    pub category_id: Option<i32>,
    #[validate(length(max = 500))]
    pub excerpt: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(length(max = 255))]
    pub image_key: Option<String>,
    #[serde(default = "default_published")]
    pub is_published: bool,
}

fn default_published() -> bool {
    true
}

/// Dati completi per l'INSERT, con slug e autore già risolti
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub slug: String,
    pub category_id: Option<i32>,
    pub author_id: Option<i32>,
    pub excerpt: Option<String>,
    pub content: String,
    pub image_key: Option<String>,
    pub is_published: bool,
}

#[derive(Deserialize, Debug, Default, Validate)]
pub struct UpdateBlogDTO {
    #[validate(length(min = 3, max = 255, message = "Title must be between 3 and 255 characters"))]
    pub title: Option<String>,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
    pub category_id: Option<i32>,
    #[validate(length(max = 500))]
    pub excerpt: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: Option<String>,
    #[validate(length(max = 255))]
    pub image_key: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
pub struct BlogListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    /// slug della categoria
    pub category: Option<String>,
    pub category_id: Option<i32>,
}

impl BlogListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

#[derive(Deserialize, Debug, Validate)]
pub struct BlogCategoryDTO {
    #[validate(length(min = 2, max = 120, message = "Name must be between 2 and 120 characters"))]
    pub name: String,
    #[validate(regex(path = *SLUG_RE, message = "Slug may only contain lowercase letters, digits and dashes"))]
    pub slug: Option<String>,
}

/// Usato per commenti e risposte
#[derive(Deserialize, Debug, Validate)]
pub struct CreateCommentDTO {
    #[validate(length(min = 1, max = 2000, message = "Comment must be between 1 and 2000 characters"))]
    pub content: String,
}

/// Commento con le sue risposte
#[derive(Serialize, Debug)]
pub struct CommentThreadDTO {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<Reply>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CommentListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub blog_id: Option<i32>,
}

impl CommentListQuery {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}
