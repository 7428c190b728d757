//! Blog repositories - Articoli, categorie, commenti e risposte

use super::{Create, Delete, Read, Update};
use crate::core::slug::slug_or_from;
use crate::core::{ListQuery, Page, PageParams, SqlFilter, UpdateBuilder};
use crate::dtos::{BlogCategoryDTO, BlogListQuery, CommentListQuery, NewBlog, UpdateBlogDTO};
use crate::entities::{Blog, BlogCategory, Comment, Reply};
use sqlx::{Error, MySql, MySqlConnection, MySqlPool, QueryBuilder};
use tracing::{debug, instrument};

const BLOG_SELECT: &str = "SELECT b.id, b.category_id, bc.name AS category_name, bc.slug AS category_slug, \
     b.author_id, us.name AS author_name, b.title, b.slug, b.excerpt, b.content, b.image_key, \
     b.is_published, b.created_at \
     FROM blogs b \
     LEFT JOIN blog_category bc ON bc.id = b.category_id \
     LEFT JOIN users us ON us.id = b.author_id";
const BLOG_COUNT: &str =
    "SELECT COUNT(*) FROM blogs b LEFT JOIN blog_category bc ON bc.id = b.category_id";
const BLOG_ORDER: &str = "b.created_at DESC, b.id DESC";

// ************************* BLOGS ************************* //

pub struct BlogRepository {
    connection_pool: MySqlPool,
}

impl BlogRepository {
    pub fn new(connection_pool: MySqlPool) -> BlogRepository {
        Self { connection_pool }
    }

    /// Lista paginata; il sito pubblico vede solo gli articoli pubblicati
    #[instrument(skip(self))]
    pub async fn list(&self, query: &BlogListQuery, published_only: bool) -> Result<Page<Blog>, Error> {
        let mut filter = SqlFilter::new()
            .eq_text("bc.slug", query.category.as_deref())
            .eq_opt("b.category_id", query.category_id)
            .search(&["b.title", "b.excerpt"], query.search.as_deref());
        if published_only {
            filter = filter.raw("b.is_published = TRUE");
        }
        ListQuery::new(BLOG_SELECT, BLOG_COUNT)
            .filter(filter)
            .order_by(BLOG_ORDER)
            .fetch_page(&self.connection_pool, query.page_params())
            .await
    }

    pub async fn search_top(&self, term: &str, limit: u32) -> Result<Vec<Blog>, Error> {
        ListQuery::new(BLOG_SELECT, BLOG_COUNT)
            .filter(
                SqlFilter::new()
                    .raw("b.is_published = TRUE")
                    .search(&["b.title", "b.excerpt"], Some(term)),
            )
            .order_by(BLOG_ORDER)
            .fetch_top(&self.connection_pool, limit)
            .await
    }

    pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Blog>, Error> {
        sqlx::query_as::<_, Blog>(&format!(
            "{} WHERE b.slug = ? AND b.is_published = TRUE",
            BLOG_SELECT
        ))
        .bind(slug)
        .fetch_optional(&self.connection_pool)
        .await
    }

    pub async fn is_published(&self, id: i32) -> Result<bool, Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM blogs WHERE id = ? AND is_published = TRUE")
                .bind(id)
                .fetch_one(&self.connection_pool)
                .await?;
        Ok(count > 0)
    }

    pub async fn slug_taken(&self, slug: &str, exclude_id: Option<i32>) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM blogs WHERE slug = ? AND id <> ?")
            .bind(slug)
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(&self.connection_pool)
            .await?;
        Ok(count > 0)
    }

    /// DELETE dentro la transazione del service, che poi cancella l'immagine
    #[instrument(skip(self, conn))]
    pub async fn delete_tx(&self, conn: &mut MySqlConnection, id: i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        debug!("Blog delete touched {} rows", result.rows_affected());
        Ok(result.rows_affected() > 0)
    }
}

impl Create<Blog, NewBlog> for BlogRepository {
    #[instrument(skip(self, data), fields(slug = %data.slug))]
    async fn create(&self, data: &NewBlog) -> Result<Blog, Error> {
        let result = sqlx::query(
            "INSERT INTO blogs (category_id, author_id, title, slug, excerpt, content, image_key, is_published) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(data.category_id)
        .bind(data.author_id)
        .bind(&data.title)
        .bind(&data.slug)
        .bind(&data.excerpt)
        .bind(&data.content)
        .bind(&data.image_key)
        .bind(data.is_published)
        .execute(&self.connection_pool)
        .await?;
        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Blog, i32> for BlogRepository {
    async fn read(&self, id: &i32) -> Result<Option<Blog>, Error> {
        sqlx::query_as::<_, Blog>(&format!("{} WHERE b.id = ?", BLOG_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Blog, UpdateBlogDTO, i32> for BlogRepository {
    async fn update(&self, id: &i32, data: &UpdateBlogDTO) -> Result<Blog, Error> {
        let mut update = UpdateBuilder::new("blogs");
        update
            .set("title", data.title.clone())
            .set("slug", data.slug.clone())
            .set("category_id", data.category_id)
            .set("excerpt", data.excerpt.clone())
            .set("content", data.content.clone())
            .set("image_key", data.image_key.clone())
            .set("is_published", data.is_published);
        update.execute("id", *id, &self.connection_pool).await?;
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

// ************************* CATEGORIE ************************* //

const CATEGORY_SELECT: &str = "SELECT id, name, slug, created_at FROM blog_category";

pub struct BlogCategoryRepository {
    connection_pool: MySqlPool,
}

impl BlogCategoryRepository {
    pub fn new(connection_pool: MySqlPool) -> BlogCategoryRepository {
        Self { connection_pool }
    }

    pub async fn list_all(&self) -> Result<Vec<BlogCategory>, Error> {
        sqlx::query_as::<_, BlogCategory>(&format!("{} ORDER BY name ASC", CATEGORY_SELECT))
            .fetch_all(&self.connection_pool)
            .await
    }

    pub async fn list(&self, search: Option<&str>, params: PageParams) -> Result<Page<BlogCategory>, Error> {
        ListQuery::new(CATEGORY_SELECT, "SELECT COUNT(*) FROM blog_category")
            .filter(SqlFilter::new().search(&["name"], search))
            .order_by("name ASC")
            .fetch_page(&self.connection_pool, params)
            .await
    }
}

impl Create<BlogCategory, BlogCategoryDTO> for BlogCategoryRepository {
    async fn create(&self, data: &BlogCategoryDTO) -> Result<BlogCategory, Error> {
        let result = sqlx::query("INSERT INTO blog_category (name, slug) VALUES (?, ?)")
            .bind(&data.name)
            .bind(slug_or_from(data.slug.as_deref(), &data.name))
            .execute(&self.connection_pool)
            .await?;
        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<BlogCategory, i32> for BlogCategoryRepository {
    async fn read(&self, id: &i32) -> Result<Option<BlogCategory>, Error> {
        sqlx::query_as::<_, BlogCategory>(&format!("{} WHERE id = ?", CATEGORY_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<BlogCategory, BlogCategoryDTO, i32> for BlogCategoryRepository {
    async fn update(&self, id: &i32, data: &BlogCategoryDTO) -> Result<BlogCategory, Error> {
        sqlx::query("UPDATE blog_category SET name = ?, slug = ? WHERE id = ?")
            .bind(&data.name)
            .bind(slug_or_from(data.slug.as_deref(), &data.name))
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i32> for BlogCategoryRepository {
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM blog_category WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ************************* COMMENTI ************************* //

const COMMENT_SELECT: &str = "SELECT cm.id, cm.blog_id, cm.user_id, us.name AS user_name, cm.content, cm.created_at \
     FROM comment cm JOIN users us ON us.id = cm.user_id";
const COMMENT_COUNT: &str = "SELECT COUNT(*) FROM comment cm";
const REPLY_SELECT: &str = "SELECT r.id, r.comment_id, r.user_id, us.name AS user_name, r.content, r.created_at \
     FROM replies r JOIN users us ON us.id = r.user_id";

pub struct CommentRepository {
    connection_pool: MySqlPool,
}

impl CommentRepository {
    pub fn new(connection_pool: MySqlPool) -> CommentRepository {
        Self { connection_pool }
    }

    pub async fn list_for_blog(&self, blog_id: i32, params: PageParams) -> Result<Page<Comment>, Error> {
        ListQuery::new(COMMENT_SELECT, COMMENT_COUNT)
            .filter(SqlFilter::new().eq("cm.blog_id", blog_id))
            .order_by("cm.created_at DESC, cm.id DESC")
            .fetch_page(&self.connection_pool, params)
            .await
    }

    /// Lista di moderazione
    pub async fn list(&self, query: &CommentListQuery) -> Result<Page<Comment>, Error> {
        let filter = SqlFilter::new()
            .eq_opt("cm.blog_id", query.blog_id)
            .search(&["cm.content"], query.search.as_deref());
        ListQuery::new(COMMENT_SELECT, COMMENT_COUNT)
            .filter(filter)
            .order_by("cm.created_at DESC, cm.id DESC")
            .fetch_page(&self.connection_pool, query.page_params())
            .await
    }

    /// Risposte di più commenti in una sola query, in ordine cronologico
    pub async fn replies_for(&self, comment_ids: &[i32]) -> Result<Vec<Reply>, Error> {
        if comment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(REPLY_SELECT);
        qb.push(" WHERE r.comment_id IN (");
        let mut separated = qb.separated(", ");
        for id in comment_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY r.created_at ASC, r.id ASC");
        qb.build_query_as::<Reply>()
            .fetch_all(&self.connection_pool)
            .await
    }

    pub async fn create(&self, blog_id: i32, user_id: i32, content: &str) -> Result<Comment, Error> {
        let result = sqlx::query("INSERT INTO comment (blog_id, user_id, content) VALUES (?, ?, ?)")
            .bind(blog_id)
            .bind(user_id)
            .bind(content)
            .execute(&self.connection_pool)
            .await?;
        let id = result.last_insert_id() as i32;
        self.read(&id).await?.ok_or(Error::RowNotFound)
    }

    pub async fn create_reply(&self, comment_id: i32, user_id: i32, content: &str) -> Result<Reply, Error> {
        let result = sqlx::query("INSERT INTO replies (comment_id, user_id, content) VALUES (?, ?, ?)")
            .bind(comment_id)
            .bind(user_id)
            .bind(content)
            .execute(&self.connection_pool)
            .await?;
        sqlx::query_as::<_, Reply>(&format!("{} WHERE r.id = ?", REPLY_SELECT))
            .bind(result.last_insert_id() as i32)
            .fetch_one(&self.connection_pool)
            .await
    }
}

impl Read<Comment, i32> for CommentRepository {
    async fn read(&self, id: &i32) -> Result<Option<Comment>, Error> {
        sqlx::query_as::<_, Comment>(&format!("{} WHERE cm.id = ?", COMMENT_SELECT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Delete<i32> for CommentRepository {
    /// Le risposte vengono rimosse in cascata
    async fn delete(&self, id: &i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM comment WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::MySqlPool;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "blogs")))]
    async fn test_public_list_hides_drafts(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = BlogRepository::new(pool);
        let public = repo.list(&BlogListQuery::default(), true).await?;
        let all = repo.list(&BlogListQuery::default(), false).await?;

        assert!(public.items.iter().all(|b| b.is_published));
        assert_eq!(all.pagination.total_items, public.pagination.total_items + 1);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "blogs")))]
    async fn test_category_slug_filter(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = BlogRepository::new(pool);
        let page = repo
            .list(
                &BlogListQuery {
                    category: Some("visa-guides".to_string()),
                    ..Default::default()
                },
                true,
            )
            .await?;
        assert!(!page.items.is_empty());
        assert!(page.items.iter().all(|b| b.category_slug.as_deref() == Some("visa-guides")));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "blogs")))]
    async fn test_replies_are_grouped_by_comment(pool: MySqlPool) -> sqlx::Result<()> {
        let repo = CommentRepository::new(pool);
        let comments = repo.list_for_blog(1, PageParams::default()).await?;
        let ids: Vec<i32> = comments.items.iter().map(|c| c.id).collect();
        let replies = repo.replies_for(&ids).await?;

        assert!(!replies.is_empty());
        assert!(replies.iter().all(|r| ids.contains(&r.comment_id)));
        assert!(repo.replies_for(&[]).await?.is_empty());
        Ok(())
    }
}
