//! Category catalog service
//!
//! The category table backs the marketplace dropdowns and the free-text
//! category resolution done by the listing write path.

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;

/// Category service for reading the catalog
#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
}

/// A marketplace category with bilingual display names
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub slug: String,
    pub name_en: String,
    pub name_sq: String,
    pub sort_order: i32,
}

impl CategoryService {
    /// Create a new CategoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All categories in catalog order
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, slug, name_en, name_sq, sort_order
            FROM categories
            ORDER BY sort_order, slug
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }
}
