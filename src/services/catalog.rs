use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Expr, Func},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use super::records::valid_products;
use crate::entities::product;
use crate::errors::ServiceError;
use crate::models::Product;

/// Storefront product filters. Every present filter must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    pub category: Option<String>,
    pub material: Option<String>,
    pub model: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_weight: Option<Decimal>,
    pub max_weight: Option<Decimal>,
}

/// Filter values offered by the shop sidebar
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct CatalogFacets {
    pub categories: Vec<String>,
    pub materials: Vec<String>,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

fn contains_ignore_case(column: product::Column, term: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", term.to_lowercase()))
}

/// Read-only catalog queries
#[derive(Clone)]
pub struct ProductCatalogService {
    db: Arc<DatabaseConnection>,
}

impl ProductCatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Active products matching `filters`, newest first
    #[instrument(skip(self))]
    pub async fn list_products(&self, filters: &ProductFilters) -> Result<Vec<Product>, ServiceError> {
        let mut query = product::Entity::find().filter(product::Column::IsActive.eq(true));

        if let Some(term) = filters.search.as_deref() {
            query = query.filter(contains_ignore_case(product::Column::Name, term));
        }
        if let Some(category) = &filters.category {
            query = query.filter(product::Column::Category.eq(category.as_str()));
        }
        if let Some(material) = &filters.material {
            query = query.filter(product::Column::Material.eq(material.as_str()));
        }
        if let Some(model) = &filters.model {
            query = query.filter(product::Column::Model.eq(model.as_str()));
        }
        if let Some(min) = filters.min_price {
            query = query.filter(product::Column::Price.gte(min));
        }
        if let Some(max) = filters.max_price {
            query = query.filter(product::Column::Price.lte(max));
        }
        if let Some(min) = filters.min_weight {
            query = query.filter(product::Column::WeightGrams.gte(min));
        }
        if let Some(max) = filters.max_weight {
            query = query.filter(product::Column::WeightGrams.lte(max));
        }

        let rows = query
            .order_by_desc(product::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        debug!(count = rows.len(), "catalog query returned rows");
        Ok(valid_products(rows))
    }

    /// Distinct categories, materials and models across active products
    pub async fn facets(&self) -> Result<CatalogFacets, ServiceError> {
        let db = &*self.db;

        let categories: Vec<String> = product::Entity::find()
            .select_only()
            .column(product::Column::Category)
            .filter(product::Column::IsActive.eq(true))
            .distinct()
            .order_by_asc(product::Column::Category)
            .into_tuple()
            .all(db)
            .await?;

        let materials: Vec<String> = product::Entity::find()
            .select_only()
            .column(product::Column::Material)
            .filter(product::Column::IsActive.eq(true))
            .distinct()
            .order_by_asc(product::Column::Material)
            .into_tuple()
            .all(db)
            .await?;

        let models: Vec<Option<String>> = product::Entity::find()
            .select_only()
            .column(product::Column::Model)
            .filter(product::Column::IsActive.eq(true))
            .filter(product::Column::Model.is_not_null())
            .distinct()
            .order_by_asc(product::Column::Model)
            .into_tuple()
            .all(db)
            .await?;

        let non_empty = |values: Vec<String>| -> Vec<String> {
            values.into_iter().filter(|v| !v.trim().is_empty()).collect()
        };

        Ok(CatalogFacets {
            categories: non_empty(categories),
            materials: non_empty(materials),
            models: non_empty(models.into_iter().flatten().collect()),
        })
    }

    /// Number of active products per category, alphabetical
    pub async fn category_counts(&self) -> Result<Vec<CategoryCount>, ServiceError> {
        let rows: Vec<(String, i64)> = product::Entity::find()
            .select_only()
            .column(product::Column::Category)
            .column_as(Expr::col(product::Column::Id).count(), "count")
            .filter(product::Column::IsActive.eq(true))
            .group_by(product::Column::Category)
            .order_by_asc(product::Column::Category)
            .into_tuple()
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter(|(category, _)| !category.trim().is_empty())
            .map(|(category, count)| CategoryCount {
                category,
                count: count.max(0) as u64,
            })
            .collect())
    }

    /// Newest active products for the home page
    pub async fn featured(&self, limit: u64) -> Result<Vec<Product>, ServiceError> {
        let rows = product::Entity::find()
            .filter(product::Column::IsActive.eq(true))
            .order_by_desc(product::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await?;
        Ok(valid_products(rows))
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Product, ServiceError> {
        let row = product::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", id))?;
        Ok(Product::try_from(row)?)
    }

    /// Back-office listing: every product, optionally hiding inactive ones,
    /// searched over name, category and material.
    pub async fn admin_products(
        &self,
        search: Option<&str>,
        include_inactive: bool,
    ) -> Result<Vec<Product>, ServiceError> {
        let mut query = product::Entity::find();

        if !include_inactive {
            query = query.filter(product::Column::IsActive.eq(true));
        }
        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(contains_ignore_case(product::Column::Name, term))
                    .add(contains_ignore_case(product::Column::Category, term))
                    .add(contains_ignore_case(product::Column::Material, term)),
            );
        }

        let rows = query
            .order_by_desc(product::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        Ok(valid_products(rows))
    }
}
