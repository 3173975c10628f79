//! Product listing and detail endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::instrument;

use dynasty_core::ProductId;

use crate::catalog::filters::{self, ListingQuery, ProductFilter};
use crate::catalog::{Category, Product};
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
}

/// A product as the client sees it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Rupees.
    pub price: i64,
    pub display_price: String,
    pub category: &'static str,
    pub image: String,
    pub images: Vec<String>,
    pub sku: String,
    pub color: Option<&'static str>,
    pub pattern: Option<&'static str>,
    pub material: Option<&'static str>,
    pub is_new: bool,
}

impl ProductView {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.as_u32(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.rupees(),
            display_price: product.price.display(),
            category: product.category.slug(),
            image: product.image(),
            images: product.images(),
            sku: product.sku(),
            color: product.color,
            pattern: product.pattern,
            material: product.material,
            is_new: product.is_new,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub products: Vec<ProductView>,
    /// `(color, count)` pairs for the filter sidebar, over the unfiltered
    /// category.
    pub colors: Vec<(String, usize)>,
    pub total: usize,
}

#[instrument(skip(state))]
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingResponse>, AppError> {
    let catalog = state.catalog();

    let scope: Vec<&Product> = match query.category.as_deref() {
        Some(raw) => {
            let category: Category = raw
                .parse()
                .map_err(|_| AppError::NotFound(format!("Unknown category: {raw}")))?;
            catalog.by_category(category)
        }
        None => catalog.all().iter().collect(),
    };

    let colors = filters::color_counts(&scope);
    let filter = ProductFilter::from_query(&query);
    let products: Vec<ProductView> = filters::apply(&scope, &filter)
        .into_iter()
        .map(ProductView::from_product)
        .collect();

    Ok(Json(ListingResponse {
        total: products.len(),
        products,
        colors,
    }))
}

#[instrument(skip(state))]
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<ProductView>, AppError> {
    state
        .catalog()
        .find(ProductId::new(id))
        .map(|product| Json(ProductView::from_product(product)))
        .ok_or_else(|| AppError::NotFound(format!("No product with id {id}")))
}
