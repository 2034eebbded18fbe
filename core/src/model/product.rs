// printshop_core/src/model/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{bool_or, f64_or, opt_f64, opt_str, str_or, u32_or};
use crate::store::Document;

/// Closed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
  Poster,
  Polaroid,
  Bundle,
  Customizable,
  SplitPoster,
}

impl Category {
  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Poster => "poster",
      Category::Polaroid => "polaroid",
      Category::Bundle => "bundle",
      Category::Customizable => "customizable",
      Category::SplitPoster => "split_poster",
    }
  }

  pub fn parse(raw: &str) -> Option<Category> {
    match raw {
      "poster" => Some(Category::Poster),
      "polaroid" => Some(Category::Polaroid),
      "bundle" => Some(Category::Bundle),
      "customizable" => Some(Category::Customizable),
      "split_poster" => Some(Category::SplitPoster),
      _ => None,
    }
  }
}

/// One row of a multi-size product's price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizePrice {
  pub size: String,
  pub price: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub original_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  pub description: String,
  /// Unit price. Advisory only when `is_multi_size` is set; the real prices
  /// then live in `size_prices`.
  pub price: f64,
  pub original_price: Option<f64>,
  pub is_multi_size: bool,
  pub size_prices: Vec<SizePrice>,
  pub category: Category,
  pub subcategory: Option<String>,
  pub size: Option<String>,
  pub theme: Option<String>,
  pub in_stock: bool,
  pub featured: bool,
  pub hidden: bool,
  pub ratings: f64,
  pub review_count: u32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Normalizes a raw document into a `Product`, substituting safe defaults
  /// for every missing or mistyped field. An unknown category string falls
  /// back to `Poster`.
  pub fn from_document(doc: &Document) -> Product {
    let data = &doc.data;
    let category = data
      .get("category")
      .and_then(Value::as_str)
      .and_then(Category::parse)
      .unwrap_or(Category::Poster);

    let size_prices: Vec<SizePrice> = data
      .get("sizePrices")
      .cloned()
      .and_then(|v| serde_json::from_value(v).ok())
      .unwrap_or_default();

    Product {
      id: doc.id.clone(),
      name: str_or(data, "name", "Untitled"),
      description: str_or(data, "description", ""),
      price: f64_or(data, "price", 0.0),
      original_price: opt_f64(data, "originalPrice"),
      is_multi_size: bool_or(data, "isMultiSize", false) && !size_prices.is_empty(),
      size_prices,
      category,
      subcategory: opt_str(data, "subcategory"),
      size: opt_str(data, "size"),
      theme: opt_str(data, "theme"),
      in_stock: bool_or(data, "inStock", true),
      featured: bool_or(data, "featured", false),
      hidden: bool_or(data, "hidden", false),
      ratings: f64_or(data, "ratings", 0.0),
      review_count: u32_or(data, "reviewCount", 0),
      created_at: doc.created_at,
      updated_at: doc.updated_at,
    }
  }

  /// True when the product matches a case-insensitive substring search over
  /// its textual fields.
  pub fn matches_search(&self, needle_lower: &str) -> bool {
    let hay = |s: &str| s.to_lowercase().contains(needle_lower);
    hay(&self.name)
      || hay(&self.description)
      || hay(self.category.as_str())
      || self.subcategory.as_deref().is_some_and(hay)
      || self.theme.as_deref().is_some_and(hay)
  }
}

/// Writable product fields, serialized straight into the document payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub price: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub original_price: Option<f64>,
  #[serde(default)]
  pub is_multi_size: bool,
  #[serde(default)]
  pub size_prices: Vec<SizePrice>,
  pub category: Category,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub subcategory: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub size: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub theme: Option<String>,
  #[serde(default = "default_true")]
  pub in_stock: bool,
  #[serde(default)]
  pub featured: bool,
  #[serde(default)]
  pub hidden: bool,
}

impl Default for ProductInput {
  fn default() -> Self {
    ProductInput {
      name: String::new(),
      description: String::new(),
      price: 0.0,
      original_price: None,
      is_multi_size: false,
      size_prices: Vec::new(),
      category: Category::Poster,
      subcategory: None,
      size: None,
      theme: None,
      in_stock: true,
      featured: false,
      hidden: false,
    }
  }
}

fn default_true() -> bool {
  true
}
