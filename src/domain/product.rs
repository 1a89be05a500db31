use serde::{Deserialize, Serialize};

pub type ProductId = u64;

/// Represents a product served by the remote catalog.
///
/// Field names follow the catalog's camelCase JSON; fields the catalog may
/// omit fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Creates a product with the given identity and price; everything else
    /// starts empty.
    pub fn new(id: ProductId, title: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            price,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 0,
            brand: String::new(),
            category: String::new(),
            thumbnail: String::new(),
            images: Vec::new(),
        }
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_discount(mut self, discount_percentage: f64) -> Self {
        self.discount_percentage = discount_percentage;
        self
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Price before the catalog discount was applied.
    ///
    /// Returns `price` unchanged when there is no discount, or when the
    /// discount is 100% and the original price cannot be recovered.
    pub fn list_price(&self) -> f64 {
        if self.discount_percentage <= 0.0 || self.discount_percentage >= 100.0 {
            return self.price;
        }
        self.price / (1.0 - self.discount_percentage / 100.0)
    }
}

/// One page of a catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub limit: u32,
}

/// A catalog category.
///
/// The catalog has served both bare slugs and `{slug, name, url}` objects;
/// either form deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CategoryRepr")]
pub struct Category {
    pub slug: String,
    pub name: String,
    pub url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRepr {
    Slug(String),
    Full {
        slug: String,
        name: String,
        #[serde(default)]
        url: String,
    },
}

impl From<CategoryRepr> for Category {
    fn from(repr: CategoryRepr) -> Self {
        match repr {
            CategoryRepr::Slug(slug) => Self {
                name: slug.clone(),
                slug,
                url: String::new(),
            },
            CategoryRepr::Full { slug, name, url } => Self { slug, name, url },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_catalog_json() {
        let json = r#"{
            "id": 1,
            "title": "Essence Mascara Lash Princess",
            "description": "A popular mascara.",
            "category": "beauty",
            "price": 9.99,
            "discountPercentage": 7.17,
            "rating": 4.94,
            "stock": 5,
            "tags": ["beauty", "mascara"],
            "brand": "Essence",
            "thumbnail": "https://cdn.dummyjson.com/thumb.png",
            "images": ["https://cdn.dummyjson.com/1.png"]
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.brand, "Essence");
        assert_eq!(product.discount_percentage, 7.17);
        assert_eq!(product.images.len(), 1);
        assert!(product.is_in_stock());
    }

    #[test]
    fn test_product_missing_optional_fields() {
        let json = r#"{"id": 16, "title": "Apple", "price": 1.99, "stock": 0}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.brand, "");
        assert!(product.images.is_empty());
        assert!(!product.is_in_stock());
    }

    #[test]
    fn test_list_price() {
        let product = Product::new(1, "Mascara", 75.0).with_discount(25.0);
        assert_eq!(product.list_price(), 100.0);

        let full = Product::new(2, "Free", 0.0).with_discount(100.0);
        assert_eq!(full.list_price(), 0.0);

        let plain = Product::new(3, "Plain", 12.5);
        assert_eq!(plain.list_price(), 12.5);
    }

    #[test]
    fn test_category_accepts_both_forms() {
        let categories: Vec<Category> = serde_json::from_str(
            r#"["beauty", {"slug": "home-decoration", "name": "Home Decoration", "url": "https://dummyjson.com/products/category/home-decoration"}]"#,
        )
        .unwrap();

        assert_eq!(categories[0].slug, "beauty");
        assert_eq!(categories[0].name, "beauty");
        assert_eq!(categories[1].name, "Home Decoration");
    }
}
