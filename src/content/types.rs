//! Content records served by the content API
//!
//! All records are flat, bilingual, and reference each other by id:
//! - `Brand` owns `Category` records, which group `Product` records
//! - `Dish` records (optionally grouped by `DishCategory`) are what a `Recipe` cooks
//! - `CareerApplication`, `ContactMessage` and `ExportRequest` are write-only submissions

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the content API
pub type Id = i64;

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A record stored in a content API collection
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name, as in `/api/{collection}`
    const COLLECTION: &'static str;

    /// Record id, `None` for records not yet created
    fn id(&self) -> Option<Id>;
}

macro_rules! resource {
    ($ty:ty, $collection:literal) => {
        impl Resource for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> Option<Id> {
                Some(self.id)
            }
        }
    };
    ($ty:ty, $collection:literal, optional) => {
        impl Resource for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> Option<Id> {
                self.id
            }
        }
    };
}

/// A merchandising brand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Brand {
    #[serde(default)]
    pub id: Id,
    pub name_ar: String,
    pub name_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_ar: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_en: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
}

/// A grouping of products under a brand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(default)]
    pub id: Id,
    pub brand_id: Id,
    pub name_ar: String,
    pub name_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_ar: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_en: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A product sold under a brand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(default)]
    pub id: Id,
    pub brand_id: Id,
    #[serde(default)]
    pub category_id: Option<Id>,
    pub name_ar: String,
    pub name_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_ar: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_en: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Pack size as free text ("500 g", "1 L")
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub ingredients_ar: Option<String>,
    #[serde(default)]
    pub ingredients_en: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,
}

/// A grouping of dishes ("Breakfast", "Desserts")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DishCategory {
    #[serde(default)]
    pub id: Id,
    pub name_ar: String,
    pub name_en: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A dish that recipes prepare
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dish {
    #[serde(default)]
    pub id: Id,
    #[serde(default)]
    pub dish_category_id: Option<Id>,
    pub name_ar: String,
    pub name_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_ar: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_en: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A bilingual recipe for a dish, optionally featuring a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    #[serde(default)]
    pub id: Id,
    pub dish_id: Id,
    #[serde(default)]
    pub product_id: Option<Id>,
    pub title_ar: String,
    pub title_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_ar: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients_ar: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients_en: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps_ar: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps_en: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub prep_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
}

/// A job application submitted through the careers page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CareerApplication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub cv_url: Option<String>,
}

/// A message submitted through the contact page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContactMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub subject: String,
    pub message: String,
}

/// A wholesale/export inquiry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExportRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub company: String,
    pub contact_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub country: String,
    pub products: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub message: String,
}

resource!(Brand, "brands");
resource!(Category, "categories");
resource!(Product, "products");
resource!(DishCategory, "dish-categories");
resource!(Dish, "dishes");
resource!(Recipe, "recipes");
resource!(CareerApplication, "careers", optional);
resource!(ContactMessage, "contact", optional);
resource!(ExportRequest, "export-requests", optional);

/// The downloadable product catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
