//! Localized views
//!
//! Templates never see bilingual records; they get a view with the text
//! already resolved for the request locale.

use serde::Serialize;

use super::locale::{pick, pick_list, pick_opt, Locale};
use super::types::{Brand, Category, Dish, DishCategory, Id, Product, Recipe};

/// Resolve a bilingual record into a single-language view
pub trait Localize {
    type View: Serialize;

    fn localize(&self, locale: Locale) -> Self::View;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BrandView {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub logo: Option<String>,
    pub banner: Option<String>,
    pub video: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryView {
    pub id: Id,
    pub brand_id: Id,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductView {
    pub id: Id,
    pub brand_id: Id,
    pub category_id: Option<Id>,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub weight: Option<String>,
    pub ingredients: Option<String>,
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DishCategoryView {
    pub id: Id,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DishView {
    pub id: Id,
    pub dish_category_id: Option<Id>,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecipeView {
    pub id: Id,
    pub dish_id: Id,
    pub product_id: Option<Id>,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    pub prep_minutes: Option<u32>,
    pub servings: Option<u32>,
}

impl Localize for Brand {
    type View = BrandView;

    fn localize(&self, locale: Locale) -> BrandView {
        BrandView {
            id: self.id,
            name: pick(locale, &self.name_ar, &self.name_en).to_string(),
            description: pick(locale, &self.description_ar, &self.description_en).to_string(),
            logo: self.logo.clone(),
            banner: self.banner.clone(),
            video: self.video.clone(),
        }
    }
}

impl Localize for Category {
    type View = CategoryView;

    fn localize(&self, locale: Locale) -> CategoryView {
        CategoryView {
            id: self.id,
            brand_id: self.brand_id,
            name: pick(locale, &self.name_ar, &self.name_en).to_string(),
            description: pick(locale, &self.description_ar, &self.description_en).to_string(),
            image: self.image.clone(),
        }
    }
}

impl Localize for Product {
    type View = ProductView;

    fn localize(&self, locale: Locale) -> ProductView {
        ProductView {
            id: self.id,
            brand_id: self.brand_id,
            category_id: self.category_id,
            name: pick(locale, &self.name_ar, &self.name_en).to_string(),
            description: pick(locale, &self.description_ar, &self.description_en).to_string(),
            image: self.image.clone(),
            weight: self.weight.clone(),
            ingredients: pick_opt(locale, &self.ingredients_ar, &self.ingredients_en),
            featured: self.featured,
        }
    }
}

impl Localize for DishCategory {
    type View = DishCategoryView;

    fn localize(&self, locale: Locale) -> DishCategoryView {
        DishCategoryView {
            id: self.id,
            name: pick(locale, &self.name_ar, &self.name_en).to_string(),
            image: self.image.clone(),
        }
    }
}

impl Localize for Dish {
    type View = DishView;

    fn localize(&self, locale: Locale) -> DishView {
        DishView {
            id: self.id,
            dish_category_id: self.dish_category_id,
            name: pick(locale, &self.name_ar, &self.name_en).to_string(),
            description: pick(locale, &self.description_ar, &self.description_en).to_string(),
            image: self.image.clone(),
        }
    }
}

impl Localize for Recipe {
    type View = RecipeView;

    fn localize(&self, locale: Locale) -> RecipeView {
        RecipeView {
            id: self.id,
            dish_id: self.dish_id,
            product_id: self.product_id,
            title: pick(locale, &self.title_ar, &self.title_en).to_string(),
            description: pick(locale, &self.description_ar, &self.description_en).to_string(),
            ingredients: pick_list(locale, &self.ingredients_ar, &self.ingredients_en),
            steps: pick_list(locale, &self.steps_ar, &self.steps_en),
            image: self.image.clone(),
            video: self.video.clone(),
            prep_minutes: self.prep_minutes,
            servings: self.servings,
        }
    }
}

/// Localize every record in a slice
pub fn localize_all<T: Localize>(items: &[T], locale: Locale) -> Vec<T::View> {
    items.iter().map(|item| item.localize(locale)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: 7,
            brand_id: 1,
            category_id: Some(2),
            name_ar: "دبس التمر".into(),
            name_en: "Date Syrup".into(),
            description_ar: "".into(),
            description_en: "Pure date syrup".into(),
            image: None,
            weight: Some("400 g".into()),
            ingredients_ar: None,
            ingredients_en: Some("Dates".into()),
            featured: true,
        }
    }

    #[test]
    fn test_product_localize_arabic_with_fallback() {
        let view = product().localize(Locale::Ar);
        assert_eq!(view.name, "دبس التمر");
        assert_eq!(view.description, "Pure date syrup");
        assert_eq!(view.ingredients.as_deref(), Some("Dates"));
    }

    #[test]
    fn test_localize_all() {
        let views = localize_all(&[product(), product()], Locale::En);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].name, "Date Syrup");
    }
}
