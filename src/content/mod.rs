//! Content Model
//!
//! Bilingual records fetched from the content API, the locales they are
//! rendered in, and the single-language views handed to templates.

mod locale;
mod types;
mod view;

pub use locale::{pick, pick_list, pick_opt, Locale, UnknownLocale};
pub use types::{
    Brand, CareerApplication, CatalogFile, Category, ContactMessage, Dish, DishCategory,
    ExportRequest, Id, Product, Recipe, Resource,
};
pub use view::{
    localize_all, BrandView, CategoryView, DishCategoryView, DishView, Localize, ProductView,
    RecipeView,
};
