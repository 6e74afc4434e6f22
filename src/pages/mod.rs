//! Public Pages
//!
//! One data-fetch function per public route. Each returns a localized,
//! serializable view model ready for its template. Errors are returned as
//! [`CmsError`]; the web layer decides between the not-found and error pages.

mod brands;
mod home;
mod recipes;

pub use brands::{brand, brands, product, BrandPage, BrandsPage, CategorySection, ProductPage};
pub use home::{home, HomePage};
pub use recipes::{dishes, recipe, recipes, DishGroup, DishesPage, RecipePage, RecipesPage};

use std::future::Future;

use crate::cms::{CmsError, CmsResult};

/// Treat a missing secondary record as absent instead of failing the page
async fn optional<T>(fetch: impl Future<Output = CmsResult<T>>) -> CmsResult<Option<T>> {
    match fetch.await {
        Ok(value) => Ok(Some(value)),
        Err(CmsError::NotFound(what)) => {
            tracing::debug!(record = %what, "Linked record missing");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use crate::cms::{seed_demo_content, Cms, MemoryBackend};

    pub async fn demo() -> (Cms, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        seed_demo_content(backend.as_ref()).await.unwrap();
        (Cms::new(backend.clone()), backend)
    }
}
