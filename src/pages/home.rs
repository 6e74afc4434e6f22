use serde::Serialize;

use crate::cms::{Cms, CmsResult};
use crate::config::SiteConfig;
use crate::content::{
    localize_all, Brand, BrandView, Locale, Localize, Product, ProductView, Recipe, RecipeView,
};

const LATEST_RECIPES: usize = 3;

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub featured: Vec<ProductView>,
    pub brands: Vec<BrandView>,
    pub recipes: Vec<RecipeView>,
}

/// Featured products (or the first products when none are featured), all
/// brands and the most recent recipes
pub async fn home(cms: &Cms, locale: Locale, site: &SiteConfig) -> CmsResult<HomePage> {
    let (products, brands, recipes) = tokio::try_join!(
        cms.all::<Product>(),
        cms.all::<Brand>(),
        cms.all::<Recipe>()
    )?;

    let featured: Vec<&Product> = products.iter().filter(|p| p.featured).collect();
    let featured: Vec<ProductView> = if featured.is_empty() {
        products.iter().take(site.home_products).map(|p| p.localize(locale)).collect()
    } else {
        featured.into_iter().take(site.home_products).map(|p| p.localize(locale)).collect()
    };

    let mut latest = recipes;
    latest.sort_by(|a, b| b.id.cmp(&a.id));
    latest.truncate(LATEST_RECIPES);

    Ok(HomePage {
        featured,
        brands: localize_all(&brands, locale),
        recipes: localize_all(&latest, locale),
    })
}
