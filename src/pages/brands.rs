use serde::Serialize;

use super::optional;
use crate::cms::{Cms, CmsResult, Filter};
use crate::content::{
    localize_all, Brand, BrandView, Category, CategoryView, Id, Locale, Localize, Product,
    ProductView, Recipe, RecipeView,
};

#[derive(Debug, Serialize)]
pub struct BrandsPage {
    pub brands: Vec<BrandView>,
}

pub async fn brands(cms: &Cms, locale: Locale) -> CmsResult<BrandsPage> {
    let brands = cms.all::<Brand>().await?;
    Ok(BrandsPage {
        brands: localize_all(&brands, locale),
    })
}

/// Products of one category; `category` is `None` for products without one
#[derive(Debug, Serialize)]
pub struct CategorySection {
    pub category: Option<CategoryView>,
    pub products: Vec<ProductView>,
}

#[derive(Debug, Serialize)]
pub struct BrandPage {
    pub brand: BrandView,
    pub categories: Vec<CategoryView>,
    pub sections: Vec<CategorySection>,
}

/// A brand with its products grouped by category
///
/// Sections follow category order; empty categories are left out and
/// products outside the brand's categories come last.
pub async fn brand(cms: &Cms, locale: Locale, id: Id) -> CmsResult<BrandPage> {
    let by_brand = Filter::new().eq("brand_id", id);
    let (brand, categories, products) = tokio::try_join!(
        cms.get::<Brand>(id),
        cms.list::<Category>(&by_brand),
        cms.list::<Product>(&by_brand)
    )?;

    let mut sections: Vec<CategorySection> = categories
        .iter()
        .map(|category| CategorySection {
            category: Some(category.localize(locale)),
            products: products
                .iter()
                .filter(|p| p.category_id == Some(category.id))
                .map(|p| p.localize(locale))
                .collect(),
        })
        .filter(|section| !section.products.is_empty())
        .collect();

    let loose: Vec<ProductView> = products
        .iter()
        .filter(|p| {
            p.category_id
                .map_or(true, |cid| !categories.iter().any(|c| c.id == cid))
        })
        .map(|p| p.localize(locale))
        .collect();
    if !loose.is_empty() {
        sections.push(CategorySection {
            category: None,
            products: loose,
        });
    }

    Ok(BrandPage {
        brand: brand.localize(locale),
        categories: localize_all(&categories, locale),
        sections,
    })
}

#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub product: ProductView,
    pub brand: Option<BrandView>,
    pub category: Option<CategoryView>,
    pub related: Vec<ProductView>,
    pub recipes: Vec<RecipeView>,
}

/// A product with its brand, category, related products and the recipes
/// that use it
///
/// Related products share the product's category, exclude the product
/// itself and are capped at `related_limit`.
pub async fn product(
    cms: &Cms,
    locale: Locale,
    id: Id,
    related_limit: usize,
) -> CmsResult<ProductPage> {
    let product = cms.get::<Product>(id).await?;

    let related = async {
        match product.category_id {
            Some(category_id) => {
                cms.list::<Product>(&Filter::new().eq("category_id", category_id))
                    .await
            }
            None => Ok(Vec::new()),
        }
    };
    let category = async {
        match product.category_id {
            Some(category_id) => optional(cms.get::<Category>(category_id)).await,
            None => Ok(None),
        }
    };

    let by_product = Filter::new().eq("product_id", id);
    let (brand, category, related, recipes) = tokio::try_join!(
        optional(cms.get::<Brand>(product.brand_id)),
        category,
        related,
        cms.list::<Recipe>(&by_product)
    )?;

    let related = related
        .iter()
        .filter(|p| p.id != product.id)
        .take(related_limit)
        .map(|p| p.localize(locale))
        .collect();

    Ok(ProductPage {
        product: product.localize(locale),
        brand: brand.map(|b| b.localize(locale)),
        category: category.map(|c| c.localize(locale)),
        related,
        recipes: localize_all(&recipes, locale),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::CmsError;
    use crate::pages::fixtures;
    use serde_json::json;

    async fn id_of(cms: &Cms, collection: &str, name_en: &str) -> Id {
        cms.list_raw(collection, &Filter::new().eq("name_en", name_en))
            .await
            .unwrap()[0]["id"]
            .as_i64()
            .unwrap()
    }

    #[tokio::test]
    async fn test_brand_groups_products_by_category() {
        let (cms, _) = fixtures::demo().await;
        let brand_id = id_of(&cms, "brands", "Palm Oasis").await;
        cms.create_raw(
            "products",
            json!({"brand_id": brand_id, "name_ar": "هدية", "name_en": "Gift Box"}),
        )
        .await
        .unwrap();

        let page = brand(&cms, Locale::En, brand_id).await.unwrap();
        assert_eq!(page.brand.name, "Palm Oasis");
        assert_eq!(page.categories.len(), 2);

        let titles: Vec<_> = page
            .sections
            .iter()
            .map(|s| s.category.as_ref().map(|c| c.name.clone()))
            .collect();
        assert_eq!(
            titles,
            vec![Some("Syrups".to_string()), Some("Whole Dates".to_string()), None]
        );
        assert_eq!(page.sections[2].products[0].name, "Gift Box");
    }

    #[tokio::test]
    async fn test_missing_brand_is_not_found() {
        let (cms, _) = fixtures::demo().await;
        let err = brand(&cms, Locale::En, 999).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_product_related_and_recipes() {
        let (cms, _) = fixtures::demo().await;
        let syrup = id_of(&cms, "products", "Date Syrup").await;
        let category = cms.fetch_raw("products", syrup).await.unwrap()["category_id"]
            .as_i64()
            .unwrap();
        for n in 0..6 {
            cms.create_raw(
                "products",
                json!({"brand_id": 1, "category_id": category, "name_ar": "دبس", "name_en": format!("Syrup {}", n)}),
            )
            .await
            .unwrap();
        }

        let page = product(&cms, Locale::En, syrup, 4).await.unwrap();
        assert_eq!(page.product.name, "Date Syrup");
        assert_eq!(page.brand.unwrap().name, "Palm Oasis");
        assert_eq!(page.category.unwrap().name, "Syrups");
        assert_eq!(page.related.len(), 4);
        assert!(page.related.iter().all(|p| p.id != syrup));
        assert_eq!(page.recipes.len(), 1);
        assert_eq!(page.recipes[0].title, "Date Syrup Muhallebi");
    }

    #[tokio::test]
    async fn test_product_with_deleted_brand_still_renders() {
        let (cms, _) = fixtures::demo().await;
        let created = cms
            .create_raw("products", json!({"brand_id": 404, "name_ar": "س", "name_en": "Orphan"}))
            .await
            .unwrap();
        let id = created["id"].as_i64().unwrap();

        let page = product(&cms, Locale::En, id, 4).await.unwrap();
        assert!(page.brand.is_none());
        assert!(page.related.is_empty());
    }

    #[tokio::test]
    async fn test_product_api_failure() {
        let (cms, backend) = fixtures::demo().await;
        backend.set_offline(true);
        assert!(matches!(
            product(&cms, Locale::En, 1, 4).await,
            Err(CmsError::Unavailable)
        ));
    }
}
