use serde::Serialize;

use super::optional;
use crate::cms::{Cms, CmsResult, Filter};
use crate::content::{
    localize_all, Dish, DishCategory, DishCategoryView, DishView, Id, Locale, Localize, Product,
    ProductView, Recipe, RecipeView,
};

#[derive(Debug, Serialize)]
pub struct RecipesPage {
    pub recipes: Vec<RecipeView>,
    pub dishes: Vec<DishView>,
    /// Dish the list is filtered by
    pub dish: Option<Id>,
}

/// All recipes, or only those for `dish`
pub async fn recipes(cms: &Cms, locale: Locale, dish: Option<Id>) -> CmsResult<RecipesPage> {
    let filter = match dish {
        Some(dish_id) => Filter::new().eq("dish_id", dish_id),
        None => Filter::new(),
    };
    let (recipes, dishes) = tokio::try_join!(cms.list::<Recipe>(&filter), cms.all::<Dish>())?;

    Ok(RecipesPage {
        recipes: localize_all(&recipes, locale),
        dishes: localize_all(&dishes, locale),
        dish,
    })
}

#[derive(Debug, Serialize)]
pub struct RecipePage {
    pub recipe: RecipeView,
    pub dish: Option<DishView>,
    pub product: Option<ProductView>,
}

/// A recipe with its dish and the product it features
///
/// Failing to load the product only drops it from the page.
pub async fn recipe(cms: &Cms, locale: Locale, id: Id) -> CmsResult<RecipePage> {
    let recipe = cms.get::<Recipe>(id).await?;

    let product = async {
        let product_id = recipe.product_id?;
        match cms.get::<Product>(product_id).await {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(recipe = id, product = product_id, error = %e, "Recipe product unavailable");
                None
            }
        }
    };
    let (dish, product) = tokio::join!(optional(cms.get::<Dish>(recipe.dish_id)), product);

    Ok(RecipePage {
        recipe: recipe.localize(locale),
        dish: dish?.map(|d| d.localize(locale)),
        product: product.map(|p| p.localize(locale)),
    })
}

#[derive(Debug, Serialize)]
pub struct DishGroup {
    /// `None` for dishes without a category
    pub category: Option<DishCategoryView>,
    pub dishes: Vec<DishView>,
}

#[derive(Debug, Serialize)]
pub struct DishesPage {
    pub groups: Vec<DishGroup>,
}

/// Dishes grouped by dish category, uncategorized dishes last
pub async fn dishes(cms: &Cms, locale: Locale) -> CmsResult<DishesPage> {
    let (categories, dishes) =
        tokio::try_join!(cms.all::<DishCategory>(), cms.all::<Dish>())?;

    let mut groups: Vec<DishGroup> = categories
        .iter()
        .map(|category| DishGroup {
            category: Some(category.localize(locale)),
            dishes: dishes
                .iter()
                .filter(|d| d.dish_category_id == Some(category.id))
                .map(|d| d.localize(locale))
                .collect(),
        })
        .filter(|group| !group.dishes.is_empty())
        .collect();

    let loose: Vec<DishView> = dishes
        .iter()
        .filter(|d| {
            d.dish_category_id
                .map_or(true, |cid| !categories.iter().any(|c| c.id == cid))
        })
        .map(|d| d.localize(locale))
        .collect();
    if !loose.is_empty() {
        groups.push(DishGroup {
            category: None,
            dishes: loose,
        });
    }

    Ok(DishesPage { groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::fixtures;
    use serde_json::json;

    async fn recipe_id(cms: &Cms, title_en: &str) -> Id {
        cms.list_raw("recipes", &Filter::new().eq("title_en", title_en))
            .await
            .unwrap()[0]["id"]
            .as_i64()
            .unwrap()
    }

    #[tokio::test]
    async fn test_recipes_filtered_by_dish() {
        let (cms, _) = fixtures::demo().await;
        let all = recipes(&cms, Locale::En, None).await.unwrap();
        assert_eq!(all.recipes.len(), 2);
        assert_eq!(all.dishes.len(), 2);

        let dish_id = all.recipes[0].dish_id;
        let filtered = recipes(&cms, Locale::En, Some(dish_id)).await.unwrap();
        assert_eq!(filtered.recipes.len(), 1);
        assert_eq!(filtered.dish, Some(dish_id));
    }

    #[tokio::test]
    async fn test_recipe_with_dish_and_product() {
        let (cms, _) = fixtures::demo().await;
        let id = recipe_id(&cms, "Chicken Kabsa").await;

        let page = recipe(&cms, Locale::Ar, id).await.unwrap();
        assert_eq!(page.recipe.title, "كبسة دجاج");
        assert_eq!(page.dish.unwrap().name, "كبسة");
        assert_eq!(page.product.unwrap().name, "أرز بسمتي");
    }

    #[tokio::test]
    async fn test_recipe_falls_back_to_english_steps() {
        let (cms, _) = fixtures::demo().await;
        let id = recipe_id(&cms, "Date Syrup Muhallebi").await;
        let page = recipe(&cms, Locale::Ar, id).await.unwrap();
        assert_eq!(page.recipe.steps.len(), 3);
        assert_eq!(page.recipe.steps[0], "Heat the milk");
    }

    #[tokio::test]
    async fn test_recipe_missing_product_degrades() {
        let (cms, _) = fixtures::demo().await;
        let id = recipe_id(&cms, "Chicken Kabsa").await;
        let product_id = cms.fetch_raw("recipes", id).await.unwrap()["product_id"]
            .as_i64()
            .unwrap();
        cms.delete("products", product_id).await.unwrap();

        let page = recipe(&cms, Locale::En, id).await.unwrap();
        assert!(page.product.is_none());
        assert!(page.dish.is_some());
    }

    #[tokio::test]
    async fn test_missing_recipe_is_not_found() {
        let (cms, _) = fixtures::demo().await;
        assert!(recipe(&cms, Locale::En, 999).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_dishes_grouped() {
        let (cms, _) = fixtures::demo().await;
        cms.create_raw("dishes", json!({"name_ar": "شوربة", "name_en": "Soup"}))
            .await
            .unwrap();

        let page = dishes(&cms, Locale::En).await.unwrap();
        assert_eq!(page.groups.len(), 3);
        assert_eq!(page.groups[0].category.as_ref().unwrap().name, "Main Dishes");
        assert_eq!(page.groups[0].dishes[0].name, "Kabsa");
        assert!(page.groups[2].category.is_none());
        assert_eq!(page.groups[2].dishes[0].name, "Soup");
    }
}
