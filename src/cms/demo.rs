//! Demo content
//!
//! A small bilingual catalog used by `maeda --demo` so the site can be
//! browsed without a content API.

use serde_json::{json, Value};

use super::error::{CmsError, CmsResult};
use super::CmsBackend;
use crate::content::Id;

async fn insert(backend: &dyn CmsBackend, collection: &str, body: Value) -> CmsResult<Id> {
    let record = backend.create(collection, body).await?;
    record
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| CmsError::Decode(format!("{} record without id", collection)))
}

/// Populate `backend` with sample brands, products, dishes and recipes
pub async fn seed_demo_content(backend: &dyn CmsBackend) -> CmsResult<()> {
    let dates = insert(
        backend,
        "brands",
        json!({
            "name_ar": "واحة النخيل",
            "name_en": "Palm Oasis",
            "description_ar": "تمور ومنتجات تمر من أجود المزارع.",
            "description_en": "Dates and date products from the finest farms.",
        }),
    )
    .await?;
    let pantry = insert(
        backend,
        "brands",
        json!({
            "name_ar": "مؤونة البيت",
            "name_en": "Home Pantry",
            "description_ar": "أرز وبقوليات وتوابل للمطبخ اليومي.",
            "description_en": "Rice, pulses and spices for everyday cooking.",
        }),
    )
    .await?;

    let syrups = insert(
        backend,
        "categories",
        json!({"brand_id": dates, "name_ar": "دبس", "name_en": "Syrups"}),
    )
    .await?;
    let whole_dates = insert(
        backend,
        "categories",
        json!({"brand_id": dates, "name_ar": "تمور", "name_en": "Whole Dates"}),
    )
    .await?;
    let rice = insert(
        backend,
        "categories",
        json!({"brand_id": pantry, "name_ar": "أرز", "name_en": "Rice"}),
    )
    .await?;

    let date_syrup = insert(
        backend,
        "products",
        json!({
            "brand_id": dates, "category_id": syrups,
            "name_ar": "دبس التمر", "name_en": "Date Syrup",
            "description_ar": "دبس تمر طبيعي بدون إضافات.",
            "description_en": "Natural date syrup with no additives.",
            "weight": "400 g", "featured": true,
            "ingredients_ar": "تمر", "ingredients_en": "Dates",
        }),
    )
    .await?;
    insert(
        backend,
        "products",
        json!({
            "brand_id": dates, "category_id": whole_dates,
            "name_ar": "تمر مجدول", "name_en": "Medjool Dates",
            "description_en": "Large, soft Medjool dates.",
            "weight": "1 kg", "featured": true,
        }),
    )
    .await?;
    let basmati = insert(
        backend,
        "products",
        json!({
            "brand_id": pantry, "category_id": rice,
            "name_ar": "أرز بسمتي", "name_en": "Basmati Rice",
            "description_ar": "أرز بسمتي طويل الحبة.",
            "description_en": "Extra long grain basmati rice.",
            "weight": "5 kg",
        }),
    )
    .await?;

    let mains = insert(
        backend,
        "dish-categories",
        json!({"name_ar": "أطباق رئيسية", "name_en": "Main Dishes"}),
    )
    .await?;
    let desserts = insert(
        backend,
        "dish-categories",
        json!({"name_ar": "حلويات", "name_en": "Desserts"}),
    )
    .await?;

    let kabsa = insert(
        backend,
        "dishes",
        json!({"dish_category_id": mains, "name_ar": "كبسة", "name_en": "Kabsa"}),
    )
    .await?;
    let pudding = insert(
        backend,
        "dishes",
        json!({"dish_category_id": desserts, "name_ar": "مهلبية", "name_en": "Muhallebi"}),
    )
    .await?;

    insert(
        backend,
        "recipes",
        json!({
            "dish_id": kabsa, "product_id": basmati,
            "title_ar": "كبسة دجاج", "title_en": "Chicken Kabsa",
            "description_en": "The classic rice and chicken dish.",
            "ingredients_ar": ["أرز بسمتي", "دجاج", "بهارات الكبسة"],
            "ingredients_en": ["Basmati rice", "Chicken", "Kabsa spices"],
            "steps_ar": ["اغسل الأرز", "اطبخ الدجاج مع البهارات", "أضف الأرز واتركه ينضج"],
            "steps_en": ["Rinse the rice", "Cook the chicken with spices", "Add rice and simmer"],
            "prep_minutes": 60, "servings": 4,
        }),
    )
    .await?;
    insert(
        backend,
        "recipes",
        json!({
            "dish_id": pudding, "product_id": date_syrup,
            "title_ar": "مهلبية بدبس التمر", "title_en": "Date Syrup Muhallebi",
            "ingredients_en": ["Milk", "Corn starch", "Date syrup"],
            "steps_en": ["Heat the milk", "Stir in starch until thick", "Top with date syrup"],
            "prep_minutes": 20, "servings": 6,
        }),
    )
    .await?;

    tracing::info!("Demo content seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::{Filter, MemoryBackend};

    #[tokio::test]
    async fn test_seed_links_records() {
        let backend = MemoryBackend::new();
        seed_demo_content(&backend).await.unwrap();

        let brands = backend.list("brands", &Filter::new()).await.unwrap();
        assert_eq!(brands.len(), 2);

        let brand_id = brands[0]["id"].as_i64().unwrap();
        let products = backend
            .list("products", &Filter::new().eq("brand_id", brand_id))
            .await
            .unwrap();
        assert_eq!(products.len(), 2);

        let recipes = backend.list("recipes", &Filter::new()).await.unwrap();
        assert!(recipes.iter().all(|r| r["product_id"].is_i64()));
    }
}
