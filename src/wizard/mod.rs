//! Admin Wizards
//!
//! Multi-step create and edit forms for brands, categories, products, dishes
//! and recipes. Each wizard walks through its steps, then a review page;
//! submission requires the review page's confirmation box and revalidates
//! every step.

mod draft;
mod spec;
mod store;
mod validate;

pub use draft::{Draft, DraftMode, ReviewRow, ReviewSection, Submission};
pub use spec::{EntityKind, FieldKind, FieldSpec, OptionSource, StepSpec, WizardSpec};
pub use store::DraftStore;
pub use validate::{
    build_payload, is_checked, validate_field, validate_step, values_from_record, FieldErrors,
    Options, SelectOption, Values,
};

use serde_json::Value;
use thiserror::Error;

use crate::cms::{Cms, CmsError, CmsResult, Filter};
use crate::content::{pick, Locale};

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Draft not found or expired")]
    DraftNotFound,

    #[error("Step {0} has not been reached yet")]
    StepLocked(usize),

    #[error("Submission is only possible from the review step")]
    NotOnReview,

    #[error("Confirmation is required")]
    NotConfirmed,

    #[error("Step {step} is invalid")]
    StepInvalid { step: usize, errors: FieldErrors },

    #[error("Content API error: {0}")]
    Cms(#[from] CmsError),
}

/// Load the choices for every select field of `spec`
pub async fn load_options(cms: &Cms, spec: &WizardSpec, locale: Locale) -> CmsResult<Options> {
    let mut options = Options::new();
    for source in spec.option_sources() {
        let records = cms.list_raw(source.collection(), &Filter::new()).await?;
        let (ar, en) = source.label_fields();
        let choices = records
            .iter()
            .filter_map(|record| {
                let id = record.get("id").and_then(Value::as_i64)?;
                let label = pick(
                    locale,
                    record.get(ar).and_then(Value::as_str).unwrap_or_default(),
                    record.get(en).and_then(Value::as_str).unwrap_or_default(),
                );
                Some(SelectOption {
                    value: id.to_string(),
                    label: if label.is_empty() {
                        format!("#{}", id)
                    } else {
                        label.to_string()
                    },
                })
            })
            .collect();
        options.insert(source, choices);
    }
    Ok(options)
}

/// Send a validated submission to the content API, returning the stored record
pub async fn persist(cms: &Cms, submission: &Submission) -> CmsResult<Value> {
    let collection = submission.kind.collection();
    let body = submission.body.clone();
    let record = match submission.mode {
        DraftMode::Create => cms.create_raw(collection, body).await?,
        DraftMode::Edit(id) => cms.update_raw(collection, id, body).await?,
    };
    let id = record.get("id").and_then(Value::as_i64);
    tracing::info!(
        kind = %submission.kind,
        mode = ?submission.mode,
        id = ?id,
        "Content saved"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::{seed_demo_content, MemoryBackend};
    use std::sync::Arc;

    async fn demo_cms() -> Cms {
        let backend = Arc::new(MemoryBackend::new());
        seed_demo_content(backend.as_ref()).await.unwrap();
        Cms::new(backend)
    }

    #[tokio::test]
    async fn test_load_options_localized() {
        let cms = demo_cms().await;
        let options = load_options(&cms, EntityKind::Product.wizard(), Locale::En)
            .await
            .unwrap();

        let brands = &options[&OptionSource::Brands];
        assert_eq!(brands.len(), 2);
        assert!(brands.iter().any(|o| o.label == "Palm Oasis"));
        assert_eq!(options[&OptionSource::Categories].len(), 3);
    }

    #[tokio::test]
    async fn test_create_then_edit_round() {
        let cms = demo_cms().await;
        let spec = EntityKind::Dish.wizard();
        let options = load_options(&cms, spec, Locale::En).await.unwrap();

        let mut draft = Draft::new(EntityKind::Dish);
        let values: Values = [("name_ar", "فتة"), ("name_en", "Fatteh")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        draft.advance(&values, &options).unwrap();
        draft.advance(&Values::new(), &options).unwrap();

        let created = persist(&cms, &draft.submit(true, &options).unwrap())
            .await
            .unwrap();
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["dish_category_id"], Value::Null);

        let mut edit = Draft::for_record(EntityKind::Dish, id, &created);
        edit.goto(0).unwrap();
        let mut values = edit.values.clone();
        values.insert("name_en".to_string(), "Fatteh Hummus".to_string());
        edit.advance(&values, &options).unwrap();
        edit.goto(spec.review_index()).unwrap();

        persist(&cms, &edit.submit(true, &options).unwrap())
            .await
            .unwrap();
        let stored = cms.fetch_raw("dishes", id).await.unwrap();
        assert_eq!(stored["name_en"], "Fatteh Hummus");
    }
}
