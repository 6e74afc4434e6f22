//! Field validation and payload conversion

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use super::spec::{FieldKind, FieldSpec, OptionSource, StepSpec, WizardSpec};
use crate::media::parse_data_url;

/// Field name -> i18n key of the problem with it
pub type FieldErrors = BTreeMap<String, &'static str>;

/// Raw form values keyed by field name
pub type Values = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Choices offered by each select source
pub type Options = HashMap<OptionSource, Vec<SelectOption>>;

/// Validate one field value; `None` if it is acceptable
pub fn validate_field(field: &FieldSpec, raw: &str, options: &Options) -> Option<&'static str> {
    let value = raw.trim();

    if value.is_empty() || (field.kind == FieldKind::Lines && lines(value).is_empty()) {
        return field.required.then_some("form_required");
    }

    if field.max_len > 0 && value.chars().count() > field.max_len {
        return Some("form_too_long");
    }

    match field.kind {
        FieldKind::Text | FieldKind::LongText | FieldKind::Lines => None,
        FieldKind::Number => value.parse::<u32>().is_err().then_some("form_invalid_number"),
        FieldKind::Checkbox => None,
        FieldKind::Select(source) => {
            let offered = options
                .get(&source)
                .map(|opts| opts.iter().any(|o| o.value == value))
                .unwrap_or(false);
            (!offered).then_some("form_invalid_option")
        }
        FieldKind::Image | FieldKind::Video => {
            (!is_media_reference(value)).then_some("form_invalid_media")
        }
    }
}

/// Validate every field of `step` against `values`
pub fn validate_step(step: &StepSpec, values: &Values, options: &Options) -> FieldErrors {
    step.fields
        .iter()
        .filter_map(|field| {
            let raw = values.get(field.name).map(String::as_str).unwrap_or_default();
            validate_field(field, raw, options).map(|key| (field.name.to_string(), key))
        })
        .collect()
}

/// A stored media value: a decodable data URL, an absolute URL or a site path
fn is_media_reference(value: &str) -> bool {
    if value.starts_with("data:") {
        return parse_data_url(value).is_some();
    }
    value.starts_with("https://") || value.starts_with("http://") || value.starts_with('/')
}

fn lines(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Convert validated values into the JSON body for the content API
///
/// Blank optional fields become `null`; ids and numbers become integers;
/// list fields become arrays.
pub fn build_payload(spec: &WizardSpec, values: &Values) -> Value {
    let mut body = Map::new();
    for field in spec.fields() {
        let raw = values.get(field.name).map(|v| v.trim()).unwrap_or_default();
        body.insert(field.name.to_string(), field_value(field.kind, raw));
    }
    Value::Object(body)
}

fn field_value(kind: FieldKind, raw: &str) -> Value {
    match kind {
        FieldKind::Checkbox => Value::Bool(is_checked(raw)),
        FieldKind::Lines => Value::Array(lines(raw).into_iter().map(Value::String).collect()),
        _ if raw.is_empty() => Value::Null,
        FieldKind::Number => raw.parse::<u32>().map(Value::from).unwrap_or(Value::Null),
        FieldKind::Select(_) => raw.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
        FieldKind::Text | FieldKind::LongText | FieldKind::Image | FieldKind::Video => {
            Value::String(raw.to_string())
        }
    }
}

/// Whether a checkbox value counts as ticked
pub fn is_checked(raw: &str) -> bool {
    matches!(raw.trim(), "on" | "true" | "1" | "yes")
}

/// Turn a stored record back into form values for editing
pub fn values_from_record(spec: &WizardSpec, record: &Value) -> Values {
    spec.fields()
        .map(|field| {
            let raw = match record.get(field.name) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(Value::Bool(b)) => if *b { "true" } else { "" }.to_string(),
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("\n"),
                Some(other) => other.to_string(),
            };
            (field.name.to_string(), raw)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::EntityKind;
    use serde_json::json;

    fn options() -> Options {
        let mut options = Options::new();
        options.insert(
            OptionSource::Dishes,
            vec![SelectOption {
                value: "7".to_string(),
                label: "Kabsa".to_string(),
            }],
        );
        options
    }

    fn recipe_field(name: &str) -> &'static FieldSpec {
        EntityKind::Recipe.wizard().field(name).unwrap()
    }

    #[test]
    fn test_required_and_length() {
        let title = recipe_field("title_en");
        assert_eq!(validate_field(title, "   ", &options()), Some("form_required"));
        assert_eq!(validate_field(title, &"x".repeat(121), &options()), Some("form_too_long"));
        assert_eq!(validate_field(title, &"ب".repeat(120), &options()), None);
    }

    #[test]
    fn test_number_field() {
        let minutes = recipe_field("prep_minutes");
        assert_eq!(validate_field(minutes, "", &options()), None);
        assert_eq!(validate_field(minutes, "45", &options()), None);
        assert_eq!(validate_field(minutes, "-3", &options()), Some("form_invalid_number"));
        assert_eq!(validate_field(minutes, "ten", &options()), Some("form_invalid_number"));
    }

    #[test]
    fn test_select_must_be_offered() {
        let dish = recipe_field("dish_id");
        assert_eq!(validate_field(dish, "7", &options()), None);
        assert_eq!(validate_field(dish, "8", &options()), Some("form_invalid_option"));

        // products were never loaded, so nothing is offered
        let product = recipe_field("product_id");
        assert_eq!(validate_field(product, "", &options()), None);
        assert_eq!(validate_field(product, "1", &options()), Some("form_invalid_option"));
    }

    #[test]
    fn test_lines_need_a_non_blank_line() {
        let steps = recipe_field("steps_en");
        assert_eq!(validate_field(steps, "\n  \n", &options()), Some("form_required"));
        assert_eq!(validate_field(steps, "Boil\nServe", &options()), None);
    }

    #[test]
    fn test_media_reference() {
        let image = recipe_field("image");
        assert_eq!(validate_field(image, "/uploads/1/a.jpg", &options()), None);
        assert_eq!(validate_field(image, "https://cdn.example.com/a.jpg", &options()), None);
        assert_eq!(validate_field(image, "data:image/jpeg;base64,AQID", &options()), None);
        assert_eq!(
            validate_field(image, "data:image/jpeg;base64,!!", &options()),
            Some("form_invalid_media")
        );
        assert_eq!(validate_field(image, "javascript:alert(1)", &options()), Some("form_invalid_media"));
    }

    #[test]
    fn test_build_payload() {
        let values: Values = [
            ("dish_id", "7"),
            ("product_id", ""),
            ("title_ar", " كبسة "),
            ("title_en", "Kabsa"),
            ("ingredients_en", "Rice\n\n Chicken "),
            ("prep_minutes", "30"),
            ("servings", ""),
            ("image", "/uploads/1/k.jpg"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let body = build_payload(EntityKind::Recipe.wizard(), &values);
        assert_eq!(body["dish_id"], json!(7));
        assert_eq!(body["product_id"], Value::Null);
        assert_eq!(body["title_ar"], json!("كبسة"));
        assert_eq!(body["ingredients_en"], json!(["Rice", "Chicken"]));
        assert_eq!(body["ingredients_ar"], json!([]));
        assert_eq!(body["prep_minutes"], json!(30));
        assert_eq!(body["servings"], Value::Null);
        assert_eq!(body["video"], Value::Null);
    }

    #[test]
    fn test_checkbox_payload() {
        let spec = EntityKind::Product.wizard();
        let mut values = Values::new();
        assert_eq!(build_payload(spec, &values)["featured"], json!(false));
        values.insert("featured".to_string(), "on".to_string());
        assert_eq!(build_payload(spec, &values)["featured"], json!(true));
    }

    #[test]
    fn test_values_from_record() {
        let record = json!({
            "id": 3,
            "dish_id": 7,
            "product_id": null,
            "title_en": "Kabsa",
            "steps_en": ["Rinse", "Cook"],
            "servings": 4,
        });
        let values = values_from_record(EntityKind::Recipe.wizard(), &record);
        assert_eq!(values["dish_id"], "7");
        assert_eq!(values["product_id"], "");
        assert_eq!(values["steps_en"], "Rinse\nCook");
        assert_eq!(values["servings"], "4");
        assert!(!values.contains_key("id"));
    }
}
