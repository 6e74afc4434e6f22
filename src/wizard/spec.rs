//! Wizard definitions
//!
//! Each editable entity has a fixed sequence of steps. The review step is
//! not listed here: it always follows the last defined step.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::content::{pick, Locale};

/// Entities editable through the back office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Brand,
    Category,
    Product,
    Dish,
    Recipe,
}

impl EntityKind {
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Brand,
            EntityKind::Category,
            EntityKind::Product,
            EntityKind::Dish,
            EntityKind::Recipe,
        ]
    }

    /// Content API collection, also used as the admin URL segment
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Brand => "brands",
            EntityKind::Category => "categories",
            EntityKind::Product => "products",
            EntityKind::Dish => "dishes",
            EntityKind::Recipe => "recipes",
        }
    }

    /// i18n key of the plural label
    pub fn label_key(self) -> &'static str {
        match self {
            EntityKind::Brand => "kind_brands",
            EntityKind::Category => "kind_categories",
            EntityKind::Product => "kind_products",
            EntityKind::Dish => "kind_dishes",
            EntityKind::Recipe => "kind_recipes",
        }
    }

    /// Bilingual field pair used as the record's display name
    pub fn title_fields(self) -> (&'static str, &'static str) {
        match self {
            EntityKind::Recipe => ("title_ar", "title_en"),
            _ => ("name_ar", "name_en"),
        }
    }

    pub fn wizard(self) -> &'static WizardSpec {
        match self {
            EntityKind::Brand => &BRAND_WIZARD,
            EntityKind::Category => &CATEGORY_WIZARD,
            EntityKind::Product => &PRODUCT_WIZARD,
            EntityKind::Dish => &DISH_WIZARD,
            EntityKind::Recipe => &RECIPE_WIZARD,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::all()
            .iter()
            .copied()
            .find(|k| k.collection() == s)
            .ok_or_else(|| format!("Unknown content type: {}", s))
    }
}

/// Where a select field gets its options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionSource {
    Brands,
    Categories,
    Products,
    Dishes,
    DishCategories,
}

impl OptionSource {
    pub fn collection(self) -> &'static str {
        match self {
            OptionSource::Brands => "brands",
            OptionSource::Categories => "categories",
            OptionSource::Products => "products",
            OptionSource::Dishes => "dishes",
            OptionSource::DishCategories => "dish-categories",
        }
    }

    /// Bilingual field pair used as the option label
    pub fn label_fields(self) -> (&'static str, &'static str) {
        ("name_ar", "name_en")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    /// Non-negative whole number
    Number,
    /// Checked or not; stored as a boolean
    Checkbox,
    /// Id of a record from another collection
    Select(OptionSource),
    /// One list entry per line
    Lines,
    Image,
    Video,
}

impl FieldKind {
    /// Name used by templates to pick an input widget
    pub fn widget(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::LongText => "textarea",
            FieldKind::Number => "number",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Select(_) => "select",
            FieldKind::Lines => "lines",
            FieldKind::Image => "image",
            FieldKind::Video => "video",
        }
    }

    pub fn is_media(self) -> bool {
        matches!(self, FieldKind::Image | FieldKind::Video)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label_en: &'static str,
    pub label_ar: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Maximum length in characters, 0 for unlimited
    pub max_len: usize,
}

impl FieldSpec {
    pub fn label(&self, locale: Locale) -> &'static str {
        pick(locale, self.label_ar, self.label_en)
    }
}

#[derive(Debug)]
pub struct StepSpec {
    pub key: &'static str,
    pub title_en: &'static str,
    pub title_ar: &'static str,
    pub fields: &'static [FieldSpec],
}

impl StepSpec {
    pub fn title(&self, locale: Locale) -> &'static str {
        pick(locale, self.title_ar, self.title_en)
    }
}

#[derive(Debug)]
pub struct WizardSpec {
    pub kind: EntityKind,
    pub steps: &'static [StepSpec],
}

impl WizardSpec {
    /// Index of the review step
    pub fn review_index(&self) -> usize {
        self.steps.len()
    }

    /// Number of pages including the review step
    pub fn total_steps(&self) -> usize {
        self.steps.len() + 1
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().find(|f| f.name == name)
    }

    /// Distinct option sources used by select fields
    pub fn option_sources(&self) -> Vec<OptionSource> {
        let mut sources = Vec::new();
        for field in self.fields() {
            if let FieldKind::Select(source) = field.kind {
                if !sources.contains(&source) {
                    sources.push(source);
                }
            }
        }
        sources
    }
}

const fn field(
    name: &'static str,
    label_en: &'static str,
    label_ar: &'static str,
    kind: FieldKind,
    required: bool,
    max_len: usize,
) -> FieldSpec {
    FieldSpec {
        name,
        label_en,
        label_ar,
        kind,
        required,
        max_len,
    }
}

const NAME_LEN: usize = 120;
const DESCRIPTION_LEN: usize = 4000;

static BRAND_WIZARD: WizardSpec = WizardSpec {
    kind: EntityKind::Brand,
    steps: &[
        StepSpec {
            key: "names",
            title_en: "Brand name",
            title_ar: "اسم العلامة",
            fields: &[
                field("name_ar", "Name (Arabic)", "الاسم (عربي)", FieldKind::Text, true, NAME_LEN),
                field("name_en", "Name (English)", "الاسم (إنجليزي)", FieldKind::Text, true, NAME_LEN),
            ],
        },
        StepSpec {
            key: "about",
            title_en: "Description",
            title_ar: "الوصف",
            fields: &[
                field("description_ar", "Description (Arabic)", "الوصف (عربي)", FieldKind::LongText, false, DESCRIPTION_LEN),
                field("description_en", "Description (English)", "الوصف (إنجليزي)", FieldKind::LongText, false, DESCRIPTION_LEN),
            ],
        },
        StepSpec {
            key: "media",
            title_en: "Logo and media",
            title_ar: "الشعار والوسائط",
            fields: &[
                field("logo", "Logo", "الشعار", FieldKind::Image, true, 0),
                field("banner", "Banner", "صورة الغلاف", FieldKind::Image, false, 0),
                field("video", "Video", "فيديو", FieldKind::Video, false, 0),
            ],
        },
    ],
};

static CATEGORY_WIZARD: WizardSpec = WizardSpec {
    kind: EntityKind::Category,
    steps: &[
        StepSpec {
            key: "details",
            title_en: "Category",
            title_ar: "الفئة",
            fields: &[
                field("brand_id", "Brand", "العلامة التجارية", FieldKind::Select(OptionSource::Brands), true, 0),
                field("name_ar", "Name (Arabic)", "الاسم (عربي)", FieldKind::Text, true, NAME_LEN),
                field("name_en", "Name (English)", "الاسم (إنجليزي)", FieldKind::Text, true, NAME_LEN),
            ],
        },
        StepSpec {
            key: "about",
            title_en: "Description and image",
            title_ar: "الوصف والصورة",
            fields: &[
                field("description_ar", "Description (Arabic)", "الوصف (عربي)", FieldKind::LongText, false, DESCRIPTION_LEN),
                field("description_en", "Description (English)", "الوصف (إنجليزي)", FieldKind::LongText, false, DESCRIPTION_LEN),
                field("image", "Image", "الصورة", FieldKind::Image, false, 0),
            ],
        },
    ],
};

static PRODUCT_WIZARD: WizardSpec = WizardSpec {
    kind: EntityKind::Product,
    steps: &[
        StepSpec {
            key: "placement",
            title_en: "Brand and category",
            title_ar: "العلامة والفئة",
            fields: &[
                field("brand_id", "Brand", "العلامة التجارية", FieldKind::Select(OptionSource::Brands), true, 0),
                field("category_id", "Category", "الفئة", FieldKind::Select(OptionSource::Categories), false, 0),
            ],
        },
        StepSpec {
            key: "names",
            title_en: "Product name",
            title_ar: "اسم المنتج",
            fields: &[
                field("name_ar", "Name (Arabic)", "الاسم (عربي)", FieldKind::Text, true, NAME_LEN),
                field("name_en", "Name (English)", "الاسم (إنجليزي)", FieldKind::Text, true, NAME_LEN),
                field("weight", "Pack size", "الحجم", FieldKind::Text, false, 40),
                field("featured", "Featured on home page", "مميز في الصفحة الرئيسية", FieldKind::Checkbox, false, 0),
            ],
        },
        StepSpec {
            key: "details",
            title_en: "Description and ingredients",
            title_ar: "الوصف والمكونات",
            fields: &[
                field("description_ar", "Description (Arabic)", "الوصف (عربي)", FieldKind::LongText, false, DESCRIPTION_LEN),
                field("description_en", "Description (English)", "الوصف (إنجليزي)", FieldKind::LongText, false, DESCRIPTION_LEN),
                field("ingredients_ar", "Ingredients (Arabic)", "المكونات (عربي)", FieldKind::LongText, false, DESCRIPTION_LEN),
                field("ingredients_en", "Ingredients (English)", "المكونات (إنجليزي)", FieldKind::LongText, false, DESCRIPTION_LEN),
            ],
        },
        StepSpec {
            key: "media",
            title_en: "Product image",
            title_ar: "صورة المنتج",
            fields: &[field("image", "Image", "الصورة", FieldKind::Image, true, 0)],
        },
    ],
};

static DISH_WIZARD: WizardSpec = WizardSpec {
    kind: EntityKind::Dish,
    steps: &[
        StepSpec {
            key: "details",
            title_en: "Dish",
            title_ar: "الطبق",
            fields: &[
                field("dish_category_id", "Dish category", "فئة الطبق", FieldKind::Select(OptionSource::DishCategories), false, 0),
                field("name_ar", "Name (Arabic)", "الاسم (عربي)", FieldKind::Text, true, NAME_LEN),
                field("name_en", "Name (English)", "الاسم (إنجليزي)", FieldKind::Text, true, NAME_LEN),
            ],
        },
        StepSpec {
            key: "about",
            title_en: "Description and image",
            title_ar: "الوصف والصورة",
            fields: &[
                field("description_ar", "Description (Arabic)", "الوصف (عربي)", FieldKind::LongText, false, DESCRIPTION_LEN),
                field("description_en", "Description (English)", "الوصف (إنجليزي)", FieldKind::LongText, false, DESCRIPTION_LEN),
                field("image", "Image", "الصورة", FieldKind::Image, false, 0),
            ],
        },
    ],
};

static RECIPE_WIZARD: WizardSpec = WizardSpec {
    kind: EntityKind::Recipe,
    steps: &[
        StepSpec {
            key: "basics",
            title_en: "Recipe",
            title_ar: "الوصفة",
            fields: &[
                field("dish_id", "Dish", "الطبق", FieldKind::Select(OptionSource::Dishes), true, 0),
                field("product_id", "Featured product", "المنتج المستخدم", FieldKind::Select(OptionSource::Products), false, 0),
                field("title_ar", "Title (Arabic)", "العنوان (عربي)", FieldKind::Text, true, NAME_LEN),
                field("title_en", "Title (English)", "العنوان (إنجليزي)", FieldKind::Text, true, NAME_LEN),
            ],
        },
        StepSpec {
            key: "ingredients",
            title_en: "Ingredients",
            title_ar: "المكونات",
            fields: &[
                field("ingredients_ar", "Ingredients (Arabic, one per line)", "المكونات (عربي، سطر لكل مكون)", FieldKind::Lines, true, DESCRIPTION_LEN),
                field("ingredients_en", "Ingredients (English, one per line)", "المكونات (إنجليزي، سطر لكل مكون)", FieldKind::Lines, true, DESCRIPTION_LEN),
            ],
        },
        StepSpec {
            key: "steps",
            title_en: "Preparation steps",
            title_ar: "خطوات التحضير",
            fields: &[
                field("steps_ar", "Steps (Arabic, one per line)", "الخطوات (عربي، سطر لكل خطوة)", FieldKind::Lines, true, DESCRIPTION_LEN),
                field("steps_en", "Steps (English, one per line)", "الخطوات (إنجليزي، سطر لكل خطوة)", FieldKind::Lines, true, DESCRIPTION_LEN),
            ],
        },
        StepSpec {
            key: "details",
            title_en: "Description and timing",
            title_ar: "الوصف والتوقيت",
            fields: &[
                field("description_ar", "Description (Arabic)", "الوصف (عربي)", FieldKind::LongText, false, DESCRIPTION_LEN),
                field("description_en", "Description (English)", "الوصف (إنجليزي)", FieldKind::LongText, false, DESCRIPTION_LEN),
                field("prep_minutes", "Preparation time (minutes)", "وقت التحضير (دقائق)", FieldKind::Number, false, 0),
                field("servings", "Servings", "عدد الحصص", FieldKind::Number, false, 0),
            ],
        },
        StepSpec {
            key: "media",
            title_en: "Photo and video",
            title_ar: "الصورة والفيديو",
            fields: &[
                field("image", "Photo", "الصورة", FieldKind::Image, true, 0),
                field("video", "Video", "فيديو", FieldKind::Video, false, 0),
            ],
        },
    ],
};
