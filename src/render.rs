//! HTML rendering
//!
//! Templates are compiled into the binary and registered with Tera once at
//! startup. Every page gets the locale, text direction and UI string table
//! in its base context.

use chrono::{Datelike, Utc};
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::content::Locale;
use crate::i18n;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("brands.html", include_str!("../templates/brands.html")),
    ("brand.html", include_str!("../templates/brand.html")),
    ("product.html", include_str!("../templates/product.html")),
    ("recipes.html", include_str!("../templates/recipes.html")),
    ("recipe.html", include_str!("../templates/recipe.html")),
    ("dishes.html", include_str!("../templates/dishes.html")),
    ("form.html", include_str!("../templates/form.html")),
    ("not_found.html", include_str!("../templates/not_found.html")),
    ("error.html", include_str!("../templates/error.html")),
    ("admin/base.html", include_str!("../templates/admin/base.html")),
    ("admin/login.html", include_str!("../templates/admin/login.html")),
    ("admin/index.html", include_str!("../templates/admin/index.html")),
    ("admin/list.html", include_str!("../templates/admin/list.html")),
    ("admin/wizard.html", include_str!("../templates/admin/wizard.html")),
    ("admin/catalog.html", include_str!("../templates/admin/catalog.html")),
    ("admin/error.html", include_str!("../templates/admin/error.html")),
];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

/// Compiled template set
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    pub fn render(&self, template: &str, context: &Context) -> Result<String, RenderError> {
        self.tera.render(template, context).map_err(|e| {
            tracing::error!(template, error = ?e, "Template rendering failed");
            RenderError::Template(e)
        })
    }

    /// Render a public page: `data`'s fields merged into the base context
    pub fn page<T: Serialize>(
        &self,
        template: &str,
        mut context: Context,
        data: &T,
    ) -> Result<String, RenderError> {
        context.extend(Context::from_serialize(data)?);
        self.render(template, &context)
    }
}

/// Base context for a public page
///
/// `path` is the request path after the locale segment, used to link the
/// same page in the other language.
pub fn page_context(locale: Locale, path: &str) -> Context {
    let mut context = Context::new();
    context.insert("lang", locale.code());
    context.insert("dir", locale.dir());
    context.insert("other_lang", locale.other().code());
    context.insert("path", path);
    context.insert("t", i18n::labels(locale));
    context.insert("year", &Utc::now().year());
    context
}
