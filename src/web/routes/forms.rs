//! Public Form Routes
//!
//! - GET|POST /:lang/contact - Contact message
//! - GET|POST /:lang/careers - Job application with optional CV upload
//! - GET|POST /:lang/export - Export inquiry
//!
//! Invalid input re-renders the form with the entered values and a message
//! per field (422). A content API failure re-renders it with an error toast.
//! Success redirects back to the empty form with a success toast.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Response,
    Form,
};
use serde::Serialize;
use std::sync::Arc;
use tower_cookies::Cookies;

use crate::cms::{CmsError, UploadedFile};
use crate::forms::{self, FormErrors, FormField, FormValues, Widget};
use crate::i18n;
use crate::media::{MediaError, MediaKind};
use crate::web::flash::{redirect_with_flash, Flash};
use crate::web::multipart::read_form;
use crate::web::page::PageRequest;
use crate::web::AppState;

/// The three public forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicForm {
    Contact,
    Careers,
    Export,
}

impl PublicForm {
    fn fields(self) -> &'static [FormField] {
        match self {
            PublicForm::Contact => forms::CONTACT_FIELDS,
            PublicForm::Careers => forms::CAREER_FIELDS,
            PublicForm::Export => forms::EXPORT_FIELDS,
        }
    }

    fn path(self) -> &'static str {
        match self {
            PublicForm::Contact => "/contact",
            PublicForm::Careers => "/careers",
            PublicForm::Export => "/export",
        }
    }

    fn title_key(self) -> &'static str {
        match self {
            PublicForm::Contact => "contact_title",
            PublicForm::Careers => "careers_title",
            PublicForm::Export => "export_title",
        }
    }

    fn sent_key(self) -> &'static str {
        match self {
            PublicForm::Contact => "contact_sent",
            PublicForm::Careers => "career_sent",
            PublicForm::Export => "export_sent",
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldView {
    name: &'static str,
    label: String,
    widget: Widget,
    required: bool,
    value: String,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct FormPage {
    title: String,
    action: String,
    multipart: bool,
    errors: bool,
    fields: Vec<FieldView>,
    file_error: Option<String>,
}

/// What went wrong with a submission
enum Rejected {
    Invalid {
        errors: FormErrors,
        file_error: Option<&'static str>,
    },
    Failed,
}

fn form_page(
    form: PublicForm,
    page: &PageRequest,
    values: &FormValues,
    errors: &FormErrors,
    file_error: Option<&'static str>,
) -> FormPage {
    let locale = page.locale;
    FormPage {
        title: i18n::t(locale, form.title_key()).to_string(),
        action: page.link(form.path()),
        multipart: form == PublicForm::Careers,
        errors: !errors.is_empty() || file_error.is_some(),
        fields: form
            .fields()
            .iter()
            .map(|field| FieldView {
                name: field.name,
                label: i18n::t(locale, field.label).to_string(),
                widget: field.widget,
                required: field.required,
                value: values.get(field.name).cloned().unwrap_or_default(),
                error: errors
                    .get(field.name)
                    .map(|key| i18n::t(locale, key).to_string()),
            })
            .collect(),
        file_error: file_error.map(|key| i18n::t(locale, key).to_string()),
    }
}

fn show(state: &AppState, page: &PageRequest, form: PublicForm) -> Response {
    let data = form_page(form, page, &FormValues::new(), &FormErrors::new(), None);
    state.render_page(page, "form.html", Ok(data))
}

/// Redirect on success, otherwise render the form again with what was entered
fn respond(
    state: &AppState,
    cookies: &Cookies,
    page: PageRequest,
    form: PublicForm,
    values: &FormValues,
    outcome: Result<(), Rejected>,
) -> Response {
    match outcome {
        Ok(()) => redirect_with_flash(
            cookies,
            &page.link(form.path()),
            Flash::success(form.sent_key()),
        ),
        Err(Rejected::Invalid { errors, file_error }) => {
            tracing::debug!(
                form = form.path(),
                fields = ?errors.keys().collect::<Vec<_>>(),
                "Form rejected"
            );
            let data = form_page(form, &page, values, &errors, file_error);
            state.render_page_with_status(
                &page,
                "form.html",
                StatusCode::UNPROCESSABLE_ENTITY,
                Ok(data),
            )
        }
        Err(Rejected::Failed) => {
            let page = PageRequest {
                flash: Some(Flash::error("submit_failed")),
                ..page
            };
            let data = form_page(form, &page, values, &FormErrors::new(), None);
            state.render_page_with_status(&page, "form.html", StatusCode::BAD_GATEWAY, Ok(data))
        }
    }
}

fn failed(form: PublicForm, err: CmsError) -> Rejected {
    tracing::warn!(form = form.path(), error = %err, "Form submission failed");
    Rejected::Failed
}

/// GET /:lang/contact
pub async fn contact_form(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    show(&state, &page, PublicForm::Contact)
}

/// POST /:lang/contact
pub async fn contact_submit(
    State(state): State<Arc<AppState>>,
    page: PageRequest,
    cookies: Cookies,
    Form(values): Form<FormValues>,
) -> Response {
    let form = PublicForm::Contact;
    let outcome = match forms::contact(&values) {
        Ok(message) => state.cms.submit(&message).await.map_err(|e| failed(form, e)),
        Err(errors) => Err(Rejected::Invalid {
            errors,
            file_error: None,
        }),
    };
    respond(&state, &cookies, page, form, &values, outcome)
}

/// GET /:lang/export
pub async fn export_form(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    show(&state, &page, PublicForm::Export)
}

/// POST /:lang/export
pub async fn export_submit(
    State(state): State<Arc<AppState>>,
    page: PageRequest,
    cookies: Cookies,
    Form(values): Form<FormValues>,
) -> Response {
    let form = PublicForm::Export;
    let outcome = match forms::export_request(&values) {
        Ok(request) => state.cms.submit(&request).await.map_err(|e| failed(form, e)),
        Err(errors) => Err(Rejected::Invalid {
            errors,
            file_error: None,
        }),
    };
    respond(&state, &cookies, page, form, &values, outcome)
}

/// GET /:lang/careers
pub async fn careers_form(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    show(&state, &page, PublicForm::Careers)
}

/// POST /:lang/careers
///
/// The CV is only uploaded once every text field validates.
pub async fn careers_submit(
    State(state): State<Arc<AppState>>,
    page: PageRequest,
    cookies: Cookies,
    multipart: Multipart,
) -> Response {
    let form = PublicForm::Careers;
    let mut data = match read_form(multipart).await {
        Ok(data) => data,
        Err(e) => return state.error_page(&page, e),
    };
    let cv = data.take_file("cv");
    let values = data.fields;

    let outcome = match forms::validate(form.fields(), &values) {
        errors if !errors.is_empty() => Err(Rejected::Invalid {
            file_error: cv
                .as_ref()
                .and_then(|file| state.media.validate(file, MediaKind::Document).err())
                .map(|e| e.message_key()),
            errors,
        }),
        _ => submit_application(&state, &values, cv).await,
    };
    respond(&state, &cookies, page, form, &values, outcome)
}

async fn submit_application(
    state: &AppState,
    values: &FormValues,
    cv: Option<UploadedFile>,
) -> Result<(), Rejected> {
    let form = PublicForm::Careers;
    let cv_url = match cv {
        Some(file) => match state.media.store(file, MediaKind::Document).await {
            Ok(url) => Some(url),
            Err(MediaError::Upload(e)) => return Err(failed(form, e)),
            Err(e) => {
                return Err(Rejected::Invalid {
                    errors: FormErrors::new(),
                    file_error: Some(e.message_key()),
                })
            }
        },
        None => None,
    };

    let application = forms::career(values, cv_url).map_err(|errors| Rejected::Invalid {
        errors,
        file_error: None,
    })?;
    state
        .cms
        .submit(&application)
        .await
        .map_err(|e| failed(form, e))
}
