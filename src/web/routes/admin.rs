//! Back Office Routes
//!
//! ## Access
//! - GET|POST /admin/login - Token sign-in
//! - POST /admin/logout - End the session
//!
//! ## Content
//! - GET /admin - Dashboard with record counts
//! - GET /admin/:kind - Records of one kind
//! - GET /admin/:kind/new - Start a create wizard
//! - GET /admin/:kind/:id/edit - Start an edit wizard
//! - POST /admin/:kind/:id/delete - Delete a record
//!
//! ## Wizards
//! - GET /admin/drafts/:draft - Show the current step (`?step=n` jumps back)
//! - POST /admin/drafts/:draft - Validate the step and advance
//! - POST /admin/drafts/:draft/back - Go back without validating
//! - POST /admin/drafts/:draft/submit - Confirm and save

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tera::Context;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::cms::Filter;
use crate::content::{pick, Id, Locale};
use crate::i18n;
use crate::media::MediaKind;
use crate::render::page_context;
use crate::web::auth::{is_signed_in, sign_in, sign_out, token_matches};
use crate::web::error::{WebError, WebResult};
use crate::web::flash::{redirect_with_flash, take_flash, Flash};
use crate::web::multipart::{read_form, FormData};
use crate::web::page::parse_id;
use crate::web::AppState;
use crate::wizard::{
    self, is_checked, validate_step, Draft, DraftMode, EntityKind, FieldErrors, FieldKind,
    Options, SelectOption, Values, WizardError,
};

#[derive(Debug, Serialize)]
struct KindLink {
    collection: &'static str,
    label: &'static str,
    count: Option<usize>,
}

fn kind_links(locale: Locale) -> Vec<KindLink> {
    EntityKind::all()
        .iter()
        .map(|kind| KindLink {
            collection: kind.collection(),
            label: i18n::t(locale, kind.label_key()),
            count: None,
        })
        .collect()
}

/// Base context for back office pages, consuming any pending flash
pub(crate) fn admin_context(state: &AppState, cookies: &Cookies) -> Context {
    let locale = state.admin_locale();
    let mut context = page_context(locale, "");
    context.insert("kinds", &kind_links(locale));
    context.insert("signed_in", &state.config.admin.token.is_some());
    if let Some(flash) = take_flash(cookies) {
        context.insert("flash", &flash.view(locale));
    }
    context
}

pub(crate) fn render_admin(
    state: &AppState,
    template: &str,
    context: &Context,
    status: StatusCode,
) -> Response {
    match state.renderer.render(template, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => WebError::from(e).into_response(),
    }
}

/// Back office error page, shown inside the admin layout
///
/// `retry` links back to the page that failed, e.g. an open draft.
pub(crate) fn admin_error(
    state: &AppState,
    cookies: &Cookies,
    err: WebError,
    retry: Option<&str>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    err.log(&request_id);

    let locale = state.admin_locale();
    let status = err.status();
    let (heading, message) = if err.is_not_found() {
        ("not_found_title", "admin_not_found")
    } else {
        ("error_title", "admin_load_failed")
    };

    let mut context = admin_context(state, cookies);
    context.insert("heading", i18n::t(locale, heading));
    context.insert("message", i18n::t(locale, message));
    context.insert("retry", &retry);
    context.insert("request_id", &request_id);
    render_admin(state, "admin/error.html", &context, status)
}

fn parse_kind(raw: &str) -> WebResult<EntityKind> {
    raw.parse().map_err(WebError::NotFound)
}

fn draft_path(id: Uuid) -> String {
    format!("/admin/drafts/{}", id)
}

fn str_field<'a>(record: &'a Value, field: &str) -> &'a str {
    record.get(field).and_then(Value::as_str).unwrap_or_default()
}

// ============================================
// Access
// ============================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub token: String,
}

fn login_page(state: &AppState, cookies: &Cookies, failed: bool, status: StatusCode) -> Response {
    let mut context = admin_context(state, cookies);
    context.insert("kinds", &Vec::<KindLink>::new());
    context.insert("signed_in", &false);
    context.insert("failed", &failed);
    render_admin(state, "admin/login.html", &context, status)
}

/// GET /admin/login
pub async fn login_form(State(state): State<Arc<AppState>>, cookies: Cookies) -> Response {
    if is_signed_in(&state, &cookies).await {
        return Redirect::to("/admin").into_response();
    }
    login_page(&state, &cookies, false, StatusCode::OK)
}

/// POST /admin/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Response {
    if state.config.admin.token.is_none() {
        return Redirect::to("/admin").into_response();
    }
    if token_matches(&state, &form.token) {
        sign_in(&state, &cookies).await;
        return Redirect::to("/admin").into_response();
    }
    tracing::warn!("Back office sign-in rejected");
    login_page(&state, &cookies, true, StatusCode::UNAUTHORIZED)
}

/// POST /admin/logout
pub async fn logout(State(state): State<Arc<AppState>>, cookies: Cookies) -> Redirect {
    sign_out(&state, &cookies).await;
    Redirect::to("/admin/login")
}

// ============================================
// Content
// ============================================

/// GET /admin
///
/// Counts that cannot be loaded are left blank rather than failing the page.
pub async fn dashboard(State(state): State<Arc<AppState>>, cookies: Cookies) -> Response {
    let locale = state.admin_locale();
    let mut kinds = kind_links(locale);
    for link in &mut kinds {
        match state.cms.list_raw(link.collection, &Filter::new()).await {
            Ok(records) => link.count = Some(records.len()),
            Err(e) => {
                tracing::warn!(collection = link.collection, error = %e, "Cannot count records")
            }
        }
    }
    let catalog_exists = state.catalog.exists().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Cannot check catalog");
        false
    });

    let mut context = admin_context(&state, &cookies);
    context.insert("kinds", &kinds);
    context.insert("catalog_exists", &catalog_exists);
    render_admin(&state, "admin/index.html", &context, StatusCode::OK)
}

#[derive(Debug, Serialize)]
struct ListRow {
    id: Id,
    title: String,
}

/// GET /admin/:kind
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    cookies: Cookies,
) -> Response {
    match list_rows(&state, &kind).await {
        Ok((kind, rows)) => {
            let locale = state.admin_locale();
            let mut context = admin_context(&state, &cookies);
            context.insert("label", i18n::t(locale, kind.label_key()));
            context.insert("collection", kind.collection());
            context.insert("rows", &rows);
            render_admin(&state, "admin/list.html", &context, StatusCode::OK)
        }
        Err(e) => admin_error(&state, &cookies, e, None),
    }
}

async fn list_rows(state: &AppState, kind: &str) -> WebResult<(EntityKind, Vec<ListRow>)> {
    let kind = parse_kind(kind)?;
    let locale = state.admin_locale();
    let (ar, en) = kind.title_fields();

    let records = state.cms.list_raw(kind.collection(), &Filter::new()).await?;
    let mut rows: Vec<ListRow> = records
        .iter()
        .filter_map(|record| {
            let id = record.get("id").and_then(Value::as_i64)?;
            let title = pick(locale, str_field(record, ar), str_field(record, en));
            Some(ListRow {
                id,
                title: if title.is_empty() {
                    format!("#{}", id)
                } else {
                    title.to_string()
                },
            })
        })
        .collect();
    rows.sort_by_key(|row| row.id);
    Ok((kind, rows))
}

/// GET /admin/:kind/new
pub async fn new_draft(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    cookies: Cookies,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return admin_error(&state, &cookies, e, None),
    };
    let id = state.drafts.save(Draft::new(kind)).await;
    tracing::debug!(kind = %kind, draft = %id, "Wizard started");
    Redirect::to(&draft_path(id)).into_response()
}

/// GET /admin/:kind/:id/edit
pub async fn edit_draft(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, String)>,
    cookies: Cookies,
) -> Response {
    let started = async {
        let kind = parse_kind(&kind)?;
        let id = parse_id(&id)?;
        let record = state.cms.fetch_raw(kind.collection(), id).await?;
        let draft = state.drafts.save(Draft::for_record(kind, id, &record)).await;
        tracing::debug!(kind = %kind, id, draft = %draft, "Edit wizard started");
        Ok::<_, WebError>(draft)
    }
    .await;

    match started {
        Ok(draft) => Redirect::to(&draft_path(draft)).into_response(),
        Err(e) => admin_error(&state, &cookies, e, None),
    }
}

/// POST /admin/:kind/:id/delete
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, String)>,
    cookies: Cookies,
) -> Response {
    let (kind, id) = match parse_kind(&kind).and_then(|kind| Ok((kind, parse_id(&id)?))) {
        Ok(parsed) => parsed,
        Err(e) => return admin_error(&state, &cookies, e, None),
    };
    let back = format!("/admin/{}", kind.collection());

    let flash = match state.cms.delete(kind.collection(), id).await {
        Ok(()) => {
            tracing::info!(kind = %kind, id, "Content deleted");
            Flash::success("admin_deleted")
        }
        Err(e) => {
            tracing::warn!(kind = %kind, id, error = %e, "Delete failed");
            Flash::error("admin_save_failed")
        }
    };
    redirect_with_flash(&cookies, &back, flash)
}

// ============================================
// Wizards
// ============================================

#[derive(Debug, Serialize)]
struct StepLink {
    index: usize,
    number: usize,
    title: &'static str,
    current: bool,
    reachable: bool,
}

#[derive(Debug, Serialize)]
struct FieldView<'a> {
    name: &'static str,
    label: &'static str,
    widget: &'static str,
    required: bool,
    max_len: usize,
    value: &'a str,
    checked: bool,
    options: &'a [SelectOption],
    error: Option<String>,
}

async fn load_draft(state: &AppState, raw: &str) -> Result<Draft, WizardError> {
    let id = Uuid::parse_str(raw).map_err(|_| WizardError::DraftNotFound)?;
    state.drafts.get(id).await.ok_or(WizardError::DraftNotFound)
}

fn draft_expired(cookies: &Cookies) -> Response {
    redirect_with_flash(cookies, "/admin", Flash::error("admin_draft_expired"))
}

fn wizard_page(
    state: &AppState,
    cookies: &Cookies,
    draft: &Draft,
    options: &Options,
    errors: &FieldErrors,
    confirm_error: bool,
    status: StatusCode,
) -> Response {
    let locale = state.admin_locale();
    let spec = draft.spec();

    let steps: Vec<StepLink> = (0..spec.total_steps())
        .map(|index| StepLink {
            index,
            number: index + 1,
            title: spec
                .steps
                .get(index)
                .map_or_else(|| i18n::t(locale, "admin_review"), |step| step.title(locale)),
            current: index == draft.step,
            reachable: index <= draft.furthest,
        })
        .collect();

    let mut context = admin_context(state, cookies);
    context.insert("label", i18n::t(locale, draft.kind.label_key()));
    context.insert("editing", &matches!(draft.mode, DraftMode::Edit(_)));
    context.insert("steps", &steps);
    context.insert("draft", &draft.id.to_string());
    context.insert("number", &(draft.step.min(spec.review_index()) + 1));
    context.insert("total", &spec.total_steps());
    context.insert("has_errors", &(!errors.is_empty() || confirm_error));
    context.insert("review", &draft.is_review());
    context.insert("confirm_error", &confirm_error);

    match draft.current_step() {
        None => context.insert("sections", &draft.review(options, locale)),
        Some(step) => {
            let fields: Vec<FieldView> = step
                .fields
                .iter()
                .map(|field| {
                    let value = draft.value(field.name);
                    FieldView {
                        name: field.name,
                        label: field.label(locale),
                        widget: field.kind.widget(),
                        required: field.required,
                        max_len: field.max_len,
                        value,
                        checked: is_checked(value),
                        options: match field.kind {
                            FieldKind::Select(source) => {
                                options.get(&source).map(Vec::as_slice).unwrap_or_default()
                            }
                            _ => &[],
                        },
                        error: errors
                            .get(field.name)
                            .map(|key| i18n::t(locale, key).to_string()),
                    }
                })
                .collect();
            context.insert("fields", &fields);
        }
    }

    render_admin(state, "admin/wizard.html", &context, status)
}

/// Values submitted for the draft's current step
///
/// A media field takes an uploaded file first, then a pasted URL, then its
/// clear box. With none of them the stored value is kept. Files that cannot
/// be stored are reported per field.
async fn step_input(state: &AppState, draft: &Draft, form: &mut FormData) -> (Values, FieldErrors) {
    let mut values = Values::new();
    let mut errors = FieldErrors::new();
    let Some(step) = draft.current_step() else {
        return (values, errors);
    };

    for field in step.fields {
        let name = field.name;
        if !field.kind.is_media() {
            if let Some(value) = form.fields.get(name) {
                values.insert(name.to_string(), value.clone());
            }
            continue;
        }

        let url = form.field(&format!("{}_url", name)).trim().to_string();
        if let Some(file) = form.take_file(name) {
            let kind = match field.kind {
                FieldKind::Video => MediaKind::Video,
                _ => MediaKind::Image,
            };
            match state.media.store(file, kind).await {
                Ok(stored) => {
                    values.insert(name.to_string(), stored);
                }
                Err(e) => {
                    tracing::warn!(field = name, error = %e, "Wizard media rejected");
                    errors.insert(name.to_string(), e.message_key());
                }
            }
        } else if !url.is_empty() {
            values.insert(name.to_string(), url);
        } else if is_checked(form.field(&format!("{}_clear", name))) {
            values.insert(name.to_string(), String::new());
        }
    }
    (values, errors)
}

#[derive(Debug, Deserialize)]
pub struct StepQuery {
    pub step: Option<usize>,
}

/// GET /admin/drafts/:draft
pub async fn show_draft(
    State(state): State<Arc<AppState>>,
    Path(draft_id): Path<String>,
    Query(query): Query<StepQuery>,
    cookies: Cookies,
) -> Response {
    let Ok(mut draft) = load_draft(&state, &draft_id).await else {
        return draft_expired(&cookies);
    };

    if let Some(step) = query.step {
        match draft.goto(step) {
            Ok(()) => {
                state.drafts.save(draft.clone()).await;
            }
            Err(e) => tracing::debug!(draft = %draft.id, error = %e, "Step jump refused"),
        }
    }

    let options = match wizard::load_options(&state.cms, draft.spec(), state.admin_locale()).await
    {
        Ok(options) => options,
        Err(e) => return admin_error(&state, &cookies, e.into(), Some(&draft_path(draft.id))),
    };
    let errors = FieldErrors::new();
    wizard_page(&state, &cookies, &draft, &options, &errors, false, StatusCode::OK)
}

/// POST /admin/drafts/:draft
///
/// The step input is kept in the draft before anything can fail, so an
/// outage does not lose what was typed.
pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(draft_id): Path<String>,
    cookies: Cookies,
    multipart: Multipart,
) -> Response {
    let Ok(mut draft) = load_draft(&state, &draft_id).await else {
        return draft_expired(&cookies);
    };
    let retry = draft_path(draft.id);
    let mut form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => return admin_error(&state, &cookies, e, Some(&retry)),
    };
    let (input, media_errors) = step_input(&state, &draft, &mut form).await;
    draft.store_input(&input);
    state.drafts.save(draft.clone()).await;

    let options = match wizard::load_options(&state.cms, draft.spec(), state.admin_locale()).await
    {
        Ok(options) => options,
        Err(e) => return admin_error(&state, &cookies, e.into(), Some(&retry)),
    };

    let result = if media_errors.is_empty() {
        draft.advance(&input, &options)
    } else {
        let mut errors = draft
            .current_step()
            .map(|step| validate_step(step, &draft.values, &options))
            .unwrap_or_default();
        errors.extend(media_errors);
        Err(errors)
    };
    state.drafts.save(draft.clone()).await;

    match result {
        Ok(()) => Redirect::to(&retry).into_response(),
        Err(errors) => wizard_page(
            &state,
            &cookies,
            &draft,
            &options,
            &errors,
            false,
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
    }
}

/// POST /admin/drafts/:draft/back
pub async fn back(
    State(state): State<Arc<AppState>>,
    Path(draft_id): Path<String>,
    cookies: Cookies,
    multipart: Multipart,
) -> Response {
    let Ok(mut draft) = load_draft(&state, &draft_id).await else {
        return draft_expired(&cookies);
    };
    let path = draft_path(draft.id);
    let mut form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => return admin_error(&state, &cookies, e, Some(&path)),
    };
    let (input, _) = step_input(&state, &draft, &mut form).await;

    draft.back(&input);
    state.drafts.save(draft).await;
    Redirect::to(&path).into_response()
}

/// POST /admin/drafts/:draft/submit
///
/// A failed save keeps the draft so nothing entered is lost.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(draft_id): Path<String>,
    cookies: Cookies,
    multipart: Multipart,
) -> Response {
    let Ok(mut draft) = load_draft(&state, &draft_id).await else {
        return draft_expired(&cookies);
    };
    let path = draft_path(draft.id);
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => return admin_error(&state, &cookies, e, Some(&path)),
    };
    let confirmed = is_checked(form.field("confirm"));
    let options = match wizard::load_options(&state.cms, draft.spec(), state.admin_locale()).await
    {
        Ok(options) => options,
        Err(e) => return admin_error(&state, &cookies, e.into(), Some(&path)),
    };

    match draft.submit(confirmed, &options) {
        Ok(submission) => match wizard::persist(&state.cms, &submission).await {
            Ok(_) => {
                state.drafts.remove(draft.id).await;
                let list = format!("/admin/{}", draft.kind.collection());
                redirect_with_flash(&cookies, &list, Flash::success("admin_saved"))
            }
            Err(e) => {
                tracing::warn!(draft = %draft.id, kind = %draft.kind, error = %e, "Saving failed");
                redirect_with_flash(&cookies, &path, Flash::error("admin_save_failed"))
            }
        },
        Err(WizardError::NotConfirmed) => wizard_page(
            &state,
            &cookies,
            &draft,
            &options,
            &FieldErrors::new(),
            true,
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        Err(WizardError::StepInvalid { errors, .. }) => {
            state.drafts.save(draft.clone()).await;
            wizard_page(
                &state,
                &cookies,
                &draft,
                &options,
                &errors,
                false,
                StatusCode::UNPROCESSABLE_ENTITY,
            )
        }
        Err(WizardError::NotOnReview) => Redirect::to(&path).into_response(),
        Err(e) => admin_error(&state, &cookies, e.into(), Some(&path)),
    }
}
