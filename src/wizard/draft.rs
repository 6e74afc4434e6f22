//! Wizard drafts
//!
//! A draft holds everything entered so far for one create or edit session,
//! plus where the editor is in the step sequence.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::spec::{EntityKind, FieldKind, StepSpec, WizardSpec};
use super::validate::{
    build_payload, is_checked, validate_step, values_from_record, FieldErrors, Options, Values,
};
use super::WizardError;
use crate::content::{Id, Locale};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "lowercase")]
pub enum DraftMode {
    Create,
    Edit(Id),
}

#[derive(Debug, Clone)]
pub struct Draft {
    pub id: Uuid,
    pub kind: EntityKind,
    pub mode: DraftMode,
    /// Current step; equal to the step count on the review page
    pub step: usize,
    /// Furthest step reached through a validated advance
    pub furthest: usize,
    pub values: Values,
    pub updated_at: DateTime<Utc>,
}

/// A validated submission ready for the content API
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub kind: EntityKind,
    pub mode: DraftMode,
    pub body: Value,
}

impl Draft {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            mode: DraftMode::Create,
            step: 0,
            furthest: 0,
            values: Values::new(),
            updated_at: Utc::now(),
        }
    }

    /// Start editing an existing record, prefilled from its stored fields
    ///
    /// Every step of an existing record is reachable immediately.
    pub fn for_record(kind: EntityKind, id: Id, record: &Value) -> Self {
        let spec = kind.wizard();
        Self {
            mode: DraftMode::Edit(id),
            furthest: spec.review_index(),
            values: values_from_record(spec, record),
            ..Self::new(kind)
        }
    }

    pub fn spec(&self) -> &'static WizardSpec {
        self.kind.wizard()
    }

    pub fn is_review(&self) -> bool {
        self.step >= self.spec().review_index()
    }

    /// The step being edited, `None` on the review page
    pub fn current_step(&self) -> Option<&'static StepSpec> {
        self.spec().steps.get(self.step)
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or_default()
    }

    /// Store the current step's input, validate it and move forward
    ///
    /// On failure the input is kept and the step does not change.
    pub fn advance(&mut self, input: &Values, options: &Options) -> Result<(), FieldErrors> {
        let Some(step) = self.current_step() else {
            return Ok(());
        };
        self.merge(step, input);

        let errors = validate_step(step, &self.values, options);
        if !errors.is_empty() {
            return Err(errors);
        }

        self.step += 1;
        self.furthest = self.furthest.max(self.step);
        self.touch();
        Ok(())
    }

    /// Keep the current step's input without validating or moving
    pub fn store_input(&mut self, input: &Values) {
        if let Some(step) = self.current_step() {
            self.merge(step, input);
        }
        self.touch();
    }

    /// Keep the current step's input and go back one step without validating
    pub fn back(&mut self, input: &Values) {
        self.store_input(input);
        self.step = self.step.saturating_sub(1);
    }

    /// Jump to a step already reached
    pub fn goto(&mut self, step: usize) -> Result<(), WizardError> {
        if step > self.furthest {
            return Err(WizardError::StepLocked(step));
        }
        self.step = step;
        self.touch();
        Ok(())
    }

    /// Revalidate everything and build the payload
    ///
    /// Only allowed from the review page with the confirmation checked. If an
    /// earlier step no longer validates the draft is moved back to it.
    pub fn submit(&mut self, confirmed: bool, options: &Options) -> Result<Submission, WizardError> {
        if !self.is_review() {
            return Err(WizardError::NotOnReview);
        }
        if !confirmed {
            return Err(WizardError::NotConfirmed);
        }

        for (index, step) in self.spec().steps.iter().enumerate() {
            let errors = validate_step(step, &self.values, options);
            if !errors.is_empty() {
                self.step = index;
                return Err(WizardError::StepInvalid { step: index, errors });
            }
        }

        Ok(Submission {
            kind: self.kind,
            mode: self.mode,
            body: build_payload(self.spec(), &self.values),
        })
    }

    /// Rows for the review page
    pub fn review(&self, options: &Options, locale: Locale) -> Vec<ReviewSection> {
        self.spec()
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| ReviewSection {
                step: index,
                title: step.title(locale).to_string(),
                rows: step
                    .fields
                    .iter()
                    .map(|field| {
                        let raw = self.value(field.name).trim();
                        let display = match field.kind {
                            FieldKind::Select(source) => options
                                .get(&source)
                                .and_then(|opts| opts.iter().find(|o| o.value == raw))
                                .map(|o| o.label.clone())
                                .unwrap_or_else(|| raw.to_string()),
                            FieldKind::Checkbox => is_checked(raw).to_string(),
                            _ => raw.to_string(),
                        };
                        ReviewRow {
                            name: field.name,
                            label: field.label(locale),
                            widget: field.kind.widget(),
                            lines: if field.kind == FieldKind::Lines {
                                raw.lines()
                                    .map(str::trim)
                                    .filter(|l| !l.is_empty())
                                    .map(str::to_string)
                                    .collect()
                            } else {
                                Vec::new()
                            },
                            value: display,
                        }
                    })
                    .collect(),
            })
            .collect()
    }

    fn merge(&mut self, step: &StepSpec, input: &Values) {
        for field in step.fields {
            match (field.kind, input.get(field.name)) {
                (_, Some(value)) => {
                    self.values.insert(field.name.to_string(), value.clone());
                }
                // unchecked boxes are not submitted
                (FieldKind::Checkbox, None) => {
                    self.values.insert(field.name.to_string(), String::new());
                }
                // no new file keeps the stored one
                (_, None) => {}
            }
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewSection {
    pub step: usize,
    pub title: String,
    pub rows: Vec<ReviewRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewRow {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: &'static str,
    pub value: String,
    pub lines: Vec<String>,
}
