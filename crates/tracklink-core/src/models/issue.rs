//! Issue data model with change tracking

use crate::changes::{self, UpdateFieldDirective};
use crate::models::{is_custom_field_id, CustomField, NamedValue};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Values of the tracked issue fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFields {
    pub created: Option<NaiveDateTime>,
    pub updated: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
    pub priority: Option<NamedValue>,
    pub resolution: Option<NamedValue>,
    pub key: Option<NamedValue>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub environment: Option<String>,
    pub project: Option<String>,
    pub reporter: Option<String>,
    pub status: Option<NamedValue>,
    pub issue_type: Option<NamedValue>,
}

/// Custom field values as loaded from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFieldValue {
    pub id: String,
    pub values: Vec<String>,
}

/// An issue as seen by the caller.
///
/// Holds the live field values alongside a snapshot of the values the issue
/// was constructed with. The snapshot is never modified; [`Issue::get_updated_fields`]
/// compares the two to find what the caller changed.
#[derive(Debug, Clone, Default)]
pub struct Issue {
    fields: IssueFields,
    origin: IssueFields,
    custom_fields: Vec<CustomFieldValue>,
    overrides: Vec<UpdateFieldDirective>,
}

impl Issue {
    /// Create a new issue with no server counterpart
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an issue whose snapshot equals the given values
    pub(crate) fn from_origin(fields: IssueFields, custom_fields: Vec<CustomFieldValue>) -> Self {
        Self {
            origin: fields.clone(),
            fields,
            custom_fields,
            overrides: Vec::new(),
        }
    }

    /// Live field values
    pub fn fields(&self) -> &IssueFields {
        &self.fields
    }

    pub fn created(&self) -> Option<NaiveDateTime> {
        self.fields.created
    }

    pub fn updated(&self) -> Option<NaiveDateTime> {
        self.fields.updated
    }

    pub fn due_date(&self) -> Option<NaiveDateTime> {
        self.fields.due_date
    }

    pub fn key(&self) -> Option<&NamedValue> {
        self.fields.key.as_ref()
    }

    pub fn priority(&self) -> Option<&NamedValue> {
        self.fields.priority.as_ref()
    }

    pub fn resolution(&self) -> Option<&NamedValue> {
        self.fields.resolution.as_ref()
    }

    pub fn status(&self) -> Option<&NamedValue> {
        self.fields.status.as_ref()
    }

    pub fn issue_type(&self) -> Option<&NamedValue> {
        self.fields.issue_type.as_ref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.fields.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.fields.description.as_deref()
    }

    pub fn assignee(&self) -> Option<&str> {
        self.fields.assignee.as_deref()
    }

    pub fn environment(&self) -> Option<&str> {
        self.fields.environment.as_deref()
    }

    pub fn project(&self) -> Option<&str> {
        self.fields.project.as_deref()
    }

    pub fn reporter(&self) -> Option<&str> {
        self.fields.reporter.as_deref()
    }

    pub fn set_due_date(&mut self, due_date: Option<NaiveDateTime>) {
        self.fields.due_date = due_date;
    }

    /// Set the due date from a `YYYY-MM-DD` string
    pub fn set_due_date_str(&mut self, due_date: &str) -> Result<()> {
        let date = NaiveDate::parse_from_str(due_date.trim(), "%Y-%m-%d").map_err(|_| {
            Error::Validation(format!(
                "Invalid due date '{}', expected YYYY-MM-DD",
                due_date
            ))
        })?;
        self.fields.due_date = Some(date.and_time(chrono::NaiveTime::MIN));
        Ok(())
    }

    pub fn set_priority<V: Into<NamedValue>>(&mut self, priority: Option<V>) {
        self.fields.priority = priority.map(Into::into);
    }

    pub fn set_resolution<V: Into<NamedValue>>(&mut self, resolution: Option<V>) {
        self.fields.resolution = resolution.map(Into::into);
    }

    pub fn set_status<V: Into<NamedValue>>(&mut self, status: Option<V>) {
        self.fields.status = status.map(Into::into);
    }

    pub fn set_issue_type<V: Into<NamedValue>>(&mut self, issue_type: Option<V>) {
        self.fields.issue_type = issue_type.map(Into::into);
    }

    pub fn set_summary<S: Into<String>>(&mut self, summary: Option<S>) {
        self.fields.summary = summary.map(Into::into);
    }

    pub fn set_description<S: Into<String>>(&mut self, description: Option<S>) {
        self.fields.description = description.map(Into::into);
    }

    pub fn set_assignee<S: Into<String>>(&mut self, assignee: Option<S>) {
        self.fields.assignee = assignee.map(Into::into);
    }

    pub fn set_environment<S: Into<String>>(&mut self, environment: Option<S>) {
        self.fields.environment = environment.map(Into::into);
    }

    pub fn set_project<S: Into<String>>(&mut self, project: Option<S>) {
        self.fields.project = project.map(Into::into);
    }

    pub fn set_reporter<S: Into<String>>(&mut self, reporter: Option<S>) {
        self.fields.reporter = reporter.map(Into::into);
    }

    /// Custom field values loaded with the issue
    pub fn custom_fields(&self) -> &[CustomFieldValue] {
        &self.custom_fields
    }

    /// Loaded values of one custom field
    pub fn custom_field(&self, id: &str) -> Option<&[String]> {
        self.custom_fields
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.values.as_slice())
    }

    /// Queue values for a custom field.
    ///
    /// Custom fields are not change-tracked; every queued field is sent on
    /// the next update. Setting the same field again replaces its values and
    /// keeps its position. Only `customfield_*` ids are accepted; tracked
    /// fields go through their setters.
    pub fn set_custom_field<I, S>(&mut self, id: impl Into<String>, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        if !is_custom_field_id(&id) {
            return Err(Error::Validation(format!(
                "'{}' is not a custom field id",
                id
            )));
        }

        let directive = UpdateFieldDirective::new(id, values);
        match self.overrides.iter_mut().find(|d| d.field == directive.field) {
            Some(existing) => existing.values = directive.values,
            None => self.overrides.push(directive),
        }
        Ok(())
    }

    /// Queue values for a custom field after checking them against its
    /// definition
    pub fn set_custom_field_checked<S: AsRef<str>>(
        &mut self,
        field: &CustomField,
        values: &[S],
    ) -> Result<()> {
        field.validate(values)?;
        self.set_custom_field(
            field.id.clone(),
            values.iter().map(|v| v.as_ref().to_string()),
        )
    }

    /// Queued custom field directives
    pub fn custom_field_overrides(&self) -> &[UpdateFieldDirective] {
        &self.overrides
    }

    /// Directives for every field changed since construction, tracked fields
    /// first in declaration order, then queued custom fields.
    pub fn get_updated_fields(&self) -> Vec<UpdateFieldDirective> {
        let mut directives = changes::detect(&self.fields, &self.origin);
        directives.extend(self.overrides.iter().cloned());
        tracing::debug!(
            tracked = directives.len() - self.overrides.len(),
            custom = self.overrides.len(),
            "Detected issue changes"
        );
        directives
    }

    /// Whether any tracked field or custom field was changed
    pub fn is_dirty(&self) -> bool {
        !self.overrides.is_empty() || !changes::detect(&self.fields, &self.origin).is_empty()
    }
}
