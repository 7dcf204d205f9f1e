use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{within_column, CheckRequest, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date >= now
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct CreateEventRequest {
    #[validate(
        length(min = 1, message = "Title is required"),
        custom(function = "within_column")
    )]
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    #[validate(custom(function = "within_column"))]
    pub location: String,
}

impl CheckRequest for CreateEventRequest {
    const FIELDS: &'static [&'static str] = &["title", "location"];
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, message = "Title is required"),
        custom(function = "within_column")
    )]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "within_column"))]
    pub location: Option<String>,
}

impl CheckRequest for UpdateEventRequest {
    const FIELDS: &'static [&'static str] = &["title", "location"];

    fn check_form(&self, errors: &mut ValidationErrors) {
        if self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
        {
            errors.add("event", "Nothing to update");
        }
    }
}
