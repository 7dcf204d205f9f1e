use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{invalid, within_column, CheckRequest, Validate};
use validator::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutContent {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub additional_description: Option<String>,
    /// JSON-encoded array of image URLs. Older records hold a bare URL.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub years_active: Option<i64>,
    #[serde(default)]
    pub active_members: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AboutContent {
    pub fn images(&self) -> Vec<String> {
        self.image_url.as_deref().map(parse_image_list).unwrap_or_default()
    }
}

/// Decode the `image_url` column into a list of image URLs.
///
/// A JSON array keeps its non-blank string entries, a JSON string becomes a
/// one-element list, and anything that is not JSON at all is taken as a
/// single raw URL.
pub fn parse_image_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        Ok(serde_json::Value::String(s)) if !s.trim().is_empty() => vec![s],
        Ok(_) => Vec::new(),
        Err(_) => vec![raw.to_string()],
    }
}

/// Encode an image list the way the admin console stores it. An empty
/// list is stored as an empty string.
pub fn encode_image_list(images: &[String]) -> String {
    let kept: Vec<&str> = images
        .iter()
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .collect();
    if kept.is_empty() {
        return String::new();
    }
    serde_json::Value::from(kept).to_string()
}

/// The about page shows at most this many images.
pub const MAX_ABOUT_IMAGES: usize = 3;

fn image_count(raw: &str) -> Result<(), ValidationError> {
    if parse_image_list(raw).len() > MAX_ABOUT_IMAGES {
        return Err(invalid("image_count", "At most 3 images"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct UpdateAboutRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(
        length(min = 1, message = "Title is required"),
        custom(function = "within_column")
    )]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "image_count"))]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Years active cannot be negative"))]
    pub years_active: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Active members cannot be negative"))]
    pub active_members: Option<i64>,
}

impl UpdateAboutRequest {
    pub fn with_images(mut self, images: &[String]) -> Self {
        self.image_url = Some(encode_image_list(images));
        self
    }
}

impl CheckRequest for UpdateAboutRequest {
    const FIELDS: &'static [&'static str] =
        &["title", "image_url", "years_active", "active_members"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_list_array() {
        let images = parse_image_list(r#"["a.jpg", "", "b.jpg", 3]"#);
        assert_eq!(images, vec!["a.jpg".to_string(), "b.jpg".to_string()]);
    }

    #[test]
    fn test_parse_image_list_bare_string_falls_back() {
        assert_eq!(
            parse_image_list("uploads/masjid.jpg"),
            vec!["uploads/masjid.jpg".to_string()]
        );
        assert_eq!(
            parse_image_list(r#""masjid.jpg""#),
            vec!["masjid.jpg".to_string()]
        );
        assert!(parse_image_list("   ").is_empty());
        assert!(parse_image_list("{}").is_empty());
    }

    #[test]
    fn test_about_images_from_record() {
        let json = r#"{"id":1,"title":"Tentang Kami","image_url":"http://cdn/foto.jpg","years_active":12}"#;
        let about: AboutContent = serde_json::from_str(json).expect("valid about");
        assert_eq!(about.images(), vec!["http://cdn/foto.jpg".to_string()]);
        assert_eq!(about.subtitle, None);
    }

    #[test]
    fn test_with_images_encodes_array() {
        let req = UpdateAboutRequest::default()
            .with_images(&["a.jpg".to_string(), " ".to_string(), "b.jpg".to_string()]);
        assert_eq!(req.image_url.as_deref(), Some(r#"["a.jpg","b.jpg"]"#));
        assert_eq!(parse_image_list(req.image_url.as_deref().unwrap_or_default()).len(), 2);
    }

    #[test]
    fn test_update_rejects_too_many_images() {
        let images: Vec<String> = (1..=4).map(|i| format!("{}.jpg", i)).collect();
        let req = UpdateAboutRequest::default().with_images(&images);
        let errors = req.check().unwrap_err();
        assert_eq!(errors.for_field("image_url"), Some("At most 3 images"));
    }

    #[test]
    fn test_update_rejects_negative_counts() {
        let req = UpdateAboutRequest {
            years_active: Some(-1),
            active_members: Some(40),
            ..Default::default()
        };
        let errors = req.check().unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(
            errors.for_field("years_active"),
            Some("Years active cannot be negative")
        );
    }

    #[test]
    fn test_removing_every_image_stores_empty_string() {
        let req = UpdateAboutRequest::default().with_images(&[]);
        assert_eq!(req.image_url.as_deref(), Some(""));
        assert!(req.check().is_ok());

        let req = UpdateAboutRequest::default().with_images(&["  ".to_string()]);
        assert_eq!(req.image_url.as_deref(), Some(""));
    }
}
