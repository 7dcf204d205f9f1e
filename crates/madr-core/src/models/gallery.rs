use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{invalid, within_column, CheckRequest, Validate};
use validator::ValidationError;

use super::MediaSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: i64,
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn image_present(image: &MediaSource) -> Result<(), ValidationError> {
    if image.is_blank() {
        return Err(invalid("image", "An image file or URL is required"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreateGalleryRequest {
    #[validate(
        length(min = 1, message = "Title is required"),
        custom(function = "within_column")
    )]
    pub title: String,
    #[validate(custom(function = "image_present"))]
    pub image: MediaSource,
}

impl CheckRequest for CreateGalleryRequest {
    const FIELDS: &'static [&'static str] = &["title", "image"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UploadFile;

    #[test]
    fn test_create_gallery_validation() {
        let ok = CreateGalleryRequest {
            title: "Buka bersama".into(),
            image: MediaSource::File(UploadFile::new("a.png", vec![0x89])),
        };
        assert!(ok.check().is_ok());

        let bad = CreateGalleryRequest {
            title: String::new(),
            image: MediaSource::Url(String::new()),
        };
        let errors = bad.check().unwrap_err();
        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "image"]);
    }
}
