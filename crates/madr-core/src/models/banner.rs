use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{invalid, within_column, CheckRequest, Validate, ValidationErrors};
use validator::ValidationError;

use super::MediaSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerType {
    Image,
    Video,
}

impl BannerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BannerType::Image => "image",
            BannerType::Video => "video",
        }
    }
}

impl std::fmt::Display for BannerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BannerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(BannerType::Image),
            "video" => Ok(BannerType::Video),
            other => Err(format!("unknown banner type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: i64,
    pub title: String,
    pub media_url: String,
    #[serde(rename = "type")]
    pub kind: BannerType,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn media_present(media: &MediaSource) -> Result<(), ValidationError> {
    if media.is_blank() {
        return Err(invalid("media", "A file or media URL is required"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct CreateBannerRequest {
    #[validate(
        length(min = 1, message = "Title is required"),
        custom(function = "within_column")
    )]
    pub title: String,
    pub kind: BannerType,
    #[validate(custom(function = "media_present"))]
    pub media: MediaSource,
}

impl CheckRequest for CreateBannerRequest {
    const FIELDS: &'static [&'static str] = &["title", "media"];
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct UpdateBannerRequest {
    #[validate(
        length(min = 1, message = "Title is required"),
        custom(function = "within_column")
    )]
    pub title: Option<String>,
    pub kind: Option<BannerType>,
    #[validate(custom(function = "media_present"))]
    pub media: Option<MediaSource>,
}

impl CheckRequest for UpdateBannerRequest {
    const FIELDS: &'static [&'static str] = &["title", "media"];

    fn check_form(&self, errors: &mut ValidationErrors) {
        if self.title.is_none() && self.kind.is_none() && self.media.is_none() {
            errors.add("banner", "Nothing to update");
        }
    }
}
