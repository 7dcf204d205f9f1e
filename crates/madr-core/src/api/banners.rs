//! Banner accessors. Create and update are multipart forms carrying either
//! the uploaded media file or an existing `media_url`.

use reqwest::multipart::Form;

use crate::models::{Banner, CreateBannerRequest, MediaSource, UpdateBannerRequest};
use crate::validation::CheckRequest;

use super::envelope::{Envelope, Page, PageQuery};
use super::upload::media_part;
use super::{ApiClient, ApiError};

const PUBLIC_PATH: &str = "/banners";
const ADMIN_PATH: &str = "/admin/banners";

pub struct BannersApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn banners(&self) -> BannersApi<'_> {
        BannersApi { client: self }
    }
}

fn with_media(form: Form, media: &MediaSource) -> Result<Form, ApiError> {
    Ok(match media {
        MediaSource::File(file) => form.part("file", media_part(file)?),
        MediaSource::Url(url) => form.text("media_url", url.clone()),
    })
}

impl BannersApi<'_> {
    pub async fn list(&self, query: &PageQuery) -> Result<Page<Banner>, ApiError> {
        self.client.get(PUBLIC_PATH, &query.paging_params()).await
    }

    pub async fn get(&self, id: i64) -> Result<Banner, ApiError> {
        let envelope: Envelope<Banner> = self
            .client
            .get(&format!("{}/{}", PUBLIC_PATH, id), &[])
            .await?;
        envelope.into_data("banner")
    }

    pub async fn create(&self, request: &CreateBannerRequest) -> Result<Banner, ApiError> {
        request.check()?;
        let form = Form::new()
            .text("title", request.title.clone())
            .text("type", request.kind.as_str());
        let form = with_media(form, &request.media)?;
        let envelope: Envelope<Banner> = self.client.post_multipart(ADMIN_PATH, form).await?;
        envelope.into_data("banner")
    }

    pub async fn update(&self, id: i64, request: &UpdateBannerRequest) -> Result<Banner, ApiError> {
        request.check()?;
        let mut form = Form::new();
        if let Some(ref title) = request.title {
            form = form.text("title", title.clone());
        }
        if let Some(kind) = request.kind {
            form = form.text("type", kind.as_str());
        }
        if let Some(ref media) = request.media {
            form = with_media(form, media)?;
        }
        let envelope: Envelope<Banner> = self
            .client
            .put_multipart(&format!("{}/{}", ADMIN_PATH, id), form)
            .await?;
        envelope.into_data("banner")
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", ADMIN_PATH, id)).await
    }
}
