//! Gallery accessors.

use reqwest::multipart::Form;

use crate::models::{CreateGalleryRequest, GalleryItem, MediaSource};
use crate::validation::CheckRequest;

use super::envelope::{Envelope, Page, PageQuery};
use super::upload::media_part;
use super::{ApiClient, ApiError};

const PUBLIC_PATH: &str = "/gallery";
const ADMIN_PATH: &str = "/admin/gallery";

pub struct GalleryApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn gallery(&self) -> GalleryApi<'_> {
        GalleryApi { client: self }
    }
}

impl GalleryApi<'_> {
    pub async fn list(&self, query: &PageQuery) -> Result<Page<GalleryItem>, ApiError> {
        self.client.get(PUBLIC_PATH, &query.paging_params()).await
    }

    pub async fn create(&self, request: &CreateGalleryRequest) -> Result<GalleryItem, ApiError> {
        request.check()?;
        let form = Form::new().text("title", request.title.clone());
        let form = match request.image {
            MediaSource::File(ref file) => form.part("file", media_part(file)?),
            MediaSource::Url(ref url) => form.text("image_url", url.clone()),
        };
        let envelope: Envelope<GalleryItem> = self.client.post_multipart(ADMIN_PATH, form).await?;
        envelope.into_data("gallery item")
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", ADMIN_PATH, id)).await
    }
}
