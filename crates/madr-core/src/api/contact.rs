//! Public contact form.

use serde::de::IgnoredAny;

use crate::models::ContactForm;
use crate::validation::CheckRequest;

use super::{ApiClient, ApiError};

const CONTACT_PATH: &str = "/contact";

pub struct ContactApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn contact(&self) -> ContactApi<'_> {
        ContactApi { client: self }
    }
}

impl ContactApi<'_> {
    pub async fn submit(&self, form: &ContactForm) -> Result<(), ApiError> {
        form.check()?;
        let _: IgnoredAny = self.client.post(CONTACT_PATH, form).await?;
        Ok(())
    }
}
