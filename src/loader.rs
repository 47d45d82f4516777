use crate::api::{fetch_object, ObjectId};
use crate::config::Config;
use crate::i18n::Language;
use crate::page::{CommitOutcome, Cycle, ObjectPage};
use crate::translation::{translate_record, TranslatedObjectRecord};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Runs fetch + translate cycles against the catalog API.
#[derive(Debug, Clone)]
pub struct DetailLoader {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl DetailLoader {
    pub fn new(client: reqwest::Client, config: Arc<Config>) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch an object and translate its text fields into `language`.
    pub async fn load(&self, id: &ObjectId, language: Language) -> Result<TranslatedObjectRecord> {
        let record = fetch_object(&self.client, &self.config, id).await?;
        info!("Fetched object {}, translating to {}", id, language.code());
        Ok(translate_record(&self.client, &self.config, &record, language).await)
    }

    /// Run `cycle` to completion and commit its result to `page`.
    ///
    /// Returns `None` when the object could not be fetched; the page then
    /// stays in its loading state.
    pub async fn run_cycle(
        &self,
        page: &Mutex<ObjectPage>,
        cycle: Cycle,
    ) -> Option<CommitOutcome> {
        match self.load(&cycle.object_id, cycle.language).await {
            Ok(object) => Some(page.lock().await.commit(&cycle, object)),
            Err(e) => {
                error!("Failed to fetch object detail {}: {:#}", cycle.object_id, e);
                None
            }
        }
    }

    /// Build a page for `id` in `language` and run its first cycle.
    pub async fn load_page(&self, id: ObjectId, language: Language) -> ObjectPage {
        let page = Mutex::new(ObjectPage::new(id, language));
        let cycle = page.lock().await.begin_cycle();
        self.run_cycle(&page, cycle).await;
        page.into_inner()
    }
}
