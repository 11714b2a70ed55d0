use async_trait::async_trait;
use reqwest::Client;

use lingo_core::model::{Language, Lesson, LessonId};

use crate::api::{
    BackendError, CompletionPayload, DashboardPayload, HeartsPayload, LessonPayload,
    LingoBackend, LoseHeartPayload,
};

/// `LingoBackend` over HTTP/JSON.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        lang: Option<Language>,
    ) -> Result<T, BackendError> {
        let mut request = self.client.get(self.url(path));
        if let Some(lang) = lang {
            request = request.query(&[("lang", lang.name())]);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        lang: Option<Language>,
    ) -> Result<T, BackendError> {
        let mut request = self.client.post(self.url(path));
        if let Some(lang) = lang {
            request = request.query(&[("lang", lang.name())]);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl LingoBackend for HttpBackend {
    async fn dashboard(&self, lang: Language) -> Result<DashboardPayload, BackendError> {
        self.get_json("lessons", Some(lang)).await
    }

    async fn hearts(&self) -> Result<HeartsPayload, BackendError> {
        self.get_json("hearts", None).await
    }

    async fn lose_heart(&self) -> Result<LoseHeartPayload, BackendError> {
        self.post_json("lose_heart", None).await
    }

    async fn lesson(&self, id: LessonId, lang: Language) -> Result<Lesson, BackendError> {
        let payload: LessonPayload = self
            .get_json(&format!("lesson/{id}"), Some(lang))
            .await
            .map_err(|err| match err {
                BackendError::HttpStatus(status) if status == reqwest::StatusCode::NOT_FOUND => {
                    BackendError::LessonNotFound(id)
                }
                other => other,
            })?;
        Ok(payload.into_lesson()?)
    }

    async fn complete_lesson(
        &self,
        id: LessonId,
        lang: Language,
    ) -> Result<CompletionPayload, BackendError> {
        self.post_json(&format!("complete_lesson/{id}"), Some(lang))
            .await
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
