use async_trait::async_trait;
use board_client::api::{decode_response, join_url, routes, BoardApi};
use board_client::models::*;
use board_client::ApiError;
use gloo_net::http::{Request, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

/// `BoardApi` over the browser's fetch.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        let builder = builder.header("Content-Type", "application/json");
        match token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        body: Option<&impl Serialize>,
    ) -> Result<T, ApiError> {
        let request = match body {
            Some(body) => {
                let body_json = serde_json::to_string(body)?;
                builder
                    .body(body_json)
                    .map_err(|e| ApiError::Transport(format!("Failed to set request body: {}", e)))?
            }
            None => builder
                .build()
                .map_err(|e| ApiError::Transport(format!("Failed to build request: {}", e)))?,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Network error: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response: {}", e)))?;

        log::debug!("HTTP {} from {}", status, response.url());
        decode_response(status, &text)
    }
}

#[async_trait(?Send)]
impl BoardApi for ApiClient {
    async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, ApiError> {
        let builder = Request::get(&self.url(&routes::post_comments(post_id)));
        self.request(builder, None::<&()>).await
    }

    async fn update_comment(
        &self,
        req: &UpdateCommentRequest,
    ) -> Result<MessageResponse, ApiError> {
        let builder = Self::authorized(
            Request::put(&self.url(&routes::comment(&req.id))),
            Some(&req.token),
        );
        self.request(builder, Some(req)).await
    }

    async fn delete_comment(
        &self,
        req: &DeleteCommentRequest,
    ) -> Result<MessageResponse, ApiError> {
        let builder = Self::authorized(
            Request::delete(&self.url(&routes::comment(&req.id))),
            Some(&req.token),
        );
        self.request(builder, Some(req)).await
    }

    async fn reviews_for_post(&self, post_id: &str) -> Result<Vec<Review>, ApiError> {
        let builder = Request::get(&self.url(&routes::post_reviews(post_id)));
        self.request(builder, None::<&()>).await
    }

    async fn create_review(&self, req: &CreateReviewRequest) -> Result<MessageResponse, ApiError> {
        let builder = Self::authorized(
            Request::post(&self.url(&routes::create_review(&req.id))),
            req.token.as_deref(),
        );
        self.request(builder, Some(req)).await
    }
}
