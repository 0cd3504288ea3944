use crate::api::{decode_response, join_url, routes, BoardApi};
use crate::error::ApiError;
use crate::models::*;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("HTTP {} ({} bytes)", status, body.len());
        decode_response(status.as_u16(), &body)
    }
}

#[async_trait(?Send)]
impl BoardApi for HttpClient {
    async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, ApiError> {
        let url = self.url(&routes::post_comments(post_id));
        Self::send(self.client.get(&url)).await
    }

    async fn update_comment(
        &self,
        req: &UpdateCommentRequest,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.url(&routes::comment(&req.id));
        let request = Self::with_token(self.client.put(&url), Some(&req.token)).json(req);
        Self::send(request).await
    }

    async fn delete_comment(
        &self,
        req: &DeleteCommentRequest,
    ) -> Result<MessageResponse, ApiError> {
        let url = self.url(&routes::comment(&req.id));
        let request = Self::with_token(self.client.delete(&url), Some(&req.token)).json(req);
        Self::send(request).await
    }

    async fn reviews_for_post(&self, post_id: &str) -> Result<Vec<Review>, ApiError> {
        let url = self.url(&routes::post_reviews(post_id));
        Self::send(self.client.get(&url)).await
    }

    async fn create_review(&self, req: &CreateReviewRequest) -> Result<MessageResponse, ApiError> {
        let url = self.url(&routes::create_review(&req.id));
        let request = Self::with_token(self.client.post(&url), req.token.as_deref()).json(req);
        Self::send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn message(msg: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({ "msg": msg }))
    }

    #[tokio::test]
    async fn delete_sends_id_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/comments/c1"))
            .and(header("authorization", "Bearer t1"))
            .and(body_json(json!({ "id": "c1", "token": "t1" })))
            .respond_with(message("Comment removed"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri());
        let res = client
            .delete_comment(&DeleteCommentRequest {
                id: "c1".into(),
                token: "t1".into(),
            })
            .await
            .unwrap();

        assert_eq!(res.msg, "Comment removed");
    }

    #[tokio::test]
    async fn update_puts_the_new_content() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/comments/c1"))
            .and(header("authorization", "Bearer t1"))
            .and(body_json(json!({
                "id": "c1",
                "token": "t1",
                "comment": { "content": "edited" }
            })))
            .respond_with(message("Comment updated"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(format!("{}/", server.uri()));
        let res = client
            .update_comment(&UpdateCommentRequest {
                id: "c1".into(),
                token: "t1".into(),
                comment: CommentPatch {
                    content: "edited".into(),
                },
            })
            .await
            .unwrap();

        assert_eq!(res.msg, "Comment updated");
    }

    #[tokio::test]
    async fn create_review_posts_review_token_and_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reviews/p1"))
            .and(header("authorization", "Bearer t1"))
            .and(body_json(json!({
                "review": { "content": "", "post": "p1", "user": "u1" },
                "token": "t1",
                "id": "p1"
            })))
            .respond_with(message("Review added"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri());
        let res = client
            .create_review(&CreateReviewRequest {
                review: NewReview {
                    content: String::new(),
                    post: "p1".into(),
                    user: "u1".into(),
                },
                token: Some("t1".into()),
                id: "p1".into(),
            })
            .await
            .unwrap();

        assert_eq!(res.msg, "Review added");
    }

    #[tokio::test]
    async fn rejection_carries_the_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reviews/p1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "msg": "too long" })))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri());
        let err = client
            .create_review(&CreateReviewRequest {
                review: NewReview {
                    content: "x".repeat(5000),
                    post: "p1".into(),
                    user: "u1".into(),
                },
                token: None,
                id: "p1".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Rejected { status: 400, ref msg } if msg == "too long"
        ));
        assert_eq!(err.user_message(), "too long");
    }

    #[tokio::test]
    async fn comments_are_listed_per_post() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/posts/p1/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "_id": "c1", "content": "hi", "user": "u1", "post": "p1" }
            ])))
            .mount(&server)
            .await;

        let client = HttpClient::new(server.uri());
        let comments = client.comments_for_post("p1").await.unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].user, UserRef::Id("u1".into()));
    }
}
