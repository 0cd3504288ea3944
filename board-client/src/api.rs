use crate::error::ApiError;
use crate::models::*;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Remote operations of the board backend. Implemented over `reqwest` natively and
/// over `gloo-net` in the browser.
#[async_trait(?Send)]
pub trait BoardApi {
    async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, ApiError>;

    async fn update_comment(&self, req: &UpdateCommentRequest)
        -> Result<MessageResponse, ApiError>;

    async fn delete_comment(&self, req: &DeleteCommentRequest)
        -> Result<MessageResponse, ApiError>;

    async fn reviews_for_post(&self, post_id: &str) -> Result<Vec<Review>, ApiError>;

    async fn create_review(&self, req: &CreateReviewRequest) -> Result<MessageResponse, ApiError>;
}

pub mod routes {
    pub fn post_comments(post_id: &str) -> String {
        format!("/api/posts/{}/comments", post_id)
    }

    pub fn comment(comment_id: &str) -> String {
        format!("/api/comments/{}", comment_id)
    }

    pub fn post_reviews(post_id: &str) -> String {
        format!("/api/posts/{}/reviews", post_id)
    }

    pub fn create_review(post_id: &str) -> String {
        format!("/api/reviews/{}", post_id)
    }
}

pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Turns a status + body pair into the typed success value or an [`ApiError`].
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| {
            tracing::warn!("Unexpected success body (HTTP {}): {}", status, e);
            ApiError::Malformed {
                status,
                body: body.to_string(),
            }
        });
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => Err(ApiError::Rejected {
            status,
            msg: err.msg,
        }),
        Err(_) => Err(ApiError::Malformed {
            status,
            body: body.to_string(),
        }),
    }
}
