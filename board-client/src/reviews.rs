use crate::api::BoardApi;
use crate::auth::TokenSource;
use crate::cache::{QueryCache, QueryKey, GET_TOKEN, REVIEWS};
use crate::models::{CreateReviewRequest, NewReview};
use crate::mutation::MutationOutcome;
use crate::notify::{Alert, Notifier};
use std::convert::Infallible;

/// Form state bound to one post and one author. Content is not validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewForm {
    review: NewReview,
}

impl ReviewForm {
    pub fn new(post_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            review: NewReview {
                content: String::new(),
                post: post_id.into(),
                user: user_id.into(),
            },
        }
    }

    pub fn review(&self) -> &NewReview {
        &self.review
    }

    pub fn content(&self) -> &str {
        &self.review.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.review.content = content.into();
    }

    pub fn request(&self, token: Option<String>) -> CreateReviewRequest {
        CreateReviewRequest {
            review: self.review.clone(),
            token,
            id: self.review.post.clone(),
        }
    }
}

/// The stored token, read through the `getToken` cache partition.
pub async fn cached_token(cache: &QueryCache, source: &dyn TokenSource) -> Option<String> {
    let token: Result<Option<String>, Infallible> = cache
        .fetch(QueryKey::new(GET_TOKEN), move || async move { Ok(source.read_token()) })
        .await;
    token.unwrap_or_else(|never| match never {})
}

pub struct ReviewActions<'a, A: BoardApi + ?Sized, N: Notifier + ?Sized> {
    api: &'a A,
    notifier: &'a N,
    cache: &'a QueryCache,
}

impl<'a, A: BoardApi + ?Sized, N: Notifier + ?Sized> ReviewActions<'a, A, N> {
    pub fn new(api: &'a A, notifier: &'a N, cache: &'a QueryCache) -> Self {
        Self {
            api,
            notifier,
            cache,
        }
    }

    /// Sends the form as-is. Success invalidates the reviews partition.
    pub async fn submit(&self, form: &ReviewForm, token: Option<String>) -> MutationOutcome {
        let req = form.request(token);

        match self.api.create_review(&req).await {
            Ok(res) => {
                tracing::info!("Review added to post {}", req.id);
                self.notifier.alert(&Alert::success("Success", &res.msg));
                self.cache.invalidate(REVIEWS);
                MutationOutcome::Succeeded(res.msg)
            }
            Err(e) => {
                tracing::warn!("Failed to add review to post {}: {}", req.id, e);
                let msg = e.user_message();
                self.notifier.alert(&Alert::error("Oops...", &msg));
                MutationOutcome::Failed(msg)
            }
        }
    }
}
