//! In-memory fakes shared by the unit tests.

use crate::api::BoardApi;
use crate::error::ApiError;
use crate::models::*;
use crate::notify::{Alert, Confirmation, Notifier};
use async_trait::async_trait;
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    CommentsForPost(String),
    UpdateComment(UpdateCommentRequest),
    DeleteComment(DeleteCommentRequest),
    ReviewsForPost(String),
    CreateReview(CreateReviewRequest),
}

/// Records every call and answers mutations with a canned `{ msg }` or rejection.
pub struct FakeApi {
    pub calls: RefCell<Vec<ApiCall>>,
    reply: Result<String, (u16, String)>,
}

impl FakeApi {
    pub fn accepting(msg: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            reply: Ok(msg.to_string()),
        }
    }

    pub fn rejecting(status: u16, msg: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            reply: Err((status, msg.to_string())),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    fn answer(&self, call: ApiCall) -> Result<MessageResponse, ApiError> {
        self.calls.borrow_mut().push(call);
        match &self.reply {
            Ok(msg) => Ok(MessageResponse { msg: msg.clone() }),
            Err((status, msg)) => Err(ApiError::Rejected {
                status: *status,
                msg: msg.clone(),
            }),
        }
    }
}

#[async_trait(?Send)]
impl BoardApi for FakeApi {
    async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>, ApiError> {
        self.calls
            .borrow_mut()
            .push(ApiCall::CommentsForPost(post_id.to_string()));
        Ok(Vec::new())
    }

    async fn update_comment(
        &self,
        req: &UpdateCommentRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.answer(ApiCall::UpdateComment(req.clone()))
    }

    async fn delete_comment(
        &self,
        req: &DeleteCommentRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.answer(ApiCall::DeleteComment(req.clone()))
    }

    async fn reviews_for_post(&self, post_id: &str) -> Result<Vec<Review>, ApiError> {
        self.calls
            .borrow_mut()
            .push(ApiCall::ReviewsForPost(post_id.to_string()));
        Ok(Vec::new())
    }

    async fn create_review(&self, req: &CreateReviewRequest) -> Result<MessageResponse, ApiError> {
        self.answer(ApiCall::CreateReview(req.clone()))
    }
}

/// Answers every confirmation the same way and keeps the alerts it was shown.
pub struct RecordingNotifier {
    accept: bool,
    pub confirmations: RefCell<Vec<Confirmation>>,
    pub alerts: RefCell<Vec<Alert>>,
}

impl RecordingNotifier {
    pub fn answering(accept: bool) -> Self {
        Self {
            accept,
            confirmations: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
        }
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Notifier for RecordingNotifier {
    async fn confirm(&self, confirmation: &Confirmation) -> bool {
        self.confirmations.borrow_mut().push(confirmation.clone());
        self.accept
    }

    fn alert(&self, alert: &Alert) {
        self.alerts.borrow_mut().push(alert.clone());
    }
}
