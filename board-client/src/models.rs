use serde::{Deserialize, Serialize};

// ==================== Комментарии ====================

/// Owner reference as the backend sends it: a bare id, or the populated user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Populated(PopulatedUser),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatedUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub user: UserRef,
    pub post: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentPatch {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteCommentRequest {
    pub id: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    pub id: String,
    pub token: String,
    pub comment: CommentPatch,
}

// ==================== Отзывы ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    pub post: String,
    pub user: UserRef,
}

/// Review form state before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub content: String,
    pub post: String,
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub review: NewReview,
    pub token: Option<String>,
    pub id: String,
}

// ==================== Общие ответы ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn comment_accepts_plain_and_populated_owner() {
        let plain: Comment = serde_json::from_value(json!({
            "_id": "c1", "content": "hi", "user": "u1", "post": "p1"
        }))
        .unwrap();
        assert_eq!(plain.user, UserRef::Id("u1".into()));

        let populated: Comment = serde_json::from_value(json!({
            "_id": "c2", "content": "hi", "user": { "_id": "u1", "username": "ann" }, "post": "p1"
        }))
        .unwrap();
        assert!(matches!(populated.user, UserRef::Populated(ref u) if u.id == "u1"));
    }

    #[test]
    fn create_review_request_has_wire_shape() {
        let req = CreateReviewRequest {
            review: NewReview {
                content: String::new(),
                post: "p1".into(),
                user: "u1".into(),
            },
            token: Some("t1".into()),
            id: "p1".into(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "review": { "content": "", "post": "p1", "user": "u1" },
                "token": "t1",
                "id": "p1"
            })
        );
    }
}
