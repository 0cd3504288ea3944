use crate::api::BoardApi;
use crate::auth::{AuthContext, Session};
use crate::cache::{QueryCache, COMMENTS};
use crate::models::{Comment, CommentPatch, DeleteCommentRequest, UpdateCommentRequest, UserRef};
use crate::mutation::MutationOutcome;
use crate::notify::{Alert, Confirmation, Notifier};
use chrono::{DateTime, Utc};

pub const DELETE_CONFIRMATION_MESSAGE: &str =
    "Are you sure you want to delete this comment? This action cannot be undone.";

pub fn delete_confirmation() -> Confirmation {
    Confirmation {
        title: "Are you sure?".to_string(),
        text: DELETE_CONFIRMATION_MESSAGE.to_string(),
        confirm_label: "Yes, delete it!".to_string(),
        cancel_label: "Cancel".to_string(),
    }
}

/// Strict id equality. A populated owner object never matches the decoded id.
pub fn is_owner(comment: &Comment, session: &Session) -> bool {
    match &comment.user {
        UserRef::Id(id) => id == session.user_id(),
        UserRef::Populated(_) => false,
    }
}

/// Transient per-comment UI flags; both start closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommentState {
    pub editing: bool,
    pub dropdown_open: bool,
}

impl CommentState {
    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
        self.dropdown_open = false;
    }

    pub fn stop_editing(&mut self) {
        self.editing = false;
    }
}

/// What the comment unit may show to the current viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentView<'a> {
    pub comment: &'a Comment,
    pub token: &'a str,
    pub can_manage: bool,
}

/// `None` means the unit renders nothing: there is no live session.
pub fn resolve_view<'a>(
    comment: &'a Comment,
    auth: &'a AuthContext,
    now: DateTime<Utc>,
) -> Option<CommentView<'a>> {
    let Some(session) = auth.session_at(now) else {
        tracing::debug!(
            "Decoded user not available, comment {} is not rendered",
            comment.id
        );
        return None;
    };

    Some(CommentView {
        comment,
        token: session.token(),
        can_manage: is_owner(comment, session),
    })
}

/// Edit and delete flows for a single comment.
pub struct CommentActions<'a, A: BoardApi + ?Sized, N: Notifier + ?Sized> {
    api: &'a A,
    notifier: &'a N,
    cache: &'a QueryCache,
}

impl<'a, A: BoardApi + ?Sized, N: Notifier + ?Sized> CommentActions<'a, A, N> {
    pub fn new(api: &'a A, notifier: &'a N, cache: &'a QueryCache) -> Self {
        Self {
            api,
            notifier,
            cache,
        }
    }

    /// Confirm, then delete. Success invalidates the comments partition.
    pub async fn delete(&self, comment_id: &str, token: &str) -> MutationOutcome {
        if !self.notifier.confirm(&delete_confirmation()).await {
            tracing::debug!("Deletion of comment {} dismissed", comment_id);
            return MutationOutcome::Dismissed;
        }

        let req = DeleteCommentRequest {
            id: comment_id.to_string(),
            token: token.to_string(),
        };

        match self.api.delete_comment(&req).await {
            Ok(res) => {
                tracing::info!("Comment {} deleted", comment_id);
                self.notifier.alert(&Alert::success("Deleted!", &res.msg));
                self.cache.invalidate(COMMENTS);
                MutationOutcome::Succeeded(res.msg)
            }
            Err(e) => {
                tracing::warn!("Failed to delete comment {}: {}", comment_id, e);
                let msg = e.user_message();
                self.notifier.alert(&Alert::error("Oops...", &msg));
                MutationOutcome::Failed(msg)
            }
        }
    }

    pub async fn update(&self, comment_id: &str, token: &str, content: &str) -> MutationOutcome {
        let req = UpdateCommentRequest {
            id: comment_id.to_string(),
            token: token.to_string(),
            comment: CommentPatch {
                content: content.to_string(),
            },
        };

        match self.api.update_comment(&req).await {
            Ok(res) => {
                tracing::info!("Comment {} updated", comment_id);
                self.notifier.alert(&Alert::success("Updated!", &res.msg));
                self.cache.invalidate(COMMENTS);
                MutationOutcome::Succeeded(res.msg)
            }
            Err(e) => {
                tracing::warn!("Failed to update comment {}: {}", comment_id, e);
                let msg = e.user_message();
                self.notifier.alert(&Alert::error("Oops...", &msg));
                MutationOutcome::Failed(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tests::token_for;
    use crate::config::ClientConfig;
    use crate::models::PopulatedUser;
    use crate::notify::AlertKind;
    use crate::testing::{ApiCall, FakeApi, RecordingNotifier};
    use std::cell::Cell;
    use std::rc::Rc;

    fn comment(owner: UserRef) -> Comment {
        Comment {
            id: "c1".into(),
            content: "first!".into(),
            user: owner,
            post: "p1".into(),
        }
    }

    fn signed_in(user_id: &str) -> AuthContext {
        AuthContext::with_session(Session::from_token(token_for(user_id, None)).unwrap())
    }

    fn comments_invalidations(cache: &QueryCache) -> (Rc<Cell<u32>>, crate::cache::Subscription) {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let subscription = cache.subscribe(COMMENTS, move |_| counter.set(counter.get() + 1));
        (hits, subscription)
    }

    #[test]
    fn owner_sees_the_menu() {
        let auth = signed_in("u1");
        let c = comment(UserRef::Id("u1".into()));
        let view = resolve_view(&c, &auth, Utc::now());
        assert!(view.unwrap().can_manage);
    }

    #[test]
    fn other_users_do_not_see_the_menu() {
        let auth = signed_in("u2");
        let c = comment(UserRef::Id("u1".into()));
        let view = resolve_view(&c, &auth, Utc::now());
        assert!(!view.unwrap().can_manage);
    }

    #[test]
    fn populated_owner_never_matches() {
        let auth = signed_in("u1");
        let owner = UserRef::Populated(PopulatedUser {
            id: "u1".into(),
            username: None,
        });
        let c = comment(owner);
        let view = resolve_view(&c, &auth, Utc::now());
        assert!(!view.unwrap().can_manage);
    }

    #[test]
    fn nothing_is_rendered_without_a_session() {
        let auth = AuthContext::anonymous();
        for owner in ["u1", "u2", ""] {
            let c = comment(UserRef::Id(owner.into()));
            assert!(resolve_view(&c, &auth, Utc::now()).is_none());
        }
    }

    #[test]
    fn menu_state_transitions() {
        let mut state = CommentState::default();
        state.toggle_dropdown();
        assert!(state.dropdown_open);
        state.start_editing();
        assert_eq!(
            state,
            CommentState {
                editing: true,
                dropdown_open: false
            }
        );
        state.stop_editing();
        assert_eq!(state, CommentState::default());
    }

    #[tokio::test]
    async fn confirmed_delete_issues_one_request_and_invalidates() {
        let api = FakeApi::accepting("removed");
        let notifier = RecordingNotifier::answering(true);
        let cache = QueryCache::new(&ClientConfig::default());
        let (hits, _subscription) = comments_invalidations(&cache);

        let outcome = CommentActions::new(&api, &notifier, &cache)
            .delete("c1", "t1")
            .await;

        assert_eq!(outcome, MutationOutcome::Succeeded("removed".into()));
        assert_eq!(
            api.calls(),
            vec![ApiCall::DeleteComment(DeleteCommentRequest {
                id: "c1".into(),
                token: "t1".into(),
            })]
        );
        assert_eq!(hits.get(), 1);
        assert_eq!(notifier.alerts(), vec![Alert::success("Deleted!", "removed")]);
        assert_eq!(notifier.confirmations.borrow()[0], delete_confirmation());
    }

    #[tokio::test]
    async fn dismissed_delete_issues_nothing() {
        let api = FakeApi::accepting("removed");
        let notifier = RecordingNotifier::answering(false);
        let cache = QueryCache::new(&ClientConfig::default());
        let (hits, _subscription) = comments_invalidations(&cache);

        let outcome = CommentActions::new(&api, &notifier, &cache)
            .delete("c1", "t1")
            .await;

        assert_eq!(outcome, MutationOutcome::Dismissed);
        assert!(api.calls().is_empty());
        assert!(notifier.alerts().is_empty());
        assert_eq!(hits.get(), 0);
    }

    #[tokio::test]
    async fn rejected_delete_alerts_server_message() {
        let api = FakeApi::rejecting(403, "not yours");
        let notifier = RecordingNotifier::answering(true);
        let cache = QueryCache::new(&ClientConfig::default());
        let (hits, _subscription) = comments_invalidations(&cache);

        let outcome = CommentActions::new(&api, &notifier, &cache)
            .delete("c1", "t1")
            .await;

        assert_eq!(outcome, MutationOutcome::Failed("not yours".into()));
        let alerts = notifier.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::Error);
        assert_eq!(alerts[0].text, "not yours");
        assert_eq!(hits.get(), 0);
    }

    #[tokio::test]
    async fn update_sends_patch_and_invalidates() {
        let api = FakeApi::accepting("updated");
        let notifier = RecordingNotifier::answering(true);
        let cache = QueryCache::new(&ClientConfig::default());
        let (hits, _subscription) = comments_invalidations(&cache);

        let outcome = CommentActions::new(&api, &notifier, &cache)
            .update("c1", "t1", "edited")
            .await;

        assert_eq!(outcome, MutationOutcome::Succeeded("updated".into()));
        assert_eq!(
            api.calls(),
            vec![ApiCall::UpdateComment(UpdateCommentRequest {
                id: "c1".into(),
                token: "t1".into(),
                comment: CommentPatch {
                    content: "edited".into()
                },
            })]
        );
        assert_eq!(hits.get(), 1);
        assert!(notifier.confirmations.borrow().is_empty());
    }
}
