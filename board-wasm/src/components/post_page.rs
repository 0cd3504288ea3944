use crate::components::{CommentItem, ReviewForm};
use crate::services::Services;
use board_client::cache::{Subscription, COMMENTS, REVIEWS};
use board_client::models::{Comment, Review, UserRef};
use board_client::{ApiError, QueryKey};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct PostPageProps {
    pub post_id: String,
    pub services: Services,
}

pub enum Msg {
    LoadComments,
    CommentsLoaded(Vec<Comment>),
    LoadReviews,
    ReviewsLoaded(Vec<Review>),
    Error(String),
}

/// What the page has received so far. The latest load decides the error banner.
#[derive(Default)]
struct PostData {
    comments: Vec<Comment>,
    reviews: Vec<Review>,
    loading: bool,
    error: Option<String>,
}

impl PostData {
    fn comments_loaded(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
        self.loading = false;
        self.error = None;
    }

    fn reviews_loaded(&mut self, reviews: Vec<Review>) {
        self.reviews = reviews;
        self.error = None;
    }

    fn failed(&mut self, error: String) {
        self.error = Some(error);
        self.loading = false;
    }
}

/// One post's comment thread, its reviews and the review form.
pub struct PostPage {
    data: PostData,
    _subscriptions: [Subscription; 2],
}

fn comments_key(post_id: &str) -> QueryKey {
    QueryKey::scoped(COMMENTS, [post_id])
}

fn reviews_key(post_id: &str) -> QueryKey {
    QueryKey::scoped(REVIEWS, [post_id])
}

impl Component for PostPage {
    type Message = Msg;
    type Properties = PostPageProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let cache = &props.services.cache;

        // Invalidation of either partition triggers a refetch
        let link = ctx.link().clone();
        let on_comments = cache.subscribe(COMMENTS, move |_| link.send_message(Msg::LoadComments));
        let link = ctx.link().clone();
        let on_reviews = cache.subscribe(REVIEWS, move |_| link.send_message(Msg::LoadReviews));

        ctx.link().send_message(Msg::LoadComments);
        ctx.link().send_message(Msg::LoadReviews);

        Self {
            data: PostData {
                comments: cache.cached(&comments_key(&props.post_id)).unwrap_or_default(),
                reviews: cache.cached(&reviews_key(&props.post_id)).unwrap_or_default(),
                loading: true,
                error: None,
            },
            _subscriptions: [on_comments, on_reviews],
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::LoadComments => {
                let services = ctx.props().services.clone();
                let post_id = ctx.props().post_id.clone();
                let link = ctx.link().clone();

                spawn_local(async move {
                    let api = services.api.clone();
                    let result: Result<Vec<Comment>, ApiError> = services
                        .cache
                        .fetch(comments_key(&post_id), || async move {
                            api.comments_for_post(&post_id).await
                        })
                        .await;
                    match result {
                        Ok(comments) => link.send_message(Msg::CommentsLoaded(comments)),
                        Err(e) => link.send_message(Msg::Error(e.user_message())),
                    }
                });

                false
            }

            Msg::CommentsLoaded(comments) => {
                self.data.comments_loaded(comments);
                true
            }

            Msg::LoadReviews => {
                let services = ctx.props().services.clone();
                let post_id = ctx.props().post_id.clone();
                let link = ctx.link().clone();

                spawn_local(async move {
                    let api = services.api.clone();
                    let result: Result<Vec<Review>, ApiError> = services
                        .cache
                        .fetch(reviews_key(&post_id), || async move {
                            api.reviews_for_post(&post_id).await
                        })
                        .await;
                    match result {
                        Ok(reviews) => link.send_message(Msg::ReviewsLoaded(reviews)),
                        Err(e) => link.send_message(Msg::Error(e.user_message())),
                    }
                });

                false
            }

            Msg::ReviewsLoaded(reviews) => {
                self.data.reviews_loaded(reviews);
                true
            }

            Msg::Error(e) => {
                log::error!("Failed to load post {}: {}", ctx.props().post_id, e);
                self.data.failed(e);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let viewer = props
            .services
            .auth()
            .session()
            .map(|session| session.user_id().to_string());

        html! {
            <div class="post-page">
                if let Some(error) = &self.data.error {
                    <div class="alert alert-danger">{ format!("Error: {}", error) }</div>
                }

                <h3>{ "Comments" }</h3>
                if self.data.loading && self.data.comments.is_empty() {
                    <div class="loading">{ "Loading..." }</div>
                }
                <ul class="list-group">
                    { for self.data.comments.iter().map(|comment| html! {
                        <CommentItem
                            key={comment.id.clone()}
                            comment={comment.clone()}
                            services={props.services.clone()}
                        />
                    }) }
                </ul>

                <h3>{ "Reviews" }</h3>
                <ul class="list-group reviews">
                    { for self.data.reviews.iter().map(view_review) }
                </ul>

                if let Some(user_id) = viewer {
                    <ReviewForm
                        post_id={props.post_id.clone()}
                        {user_id}
                        services={props.services.clone()}
                    />
                }
            </div>
        }
    }
}

fn view_review(review: &Review) -> Html {
    let author = match &review.user {
        UserRef::Id(id) => id.clone(),
        UserRef::Populated(user) => user.username.clone().unwrap_or_else(|| user.id.clone()),
    };

    html! {
        <li class="list-group-item">
            <p class="mb-0">{ &review.content }</p>
            <small>{ format!("by {}", author) }</small>
        </li>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: &str) -> Comment {
        Comment {
            id: id.into(),
            content: "hi".into(),
            user: UserRef::Id("u1".into()),
            post: "p1".into(),
        }
    }

    #[test]
    fn successful_refetch_clears_the_error() {
        let mut data = PostData {
            loading: true,
            ..PostData::default()
        };

        data.failed("Transport error: offline".into());
        assert_eq!(data.error.as_deref(), Some("Transport error: offline"));
        assert!(!data.loading);

        data.comments_loaded(vec![comment("c1")]);
        assert!(data.error.is_none());
        assert_eq!(data.comments.len(), 1);

        data.failed("Transport error: offline".into());
        data.reviews_loaded(Vec::new());
        assert!(data.error.is_none());
    }
}
