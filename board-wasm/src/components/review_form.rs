use crate::services::Services;
use board_client::reviews::{cached_token, ReviewActions, ReviewForm as ReviewFormState};
use board_client::{MutationOutcome, MutationStatus};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct ReviewFormProps {
    pub post_id: String,
    pub user_id: String,
    pub services: Services,
}

pub enum Msg {
    UpdateContent(String),
    Submit,
    Submitted(MutationOutcome),
}

pub struct ReviewForm {
    form: ReviewFormState,
    status: MutationStatus,
}

impl Component for ReviewForm {
    type Message = Msg;
    type Properties = ReviewFormProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        Self {
            form: ReviewFormState::new(props.post_id.clone(), props.user_id.clone()),
            status: MutationStatus::Idle,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::UpdateContent(val) => {
                self.form.set_content(val);
                true
            }

            Msg::Submit => {
                self.status = MutationStatus::Loading;

                let services = ctx.props().services.clone();
                let form = self.form.clone();
                let link = ctx.link().clone();

                spawn_local(async move {
                    let token = cached_token(&services.cache, services.tokens.as_ref()).await;
                    let actions = ReviewActions::new(
                        services.api.as_ref(),
                        services.notifier.as_ref(),
                        &services.cache,
                    );
                    let outcome = actions.submit(&form, token).await;
                    link.send_message(Msg::Submitted(outcome));
                });

                true
            }

            Msg::Submitted(outcome) => {
                self.status = outcome.status();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <form class="review-form" {onsubmit}>
                <div class="form-floating">
                    <textarea
                        class="form-control"
                        name="content"
                        id="content"
                        value={self.form.content().to_string()}
                        oninput={ctx.link().callback(|e: InputEvent| {
                            let input: HtmlTextAreaElement = e.target_unchecked_into();
                            Msg::UpdateContent(input.value())
                        })}
                    />
                    <label>{ "Type something in here..." }</label>
                </div>
                <button
                    type="submit"
                    class="btn btn-outline-info"
                    style="display: block; margin: 0 auto; width: 100%"
                    disabled={self.status.is_loading()}
                >
                    { "Add Review" }
                </button>
            </form>
        }
    }
}
