use crate::services::Services;
use board_client::comments::{resolve_view, CommentActions, CommentState};
use board_client::models::Comment;
use board_client::{MutationOutcome, MutationStatus};
use chrono::Utc;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct CommentProps {
    pub comment: Comment,
    pub services: Services,
}

pub enum Msg {
    ToggleDropdown,
    StartEdit,
    UpdateDraft(String),
    SaveEdit,
    Saved(MutationOutcome),
    CancelEdit,
    Delete,
    Deleted(MutationOutcome),
}

pub struct CommentItem {
    state: CommentState,
    draft: String,
    save_status: MutationStatus,
    delete_status: MutationStatus,
}

impl CommentItem {
    fn token(ctx: &Context<Self>) -> Option<String> {
        ctx.props()
            .services
            .auth()
            .session()
            .map(|session| session.token().to_string())
    }
}

impl Component for CommentItem {
    type Message = Msg;
    type Properties = CommentProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            state: CommentState::default(),
            draft: ctx.props().comment.content.clone(),
            save_status: MutationStatus::Idle,
            delete_status: MutationStatus::Idle,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::ToggleDropdown => {
                self.state.toggle_dropdown();
                true
            }

            Msg::StartEdit => {
                self.draft = ctx.props().comment.content.clone();
                self.state.start_editing();
                true
            }

            Msg::UpdateDraft(val) => {
                self.draft = val;
                true
            }

            Msg::SaveEdit => {
                let Some(token) = Self::token(ctx) else {
                    return false;
                };

                self.save_status = MutationStatus::Loading;

                let services = ctx.props().services.clone();
                let id = ctx.props().comment.id.clone();
                let content = self.draft.clone();
                let link = ctx.link().clone();

                spawn_local(async move {
                    let actions = CommentActions::new(
                        services.api.as_ref(),
                        services.notifier.as_ref(),
                        &services.cache,
                    );
                    let outcome = actions.update(&id, &token, &content).await;
                    link.send_message(Msg::Saved(outcome));
                });

                true
            }

            Msg::Saved(outcome) => {
                self.save_status = outcome.status();
                if matches!(outcome, MutationOutcome::Succeeded(_)) {
                    self.state.stop_editing();
                }
                true
            }

            Msg::CancelEdit => {
                self.state.stop_editing();
                self.save_status = MutationStatus::Idle;
                true
            }

            Msg::Delete => {
                let Some(token) = Self::token(ctx) else {
                    return false;
                };

                self.delete_status = MutationStatus::Loading;

                let services = ctx.props().services.clone();
                let id = ctx.props().comment.id.clone();
                let link = ctx.link().clone();

                spawn_local(async move {
                    let actions = CommentActions::new(
                        services.api.as_ref(),
                        services.notifier.as_ref(),
                        &services.cache,
                    );
                    let outcome = actions.delete(&id, &token).await;
                    link.send_message(Msg::Deleted(outcome));
                });

                true
            }

            Msg::Deleted(outcome) => {
                self.delete_status = outcome.status();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let auth = props.services.auth();

        let Some(view) = resolve_view(&props.comment, &auth, Utc::now()) else {
            return html! {};
        };

        html! {
            <li class="list-group-item d-flex justify-content-between align-items-center">
                if self.state.editing {
                    { self.view_edit_form(ctx) }
                } else {
                    <p class="mb-0">{ &view.comment.content }</p>
                }

                if view.can_manage {
                    { self.view_menu(ctx) }
                }
            </li>
        }
    }
}

impl CommentItem {
    fn view_menu(&self, ctx: &Context<Self>) -> Html {
        let delete_label = if self.delete_status.is_loading() {
            html! { <span class="spinner">{ "…" }</span> }
        } else {
            html! { { "Delete" } }
        };

        html! {
            <div class="dropdown">
                <button
                    class="btn btn-link btn-sm p-0"
                    onclick={ctx.link().callback(|_| Msg::ToggleDropdown)}
                >
                    { "⋮" }
                </button>

                if self.state.dropdown_open {
                    <div class="dropdown-menu dropdown-menu-end show">
                        <button
                            class="dropdown-item"
                            onclick={ctx.link().callback(|_| Msg::StartEdit)}
                        >
                            { "✏️ Edit" }
                        </button>
                        <button
                            class="dropdown-item"
                            disabled={self.delete_status.is_loading()}
                            onclick={ctx.link().callback(|_| Msg::Delete)}
                        >
                            { "🗑️ " }{ delete_label }
                        </button>
                    </div>
                }
            </div>
        }
    }

    fn view_edit_form(&self, ctx: &Context<Self>) -> Html {
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::SaveEdit
        });

        html! {
            <form class="edit-comment flex-grow-1 me-2" {onsubmit}>
                <textarea
                    class="form-control"
                    value={self.draft.clone()}
                    oninput={ctx.link().callback(|e: InputEvent| {
                        let input: HtmlTextAreaElement = e.target_unchecked_into();
                        Msg::UpdateDraft(input.value())
                    })}
                />
                <div class="edit-actions">
                    <button type="submit" class="btn btn-sm btn-info" disabled={self.save_status.is_loading()}>
                        { "Save" }
                    </button>
                    <button
                        type="button"
                        class="btn btn-sm btn-link"
                        onclick={ctx.link().callback(|_| Msg::CancelEdit)}
                    >
                        { "Cancel" }
                    </button>
                </div>
            </form>
        }
    }
}
