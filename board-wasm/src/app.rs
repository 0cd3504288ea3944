use crate::components::PostPage;
use crate::services::Services;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Routable, Clone, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/posts/:id")]
    Post { id: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

#[derive(Properties, Clone, PartialEq)]
pub struct AppProps {
    pub services: Services,
}

pub struct App;

impl Component for App {
    type Message = ();
    type Properties = AppProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let services = ctx.props().services.clone();
        let render = Callback::from(move |route: Route| switch(route, &services));

        html! {
            <BrowserRouter>
                <div class="container">
                    <h1>{ "Board" }</h1>
                    { view_user_info(&ctx.props().services) }
                    <Switch<Route> {render} />
                </div>
            </BrowserRouter>
        }
    }
}

fn switch(route: Route, services: &Services) -> Html {
    match route {
        Route::Home => html! {
            <p>{ "Open a post at /posts/<id> to see its comments and reviews." }</p>
        },
        Route::Post { id } => html! {
            <PostPage key={id.clone()} post_id={id.clone()} services={services.clone()} />
        },
        Route::NotFound => html! { <p>{ "Page not found" }</p> },
    }
}

fn view_user_info(services: &Services) -> Html {
    match services.auth().session() {
        Some(session) => {
            let name = session
                .claims()
                .data
                .username
                .clone()
                .unwrap_or_else(|| session.user_id().to_string());
            html! {
                <div class="user-info">
                    <span>{ format!("Logged in as: {}", name) }</span>
                </div>
            }
        }
        None => html! {
            <div class="user-info">
                <span>{ "Not logged in" }</span>
            </div>
        },
    }
}
