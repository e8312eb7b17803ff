use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};
use web_sys::window;

mod attribution;
mod config;
mod content;
mod quiz;
mod storage;
mod tracking;
mod funnel {
    pub mod effects;
    pub mod schedule;
    pub mod sequencer;
    pub mod state;
    pub mod video;
}
mod pages {
    pub mod result;
}

use pages::result::ResultPage;
use storage::BrowserStorage;


#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/resultado")]
    Result,
    #[not_found]
    #[at("/404")]
    NotFound,
}


fn switch(routes: Route) -> Html {
    match routes {
        Route::Result => {
            info!("Rendering Result page");
            html! { <ResultPage /> }
        },
        Route::Home | Route::NotFound => {
            html! { <Redirect<Route> to={Route::Result} /> }
        },
    }
}


/// Funnel entry: remember the campaign parameters the visitor landed with.
fn capture_entry_attribution() {
    let search = window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    if attribution::capture_attribution(&BrowserStorage, &search) {
        info!("Stored landing attribution");
    }
}


#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}


fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    info!("Starting quiz funnel");
    capture_entry_attribution();
    yew::Renderer::<App>::new().render();
}
