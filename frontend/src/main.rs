mod api;
mod components;
mod models;
mod state;
mod ws;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatWindow;
use state::Widget;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    let widget = Widget::provide();

    // Check the backend, then greet or report the missing credential
    widget.boot();

    view! {
        <div class="app-container">
            <ChatWindow />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
