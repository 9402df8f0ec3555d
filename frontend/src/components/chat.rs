use leptos::ev;
use leptos::prelude::*;
use lexi_core::{MessageBody, NodeId};

use crate::components::suggestions::SuggestionChips;
use crate::state::Widget;

/// Chat window with the transcript, suggestion chips and input form.
#[component]
pub fn ChatWindow() -> impl IntoView {
    let state = expect_context::<Widget>().state;

    view! {
        <main class="chat-area">
            <div class="chat-header">"Lexi · AI learning assistant"</div>

            <div id="chat-window" class="chat-window" node_ref=state.window_ref>
                <div id="chat-messages" class="messages-container">
                    <For
                        each=move || state.transcript.with(|t| {
                            t.nodes().iter().map(|n| n.id).collect::<Vec<_>>()
                        })
                        key=|id| *id
                        let:id
                    >
                        <MessageBubble id=id />
                    </For>
                </div>
            </div>

            <SuggestionChips />
            <ChatForm />
        </main>
    }
}

/// A single transcript entry. Bot markup is inserted as HTML, user text
/// as plain text.
#[component]
fn MessageBubble(id: NodeId) -> impl IntoView {
    let state = expect_context::<Widget>().state;

    let node = move || state.transcript.with(|t| t.get(id).cloned());
    let css_class = move || match node() {
        Some(n) if n.streaming => format!("message {} streaming", n.sender.as_str()),
        Some(n) => format!("message {}", n.sender.as_str()),
        None => "message".to_string(),
    };
    let content = move || node().map(|n| n.body.as_str().to_string()).unwrap_or_default();
    let is_markup = state
        .transcript
        .with_untracked(|t| matches!(t.get(id).map(|n| &n.body), Some(MessageBody::Markup(_))));

    if is_markup {
        view! { <div class=css_class inner_html=content></div> }.into_any()
    } else {
        view! { <div class=css_class>{content}</div> }.into_any()
    }
}

/// Input form with send button and loading indicator.
#[component]
fn ChatForm() -> impl IntoView {
    let widget = expect_context::<Widget>();
    let state = widget.state;
    let is_loading = move || state.loading.get();

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        widget.submit();
    };

    view! {
        <form id="chat-form" class="input-area" on:submit=on_submit>
            <div class="input-row">
                <input
                    id="chat-input"
                    type="text"
                    autocomplete="off"
                    placeholder="Ask Lexi about AI…"
                    node_ref=state.input_ref
                    prop:value=move || state.input.get()
                    on:input=move |ev| state.input.set(event_target_value(&ev))
                    prop:disabled=is_loading
                />
                <button id="send-button" type="submit" class="send-btn" prop:disabled=is_loading>
                    "Send"
                </button>
            </div>
            <div id="loading-indicator" class="loading-indicator" class:hidden=move || !is_loading()>
                <span></span>
                <span></span>
                <span></span>
            </div>
        </form>
    }
}
