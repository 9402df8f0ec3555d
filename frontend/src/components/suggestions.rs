use leptos::prelude::*;

use crate::state::Widget;

/// Quick-reply buttons. Clicking one submits its prompt like typed text.
#[component]
pub fn SuggestionChips() -> impl IntoView {
    let widget = expect_context::<Widget>();

    view! {
        <div id="suggestion-chips" class="suggestion-chips">
            <For
                each=move || widget.state.suggestions.get()
                key=|prompt| prompt.clone()
                let:prompt
            >
                {
                    let label = prompt.clone();
                    view! {
                        <button
                            type="button"
                            class="suggestion-chip"
                            on:click=move |_| widget.choose_suggestion(prompt.clone())
                        >
                            {label}
                        </button>
                    }
                }
            </For>
        </div>
    }
}
