use std::rc::Rc;

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lexi_core::persona::CREDENTIAL_VAR;
use lexi_core::{ChatController, ChatView, ConfigError, MessageBody, NodeId, Sender, Transcript};

use crate::api;
use crate::ws::WsSession;

/// Reactive widget state. Implements the view side of the controller.
#[derive(Clone, Copy)]
pub struct WidgetState {
    pub transcript: RwSignal<Transcript>,
    pub input: RwSignal<String>,
    /// True while a turn is in flight; disables the form.
    pub loading: RwSignal<bool>,
    pub suggestions: RwSignal<Vec<String>>,
    pub window_ref: NodeRef<html::Div>,
    pub input_ref: NodeRef<html::Input>,
}

impl WidgetState {
    fn new() -> Self {
        Self {
            transcript: RwSignal::new(Transcript::new()),
            input: RwSignal::new(String::new()),
            // Locked until the backend status check passes.
            loading: RwSignal::new(true),
            suggestions: RwSignal::new(Vec::new()),
            window_ref: NodeRef::new(),
            input_ref: NodeRef::new(),
        }
    }
}

impl ChatView for WidgetState {
    fn append_message(&self, sender: Sender, body: MessageBody, streaming: bool) -> NodeId {
        self.transcript.write().push(sender, body, streaming)
    }

    fn replace_message(&self, id: NodeId, body: MessageBody) {
        self.transcript.update(|t| {
            t.replace(id, body);
        });
    }

    fn finish_message(&self, id: NodeId) {
        self.transcript.update(|t| t.finish(id));
    }

    // DOM updates land after the signal write, so wait a frame.
    fn scroll_to_bottom(&self) {
        let window_ref = self.window_ref;
        request_animation_frame(move || {
            if let Some(el) = window_ref.get_untracked() {
                el.set_scroll_top(el.scroll_height());
            }
        });
    }

    fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    fn show_suggestions(&self, prompts: &[String]) {
        self.suggestions.set(prompts.to_vec());
    }

    fn input_value(&self) -> String {
        self.input.get_untracked()
    }

    fn set_input_value(&self, value: &str) {
        self.input.set(value.to_string());
    }

    fn focus_input(&self) {
        let input_ref = self.input_ref;
        request_animation_frame(move || {
            if let Some(el) = input_ref.get_untracked() {
                let _ = el.focus();
            }
        });
    }
}

pub type Controller = Rc<ChatController<WsSession, WidgetState>>;

/// Widget handle shared with components via Leptos context.
#[derive(Clone, Copy)]
pub struct Widget {
    pub state: WidgetState,
    controller: StoredValue<Controller, LocalStorage>,
}

impl Widget {
    /// Create the widget and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let state = WidgetState::new();
        let session = WsSession::new(api::ws_url());
        let controller = Rc::new(ChatController::new(session, state));

        let widget = Self { state, controller: StoredValue::new_local(controller) };
        provide_context(widget);
        widget
    }

    /// Checks the backend, then shows either the greeting or the
    /// configuration error.
    pub fn boot(&self) {
        let controller = self.controller.get_value();
        spawn_local(async move {
            let readiness = match api::fetch_status().await {
                Ok(status) if status.configured => {
                    log::info!("Backend ready on model {}", status.model);
                    Ok(())
                }
                Ok(_) => Err(ConfigError::MissingCredential { name: CREDENTIAL_VAR.to_string() }),
                Err(message) => {
                    log::error!("Failed to fetch backend status: {message}");
                    Err(ConfigError::Unreachable { message })
                }
            };
            let _ = controller.initialize(readiness);
        });
    }

    pub fn submit(&self) {
        let controller = self.controller.get_value();
        spawn_local(async move {
            let outcome = controller.submit().await;
            log::debug!("Submission finished: {outcome:?}");
        });
    }

    pub fn choose_suggestion(&self, prompt: String) {
        let controller = self.controller.get_value();
        spawn_local(async move {
            let outcome = controller.choose_suggestion(&prompt).await;
            log::debug!("Suggestion finished: {outcome:?}");
        });
    }
}
