//! Streaming submission handler.
//!
//! One submission runs at a time. The guard is the controller's own
//! [`SubmissionState`], so the widget behaves the same whether or not the
//! rendered input is actually disabled.

use std::cell::{Cell, RefCell};

use futures::StreamExt;
use log::{debug, error, warn};

use crate::display::{ChatView, MessageBody, NodeId, Sender, display_message};
use crate::error::{ConfigError, SessionError};
use crate::markdown::render_markdown;
use crate::persona;
use crate::session::{ConversationSession, FragmentStream};
use crate::suggestions::SuggestionSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    /// User turn sent, no fragment received yet.
    Sending,
    /// At least one fragment rendered.
    Streaming,
    /// A turn failed; the fallback message is being shown.
    Error,
    /// Initialisation failed. Terminal.
    Halted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, nothing happened.
    Ignored,
    /// Another submission is in flight.
    Busy,
    /// The widget never finished initialising.
    Unavailable,
    Completed { reply: String },
    Failed { error: SessionError },
}

pub struct ChatController<S, V> {
    session: RefCell<S>,
    view: V,
    state: Cell<SubmissionState>,
    suggestions: RefCell<SuggestionSet>,
}

impl<S: ConversationSession, V: ChatView> ChatController<S, V> {
    pub fn new(session: S, view: V) -> Self {
        Self {
            session: RefCell::new(session),
            view,
            state: Cell::new(SubmissionState::Idle),
            suggestions: RefCell::new(SuggestionSet::default()),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state.get()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn suggestions(&self) -> SuggestionSet {
        self.suggestions.borrow().clone()
    }

    /// Shows the greeting and the starter suggestions, or the configuration
    /// error when `readiness` failed. After an error the controller refuses
    /// every submission.
    pub fn initialize(&self, readiness: Result<(), ConfigError>) -> Result<(), ConfigError> {
        if let Err(e) = readiness {
            error!("Widget initialisation halted: {e}");
            display_message(&self.view, Sender::Bot, &e.user_message(), false);
            self.state.set(SubmissionState::Halted);
            return Err(e);
        }

        display_message(&self.view, Sender::Bot, persona::GREETING, false);
        self.show_suggestions(persona::initial_suggestions());
        self.view.set_loading(false);
        self.view.focus_input();
        Ok(())
    }

    pub fn show_suggestions(&self, prompts: Vec<String>) {
        self.view.show_suggestions(&prompts);
        self.suggestions.borrow_mut().replace(prompts);
    }

    /// Puts `prompt` in the input and submits it like typed text.
    pub async fn choose_suggestion(&self, prompt: &str) -> SubmitOutcome {
        if let Some(refused) = self.refusal() {
            return refused;
        }
        self.view.set_input_value(prompt);
        self.submit().await
    }

    /// Runs one request/response cycle for the current input value.
    pub async fn submit(&self) -> SubmitOutcome {
        if let Some(refused) = self.refusal() {
            return refused;
        }
        let text = self.view.input_value().trim().to_string();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        self.state.set(SubmissionState::Sending);
        self.view.set_loading(true);
        display_message(&self.view, Sender::User, &text, false);
        self.view.set_input_value("");
        self.suggestions.borrow_mut().clear();
        self.view.show_suggestions(&[]);
        debug!("Sending user turn ({} chars)", text.len());

        let stream = self.session.borrow_mut().send_streaming(&text);
        let outcome = match self.consume(stream).await {
            Ok(reply) => {
                debug!("Assistant turn complete ({} chars)", reply.len());
                SubmitOutcome::Completed { reply }
            }
            Err(error) => {
                self.state.set(SubmissionState::Error);
                warn!("Assistant turn failed: {error}");
                display_message(&self.view, Sender::Bot, persona::FALLBACK_ERROR, false);
                SubmitOutcome::Failed { error }
            }
        };

        self.view.set_loading(false);
        self.view.focus_input();
        self.state.set(SubmissionState::Idle);
        outcome
    }

    fn refusal(&self) -> Option<SubmitOutcome> {
        match self.state.get() {
            SubmissionState::Idle => None,
            SubmissionState::Halted => Some(SubmitOutcome::Unavailable),
            state => {
                debug!("Submission refused while {state:?}");
                Some(SubmitOutcome::Busy)
            }
        }
    }

    /// Drains `stream`, re-rendering the whole reply after every fragment.
    /// Whatever was shown before a failure stays in the transcript.
    async fn consume(&self, mut stream: FragmentStream) -> Result<String, SessionError> {
        let mut reply = String::new();
        let mut placeholder: Option<NodeId> = None;

        let result = loop {
            match stream.next().await {
                Some(Ok(fragment)) => {
                    reply.push_str(&fragment);
                    let body = MessageBody::Markup(render_markdown(&reply));
                    match placeholder {
                        Some(id) => self.view.replace_message(id, body),
                        None => {
                            self.state.set(SubmissionState::Streaming);
                            placeholder = Some(self.view.append_message(Sender::Bot, body, true));
                        }
                    }
                    self.view.scroll_to_bottom();
                }
                Some(Err(e)) => break Err(e),
                None => break Ok(()),
            }
        };

        if let Some(id) = placeholder {
            self.view.finish_message(id);
        }
        result.map(|()| reply)
    }
}
