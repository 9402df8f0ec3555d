//! Core of the Lexi chat widget.
//!
//! Everything in here is independent of the browser: the markdown renderer,
//! the transcript model, the suggestion set, the conversation session
//! interface and the submission state machine that ties them together.
//! The frontend supplies a [`ChatView`] and a [`ConversationSession`]
//! implementation; tests supply scripted fakes.

pub mod controller;
pub mod display;
pub mod error;
pub mod markdown;
pub mod persona;
pub mod session;
pub mod suggestions;

pub use controller::{ChatController, SubmissionState, SubmitOutcome};
pub use display::{ChatView, MessageBody, MessageNode, NodeId, Sender, Transcript, display_message};
pub use error::{ConfigError, SessionError};
pub use markdown::render_markdown;
pub use session::{ConversationSession, FragmentStream, SessionConfig};
pub use suggestions::SuggestionSet;
