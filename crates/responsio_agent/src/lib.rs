//! Conversation runtime for the Responsio dialogue engine.
//!
//! An [`Assistant`] bundles a story library with actions and utterances. An
//! [`Agent`] drives it: each chat input is classified by an [`Interpreter`],
//! appended to the session history, resolved to a story by the
//! [`TurnOrchestrator`], and answered by executing the selected action.
//!
//! # Example
//!
//! ```
//! use responsio_agent::{Agent, Assistant, DirectInterpreter};
//! use std::sync::Arc;
//!
//! let assistant = Assistant::from_toml_str(r#"
//!     identity = "concierge"
//!
//!     [utterances.hello]
//!     en = "Hello ${name}!"
//!
//!     [actions.utter_hello]
//!     type = "utter"
//!     utterance = "hello"
//!
//!     [[stories]]
//!     name = "greet"
//!     steps = [{ type = "leaf", intent = "greet", action = "utter_hello" }]
//! "#).expect("valid assistant");
//!
//! let agent = Agent::new(Arc::new(assistant), DirectInterpreter::default());
//! let mut session = agent.new_session("u1");
//! let reply = agent.process_chat_input(&mut session, "greet name=Ada").expect("turn");
//! assert_eq!(reply.response().map(|r| r.texts()), Some(vec!["Hello Ada!"]));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod agent;
mod assistant;
mod interpreter;
mod orchestrator;
mod response;
mod session;
mod validator;

pub use action::{
    ActionDefinition, ActionHandler, ActionSet, FALLBACK_LANGUAGE, Utterance, substitute_slots,
};
pub use agent::{Agent, TurnReply};
pub use assistant::{
    Assistant, AssistantBuilder, AssistantDefinition, DEFAULT_INTENT, DEFAULT_LANGUAGE,
};
pub use interpreter::{DirectInterpreter, Interpreter};
pub use orchestrator::{
    NarrativeSegment, ResolvedTurn, RetentionPolicy, TurnOrchestrator, TurnResolution,
};
pub use response::{ClientCommand, ClientResponse, TEXT_COMMAND};
pub use session::ClientSession;
pub use validator::{
    ValidationConfig, ValidationError, ValidationErrorKind, ValidationResult, ValidationWarning,
    ValidationWarningKind, validate_assistant, validate_assistant_file, validate_assistant_path,
    validate_assistant_with_config,
};
