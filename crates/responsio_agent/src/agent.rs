//! Per-turn processing of chat input.

use crate::{Assistant, ClientResponse, ClientSession, Interpreter, ResolvedTurn, TurnResolution};
use responsio_core::{ActionId, IntentRecord};
use responsio_error::ResponsioResult;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Outcome of processing one chat input.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnReply {
    /// A story was selected and its action executed.
    Responded {
        /// Commands produced by the action
        response: ClientResponse,
        /// How the turn was resolved
        turn: ResolvedTurn,
    },
    /// No story matched; nothing was executed.
    Unresolved,
}

impl TurnReply {
    /// The response, if the turn was resolved.
    pub fn response(&self) -> Option<&ClientResponse> {
        match self {
            TurnReply::Responded { response, .. } => Some(response),
            TurnReply::Unresolved => None,
        }
    }

    /// The resolved turn, if any.
    pub fn turn(&self) -> Option<&ResolvedTurn> {
        match self {
            TurnReply::Responded { turn, .. } => Some(turn),
            TurnReply::Unresolved => None,
        }
    }

    /// Whether no story matched.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, TurnReply::Unresolved)
    }
}

/// Drives an assistant for any number of independent sessions.
///
/// The agent holds no per-session state; each call borrows the session it
/// works on exclusively.
pub struct Agent<I> {
    assistant: Arc<Assistant>,
    interpreter: I,
}

impl<I: Interpreter> Agent<I> {
    /// Creates an agent.
    pub fn new(assistant: Arc<Assistant>, interpreter: I) -> Self {
        Self {
            assistant,
            interpreter,
        }
    }

    /// The assistant being driven.
    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    /// Starts a new session in the assistant's language.
    pub fn new_session(&self, user_id: impl Into<String>) -> ClientSession {
        ClientSession::new(
            self.assistant.identity().clone(),
            user_id,
            self.assistant.language().clone(),
        )
    }

    /// Classifies `input`, records it, and responds.
    #[instrument(skip(self, session), fields(user_id = %session.user_id()))]
    pub fn process_chat_input(
        &self,
        session: &mut ClientSession,
        input: &str,
    ) -> ResponsioResult<TurnReply> {
        info!("Received input");
        let intent = match self.interpreter.interpret(session, input)? {
            Some(intent) => intent,
            None => {
                debug!(intent = %self.assistant.default_intent(), "Defaulting intent");
                IntentRecord::named(self.assistant.default_intent().clone())
            }
        };
        self.process_intent(session, intent)
    }

    /// Records an already classified intent and responds.
    #[instrument(skip(self, session, intent), fields(user_id = %session.user_id(), intent = %intent.name()))]
    pub fn process_intent(
        &self,
        session: &mut ClientSession,
        intent: IntentRecord,
    ) -> ResponsioResult<TurnReply> {
        session.record_intent(intent);

        let resolution = self
            .assistant
            .orchestrator()
            .resolve_turn(self.assistant.library(), session.history_mut());

        match resolution {
            TurnResolution::Unresolved => {
                info!("Turn unresolved");
                Ok(TurnReply::Unresolved)
            }
            TurnResolution::Resolved(turn) => {
                debug!(
                    story = turn.story().unwrap_or_default(),
                    action = ?turn.action(),
                    retained = session.history().len(),
                    "Turn resolved"
                );
                let response = self.execute_action(session, turn.action())?;
                Ok(TurnReply::Responded { response, turn })
            }
        }
    }

    /// Runs the welcome action for a new session.
    pub fn welcome(&self, session: &mut ClientSession) -> ResponsioResult<ClientResponse> {
        session.touch();
        self.execute_action(session, self.assistant.welcome_action().as_ref())
    }

    /// Runs the welcome-back action for a returning session.
    pub fn welcome_back(&self, session: &mut ClientSession) -> ResponsioResult<ClientResponse> {
        session.touch();
        self.execute_action(session, self.assistant.welcome_back_action().as_ref())
    }

    fn execute_action(
        &self,
        session: &mut ClientSession,
        action: Option<&ActionId>,
    ) -> ResponsioResult<ClientResponse> {
        let mut response = ClientResponse::new();
        if let Some(action) = action {
            self.assistant
                .actions()
                .perform(action, session, &mut response)?;
        }
        Ok(response)
    }
}
