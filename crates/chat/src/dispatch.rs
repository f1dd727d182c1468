use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use thiserror::Error;

use printquote_core::{Prompt, Quote, SessionMachine, SessionState, StepOutcome};

use crate::commands::{classify_inbound, BotCommand, Inbound};
use crate::render;

/// Opaque conversation identifier supplied by the chat platform.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("message delivery failed: {0}")]
    Delivery(String),
}

/// Outbound side of the chat platform binding. `choices` is non-empty only
/// for closed-choice prompts and should render as a single-choice menu.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn prompt(
        &self,
        chat: &ChatId,
        text: &str,
        choices: &[String],
    ) -> Result<(), TransportError>;

    async fn report_quote(&self, chat: &ChatId, quote: &Quote) -> Result<(), TransportError>;

    async fn report_cancelled(&self, chat: &ChatId) -> Result<(), TransportError>;

    async fn report_help(&self, chat: &ChatId, text: &str) -> Result<(), TransportError>;
}

type SessionSlot = Arc<tokio::sync::Mutex<SessionState>>;

/// Owns every active session. The map lock covers create/lookup/destroy
/// only; stepping holds the per-session lock, so one chat's slow transport
/// never blocks another chat's dialogue.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<ChatId, SessionSlot>>,
}

impl SessionRegistry {
    /// Installs a fresh session, discarding any in-progress one. Returns
    /// whether a previous session was replaced.
    pub fn create(&self, chat: &ChatId, state: SessionState) -> bool {
        self.lock()
            .insert(chat.clone(), Arc::new(tokio::sync::Mutex::new(state)))
            .is_some()
    }

    pub fn lookup(&self, chat: &ChatId) -> Option<SessionSlot> {
        self.lock().get(chat).cloned()
    }

    /// Removes the session if one exists. Returns whether it did.
    pub fn destroy(&self, chat: &ChatId) -> bool {
        self.lock().remove(chat).is_some()
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ChatId, SessionSlot>> {
        // Recover the map on poisoning; session state is never left half
        // written because the machine returns whole states.
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Routes inbound commands and stage text between the session registry, the
/// state machine and the transport.
pub struct Dispatcher<T> {
    machine: SessionMachine,
    registry: SessionRegistry,
    transport: T,
}

impl<T> Dispatcher<T>
where
    T: ChatTransport,
{
    pub fn new(machine: SessionMachine, transport: T) -> Self {
        Self { machine, registry: SessionRegistry::default(), transport }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Entry point for anything the platform delivers as a command.
    pub async fn on_command(
        &self,
        chat: &ChatId,
        command: BotCommand,
    ) -> Result<(), TransportError> {
        match command {
            BotCommand::Start => self.start_session(chat).await,
            BotCommand::Cancel => self.cancel_session(chat).await,
            BotCommand::Help => self.transport.report_help(chat, render::help_message()).await,
            BotCommand::Unknown(name) => {
                self.transport.prompt(chat, &render::unknown_command_message(&name), &[]).await
            }
        }
    }

    /// Entry point for raw message text; commands embedded in text are
    /// routed the same as platform-level commands.
    pub async fn on_message(&self, chat: &ChatId, text: &str) -> Result<(), TransportError> {
        match classify_inbound(text) {
            Inbound::Command(command) => self.on_command(chat, command).await,
            Inbound::Text(text) => self.step_session(chat, &text).await,
        }
    }

    async fn start_session(&self, chat: &ChatId) -> Result<(), TransportError> {
        let (state, prompt) = self.machine.start();
        let replaced = self.registry.create(chat, state);
        if replaced {
            tracing::debug!(chat = %chat.0, "discarded in-progress session on restart");
        }
        tracing::info!(chat = %chat.0, "session started");
        self.send_prompt(chat, &prompt).await
    }

    async fn cancel_session(&self, chat: &ChatId) -> Result<(), TransportError> {
        let existed = self.registry.destroy(chat);
        tracing::info!(chat = %chat.0, existed, "session cancelled");
        self.transport.report_cancelled(chat).await
    }

    async fn step_session(&self, chat: &ChatId, text: &str) -> Result<(), TransportError> {
        let Some(slot) = self.registry.lookup(chat) else {
            return self.transport.prompt(chat, render::idle_hint(), &[]).await;
        };

        let mut session = slot.lock().await;
        match self.machine.step(session.clone(), text) {
            StepOutcome::Continue { state, prompt, rejected } => {
                if let Some(error) = &rejected {
                    tracing::debug!(chat = %chat.0, stage = ?state.stage(), %error, "input rejected");
                }
                *session = state;
                drop(session);
                self.send_prompt(chat, &prompt).await
            }
            StepOutcome::Completed { quote } => {
                drop(session);
                self.registry.destroy(chat);
                tracing::info!(chat = %chat.0, total = %quote.total_cost, "quote delivered");
                self.transport.report_quote(chat, &quote).await
            }
        }
    }

    async fn send_prompt(&self, chat: &ChatId, prompt: &Prompt) -> Result<(), TransportError> {
        self.transport.prompt(chat, &prompt.text, &prompt.choices).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use printquote_core::{Catalogs, Quote, SessionMachine};

    use super::{ChatId, ChatTransport, Dispatcher, TransportError};
    use crate::commands::BotCommand;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Outbound {
        Prompt { text: String, choices: Vec<String> },
        Quote { total: Decimal },
        Cancelled,
        Help,
    }

    #[derive(Default)]
    struct RecordingTransport {
        sent: std::sync::Mutex<Vec<(ChatId, Outbound)>>,
    }

    impl RecordingTransport {
        fn sent(&self) -> Vec<(ChatId, Outbound)> {
            self.sent.lock().expect("lock").clone()
        }

        fn last(&self) -> Outbound {
            self.sent().last().expect("at least one outbound message").1.clone()
        }

        fn record(&self, chat: &ChatId, outbound: Outbound) {
            self.sent.lock().expect("lock").push((chat.clone(), outbound));
        }
    }

    #[async_trait]
    impl ChatTransport for RecordingTransport {
        async fn prompt(
            &self,
            chat: &ChatId,
            text: &str,
            choices: &[String],
        ) -> Result<(), TransportError> {
            self.record(
                chat,
                Outbound::Prompt { text: text.to_owned(), choices: choices.to_vec() },
            );
            Ok(())
        }

        async fn report_quote(&self, chat: &ChatId, quote: &Quote) -> Result<(), TransportError> {
            self.record(chat, Outbound::Quote { total: quote.total_cost });
            Ok(())
        }

        async fn report_cancelled(&self, chat: &ChatId) -> Result<(), TransportError> {
            self.record(chat, Outbound::Cancelled);
            Ok(())
        }

        async fn report_help(&self, chat: &ChatId, _text: &str) -> Result<(), TransportError> {
            self.record(chat, Outbound::Help);
            Ok(())
        }
    }

    fn dispatcher() -> Dispatcher<RecordingTransport> {
        let machine = SessionMachine::new(Arc::new(Catalogs::reference()));
        Dispatcher::new(machine, RecordingTransport::default())
    }

    fn chat(id: &str) -> ChatId {
        ChatId(id.to_owned())
    }

    #[tokio::test]
    async fn full_dialogue_delivers_a_quote_and_destroys_the_session() {
        let dispatcher = dispatcher();
        let chat = chat("C1");

        dispatcher.on_message(&chat, "/start").await.expect("start");
        dispatcher.on_message(&chat, "💎 Баннер (440 г/м²)").await.expect("material");
        dispatcher.on_message(&chat, "2x1.5").await.expect("size");
        dispatcher.on_message(&chat, "2").await.expect("quantity");
        dispatcher.on_message(&chat, "Без отделки").await.expect("finishing");

        assert_eq!(
            dispatcher.transport().last(),
            Outbound::Quote { total: Decimal::from(2400) }
        );
        assert_eq!(dispatcher.registry().active_count(), 0);
    }

    #[tokio::test]
    async fn start_offers_the_material_menu() {
        let dispatcher = dispatcher();
        let chat = chat("C1");

        dispatcher.on_command(&chat, BotCommand::Start).await.expect("start");
        match dispatcher.transport().last() {
            Outbound::Prompt { choices, .. } => assert_eq!(choices.len(), 7),
            other => panic!("expected a prompt, got {other:?}"),
        }
        assert_eq!(dispatcher.registry().active_count(), 1);
    }

    #[tokio::test]
    async fn restart_discards_the_previous_session_state() {
        let dispatcher = dispatcher();
        let chat = chat("C1");

        dispatcher.on_message(&chat, "/start").await.expect("start");
        dispatcher.on_message(&chat, "🎨 Холст").await.expect("material");
        dispatcher.on_message(&chat, "/start").await.expect("restart");

        // Back on the material stage: size text must be rejected as a
        // material choice, proving nothing leaked from the first run.
        dispatcher.on_message(&chat, "2x2").await.expect("step");
        match dispatcher.transport().last() {
            Outbound::Prompt { text, choices } => {
                assert!(text.contains("из предложенного списка"), "text was: {text}");
                assert_eq!(choices.len(), 7);
            }
            other => panic!("expected a re-prompt, got {other:?}"),
        }
        assert_eq!(dispatcher.registry().active_count(), 1);
    }

    #[tokio::test]
    async fn cancel_destroys_the_session_and_acknowledges() {
        let dispatcher = dispatcher();
        let chat = chat("C1");

        dispatcher.on_message(&chat, "/start").await.expect("start");
        dispatcher.on_message(&chat, "🎨 Холст").await.expect("material");
        dispatcher.on_message(&chat, "/cancel").await.expect("cancel");

        assert_eq!(dispatcher.transport().last(), Outbound::Cancelled);
        assert_eq!(dispatcher.registry().active_count(), 0);
    }

    #[tokio::test]
    async fn cancel_without_a_session_still_acknowledges() {
        let dispatcher = dispatcher();
        let chat = chat("C1");

        dispatcher.on_message(&chat, "/cancel").await.expect("cancel");
        assert_eq!(dispatcher.transport().last(), Outbound::Cancelled);
    }

    #[tokio::test]
    async fn text_without_a_session_gets_the_start_hint() {
        let dispatcher = dispatcher();
        let chat = chat("C1");

        dispatcher.on_message(&chat, "2.5x1.8").await.expect("stray text");
        match dispatcher.transport().last() {
            Outbound::Prompt { text, choices } => {
                assert!(text.contains("/start"));
                assert!(choices.is_empty());
            }
            other => panic!("expected a hint, got {other:?}"),
        }
        assert_eq!(dispatcher.registry().active_count(), 0);
    }

    #[tokio::test]
    async fn invalid_input_keeps_the_session_alive() {
        let dispatcher = dispatcher();
        let chat = chat("C1");

        dispatcher.on_message(&chat, "/start").await.expect("start");
        dispatcher.on_message(&chat, "🎨 Холст").await.expect("material");
        dispatcher.on_message(&chat, "abc").await.expect("bad size");
        dispatcher.on_message(&chat, "11x1").await.expect("oversized");

        assert_eq!(dispatcher.registry().active_count(), 1);
        dispatcher.on_message(&chat, "2x2").await.expect("good size");
        dispatcher.on_message(&chat, "1").await.expect("quantity");
        dispatcher.on_message(&chat, "Ламинирование").await.expect("finishing");
        assert_eq!(
            dispatcher.transport().last(),
            Outbound::Quote { total: Decimal::from(2200) }
        );
    }

    #[tokio::test]
    async fn help_never_touches_the_registry() {
        let dispatcher = dispatcher();
        let chat = chat("C1");

        dispatcher.on_message(&chat, "/help").await.expect("help");
        assert_eq!(dispatcher.transport().last(), Outbound::Help);
        assert_eq!(dispatcher.registry().active_count(), 0);
    }

    #[tokio::test]
    async fn unknown_command_gets_a_short_reply() {
        let dispatcher = dispatcher();
        let chat = chat("C1");

        dispatcher.on_message(&chat, "/restart").await.expect("unknown");
        match dispatcher.transport().last() {
            Outbound::Prompt { text, .. } => assert!(text.contains("/restart")),
            other => panic!("expected a reply, got {other:?}"),
        }
        assert_eq!(dispatcher.registry().active_count(), 0);
    }

    #[tokio::test]
    async fn sessions_for_different_chats_are_independent() {
        let dispatcher = dispatcher();
        let first = chat("C1");
        let second = chat("C2");

        dispatcher.on_message(&first, "/start").await.expect("start first");
        dispatcher.on_message(&second, "/start").await.expect("start second");
        dispatcher.on_message(&first, "🎨 Холст").await.expect("material first");
        dispatcher.on_message(&second, "/cancel").await.expect("cancel second");

        assert_eq!(dispatcher.registry().active_count(), 1);
        dispatcher.on_message(&first, "1x2").await.expect("size first");
        dispatcher.on_message(&first, "3").await.expect("quantity first");
        dispatcher.on_message(&first, "Без отделки").await.expect("finishing first");
        assert_eq!(
            dispatcher.transport().last(),
            Outbound::Quote { total: Decimal::from(3000) }
        );
    }
}
