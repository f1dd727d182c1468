//! Chat shell for the printing quote bot:
//! - **Commands** (`commands`) - `/start`, `/cancel`, `/help` classification
//! - **Dispatch** (`dispatch`) - session registry + routing into the core
//!   state machine over the `ChatTransport` trait
//! - **Render** (`render`) - plain-text prompts, quote reports and help
//!
//! A concrete platform binding implements [`dispatch::ChatTransport`] and
//! feeds inbound updates to [`dispatch::Dispatcher::on_message`] /
//! [`dispatch::Dispatcher::on_command`]. The shell serializes work per chat
//! through per-session locks; the core stays free of I/O.

pub mod commands;
pub mod dispatch;
pub mod render;

pub use commands::{classify_inbound, BotCommand, Inbound};
pub use dispatch::{ChatId, ChatTransport, Dispatcher, SessionRegistry, TransportError};
