use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use printquote_chat::{render, ChatId, ChatTransport, Dispatcher, TransportError};
use printquote_core::Quote;

/// Stdin/stdout transport for local runs. Closed-choice prompts are printed
/// as a numbered menu and answers may be given either by number or by the
/// full label.
#[derive(Default)]
pub struct ConsoleTransport {
    last_choices: Mutex<Vec<String>>,
}

impl ConsoleTransport {
    /// Maps a typed menu number back to its label; anything else is passed
    /// through untouched by the caller.
    pub fn resolve_choice(&self, input: &str) -> Option<String> {
        let index: usize = input.trim().parse().ok()?;
        let choices = self.last_choices.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        choices.get(index.checked_sub(1)?).cloned()
    }

    fn remember_choices(&self, choices: &[String]) {
        let mut last = self.last_choices.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *last = choices.to_vec();
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn prompt(
        &self,
        _chat: &ChatId,
        text: &str,
        choices: &[String],
    ) -> Result<(), TransportError> {
        self.remember_choices(choices);
        println!("\n{text}");
        for (index, choice) in choices.iter().enumerate() {
            println!("  {}. {choice}", index + 1);
        }
        Ok(())
    }

    async fn report_quote(&self, _chat: &ChatId, quote: &Quote) -> Result<(), TransportError> {
        self.remember_choices(&[]);
        println!("\n{}", render::quote_report(quote));
        Ok(())
    }

    async fn report_cancelled(&self, _chat: &ChatId) -> Result<(), TransportError> {
        self.remember_choices(&[]);
        println!("\n{}", render::cancelled_message());
        Ok(())
    }

    async fn report_help(&self, _chat: &ChatId, text: &str) -> Result<(), TransportError> {
        println!("\n{text}");
        Ok(())
    }
}

/// Drives a single local session over stdin until EOF or ctrl-c.
pub async fn run(dispatcher: &Dispatcher<ConsoleTransport>) -> Result<()> {
    let chat = ChatId("console".to_owned());
    println!("printquote console. /start начинает расчет, /help - справка.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let input = dispatcher
                    .transport()
                    .resolve_choice(trimmed)
                    .unwrap_or_else(|| trimmed.to_owned());
                dispatcher.on_message(&chat, &input).await?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ConsoleTransport;

    #[test]
    fn numbers_resolve_to_remembered_choices() {
        let transport = ConsoleTransport::default();
        transport.remember_choices(&["Холст".to_owned(), "Баннер".to_owned()]);

        assert_eq!(transport.resolve_choice("1"), Some("Холст".to_owned()));
        assert_eq!(transport.resolve_choice(" 2 "), Some("Баннер".to_owned()));
        assert_eq!(transport.resolve_choice("0"), None);
        assert_eq!(transport.resolve_choice("3"), None);
        assert_eq!(transport.resolve_choice("Холст"), None);
    }

    #[test]
    fn free_text_prompts_clear_the_menu() {
        let transport = ConsoleTransport::default();
        transport.remember_choices(&["Холст".to_owned()]);
        transport.remember_choices(&[]);
        assert_eq!(transport.resolve_choice("1"), None);
    }
}
