/// Commands the bot understands, plus a catch-all for anything else that
/// arrives with a leading slash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Cancel,
    Help,
    Unknown(String),
}

/// One inbound message, split into the command and free-text channels the
/// dispatcher routes on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    Command(BotCommand),
    Text(String),
}

/// Classifies a raw inbound message. Slash commands tolerate surrounding
/// whitespace, mixed case and an `@botname` suffix; everything else is stage
/// input for the state machine.
pub fn classify_inbound(raw: &str) -> Inbound {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Inbound::Text(trimmed.to_owned());
    };

    let token = rest.split_whitespace().next().unwrap_or_default();
    let name = token.split('@').next().unwrap_or(token).to_ascii_lowercase();
    let command = match name.as_str() {
        "start" => BotCommand::Start,
        "cancel" => BotCommand::Cancel,
        "help" => BotCommand::Help,
        _ => BotCommand::Unknown(name),
    };
    Inbound::Command(command)
}
