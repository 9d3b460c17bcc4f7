//! Interactive terminal front end.
//!
//! Reads one line at a time, dispatches slash commands, and submits
//! everything else to the conversation controller. Reader and writer are
//! generic so the loop can be driven from memory in tests.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use disputare_chat::render::{render_lines, to_terminal};
use disputare_chat::session::DISCLAIMER_LINES;
use disputare_chat::{CompletionTransport, ConversationController, SessionState, SubmitOutcome};
use disputare_core::types::{Depth, Sender, Turn};

const HELP: &str = "\
Commands:
  /depth            list depths
  /depth <name>     set depth (casual, thoughtful, deep, socratic)
  /time             show session time
  /history          reprint the conversation
  /help             show this help
  /quit             leave
Anything else is sent as your opinion.";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Quit,
    Help,
    Time,
    History,
    ListDepths,
    SetDepth(Depth),
    InvalidDepth(String),
    Unknown(String),
    Message(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Message(line.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name.as_str() {
        "quit" | "exit" | "q" => Command::Quit,
        "help" | "?" => Command::Help,
        "time" => Command::Time,
        "history" => Command::History,
        "depth" if arg.is_empty() => Command::ListDepths,
        "depth" => match arg.parse::<Depth>() {
            Ok(depth) => Command::SetDepth(depth),
            Err(_) => Command::InvalidDepth(arg.to_string()),
        },
        _ => Command::Unknown(trimmed.to_string()),
    }
}

/// Format one turn for the terminal.
///
/// Assistant turns get a header with the icon of `depth`; their body is
/// sanitized and split at bullet markers.
pub fn format_turn(turn: &Turn, depth: Depth) -> String {
    match turn.sender {
        Sender::User => format!("you> {}", to_terminal(&turn.text)),
        Sender::Assistant => {
            let mut out = format!("{} AI Assistant", depth.icon().glyph());
            for line in render_lines(&turn.text) {
                out.push_str("\n  ");
                out.push_str(&line.to_string());
            }
            out
        }
    }
}

fn prompt(session: &SessionState, depth: Depth) -> String {
    format!("[{}] {} {}> ", session.elapsed(), depth.icon().glyph(), depth)
}

/// Print the disclaimer and wait for acknowledgement.
///
/// Enter, `y` or `yes` acknowledges. Anything else, or EOF, declines.
pub async fn acknowledge_disclaimer<R, W>(
    session: &mut SessionState,
    input: &mut R,
    out: &mut W,
) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Disclaimer")?;
    writeln!(
        out,
        "Welcome to Disputare, an AI-powered discussion platform. Please read this disclaimer carefully:"
    )?;
    for line in DISCLAIMER_LINES {
        writeln!(out, "  - {}", line)?;
    }
    writeln!(
        out,
        "By continuing to use Disputare, you acknowledge that you have read and understood this disclaimer."
    )?;
    write!(out, "I understand [Y/n] ")?;
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer).await? == 0 {
        return Ok(false);
    }
    let accepted = matches!(answer.trim().to_ascii_lowercase().as_str(), "" | "y" | "yes");
    if accepted {
        session.acknowledge();
    }
    Ok(accepted)
}

/// Run the conversation loop until `/quit` or EOF.
pub async fn run<T, R, W>(
    controller: &ConversationController<T>,
    session: &SessionState,
    input: &mut R,
    out: &mut W,
) -> std::io::Result<()>
where
    T: CompletionTransport,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Tell me your opinion... (/help for commands)")?;

    loop {
        write!(out, "{}", prompt(session, controller.depth()))?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            writeln!(out)?;
            break;
        }

        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Time => writeln!(out, "Session Time: {}", session.elapsed())?,
            Command::History => {
                let depth = controller.depth();
                for turn in controller.transcript() {
                    writeln!(out, "{}", format_turn(&turn, depth))?;
                }
            }
            Command::ListDepths => {
                let current = controller.depth();
                for depth in Depth::ALL {
                    let marker = if depth == current { "*" } else { " " };
                    writeln!(out, " {} {} {}", marker, depth.icon().glyph(), depth)?;
                }
            }
            Command::SetDepth(depth) => {
                controller.set_depth(depth);
                writeln!(out, "Depth set to {}", depth)?;
            }
            Command::InvalidDepth(name) => {
                writeln!(out, "Unknown depth '{}'. Try /depth to list them.", name)?;
            }
            Command::Unknown(cmd) => writeln!(out, "Unknown command {}. Try /help.", cmd)?,
            Command::Message(text) => {
                if text.trim().is_empty() {
                    continue;
                }
                writeln!(out, "thinking...")?;
                out.flush()?;
                match controller.submit(&text).await {
                    SubmitOutcome::Replied(turn) => {
                        writeln!(out, "{}", format_turn(&turn, controller.depth()))?;
                    }
                    SubmitOutcome::Rejected => {
                        writeln!(out, "Still thinking about your last message.")?;
                    }
                    SubmitOutcome::Ignored => {}
                }
            }
        }
    }

    tracing::debug!(turns = controller.len(), "Conversation loop finished");
    Ok(())
}
