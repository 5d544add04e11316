/// Line-oriented terminal front-end for a [`Session`]
///
/// Each line is one user event. Field edits are applied as a keystroke edit
/// followed by an immediate commit; only `focus`/`blur` move the focus.
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::render::render;
use crate::selection::Field;
use crate::session::Session;

pub const HELP: &str = "\
Commands:
  search <BV id or link>   fetch the part list
  from <n> | to <n>        set the first / last selected part
  speed <x>                set the playback speed (min 0.1)
  focus from|to            focus a field; the next click sets that bound
  blur                     leave the focused field
  click <page>             click a part in the list
  show                     print the current state
  help                     print this help
  quit                     exit";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Search(String),
    Edit(Field, String),
    Focus(Field),
    Blur,
    Click(usize),
    Show,
    Help,
    Quit,
}

fn parse_field(name: &str) -> Option<Field> {
    match name {
        "from" => Some(Field::From),
        "to" => Some(Field::To),
        "speed" => Some(Field::Speed),
        _ => None,
    }
}

pub fn parse_command(line: &str) -> std::result::Result<ReplCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb {
        "search" | "s" => Ok(ReplCommand::Search(rest.to_string())),
        "from" => Ok(ReplCommand::Edit(Field::From, rest.to_string())),
        "to" => Ok(ReplCommand::Edit(Field::To, rest.to_string())),
        "speed" => Ok(ReplCommand::Edit(Field::Speed, rest.to_string())),
        "focus" => parse_field(rest)
            .map(ReplCommand::Focus)
            .ok_or_else(|| format!("unknown field '{}'", rest)),
        "blur" => Ok(ReplCommand::Blur),
        "click" | "c" => match rest.parse::<usize>() {
            Ok(page) if page >= 1 => Ok(ReplCommand::Click(page)),
            _ => Err(format!("'{}' is not a part number", rest)),
        },
        "show" | "" => Ok(ReplCommand::Show),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command '{}' (try 'help')", other)),
    }
}

/// Feed lines from `input` into `session` until EOF or `quit`
pub async fn run<R, W>(session: &Session, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut focused: Option<Field> = None;

    writeln!(out, "{}", HELP)?;

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };
        debug!("REPL command: {:?}", command);

        match command {
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            ReplCommand::Search(input) => {
                // Failures are already on the snapshot's error line
                let _ = session.search(&input).await;
            }
            ReplCommand::Edit(field, text) => {
                // Atomic edit: focus is left as it was
                match field {
                    Field::From => session.on_from_change(&text),
                    Field::To => session.on_to_change(&text),
                    Field::Speed => session.on_speed_change(&text),
                }
                session.commit_field(field);
            }
            ReplCommand::Focus(field) => {
                session.on_focus(field);
                focused = Some(field);
            }
            ReplCommand::Blur => {
                if let Some(field) = focused.take() {
                    session.on_blur(field);
                }
            }
            ReplCommand::Click(page) => {
                // Rejections surface as the transient message
                let _ = session.on_part_click(page - 1);
            }
            ReplCommand::Show => {}
        }

        write!(out, "{}", render(&session.snapshot()))?;
        out.flush()?;
    }

    Ok(())
}
