//! Terminal command parsing
//!
//! Known keywords map to controller actions; any other line is the new
//! content of the search box.

use geli_common::api::{Answer, ExternalId, Tier};
use geli_common::{Error, MediaType, Result};

use crate::modal::DismissTrigger;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the search box text
    Search(String),
    /// Activate the n-th result card (1-based)
    Open(usize),
    Tier(Tier),
    Dismiss(DismissTrigger),
    Answer(Answer),
    Remove { external_id: ExternalId, name: String },
    Media(MediaType),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match (word.to_ascii_lowercase().as_str(), rest.is_empty()) {
            ("quit" | "exit", true) => Command::Quit,
            ("help" | "?", true) => Command::Help,
            ("clear", true) => Command::Search(String::new()),
            ("close", true) => Command::Dismiss(DismissTrigger::CloseControl),
            ("outside", true) => Command::Dismiss(DismissTrigger::OutsideClick),
            ("esc", true) => Command::Dismiss(DismissTrigger::CancelKey),
            ("like" | "neutral" | "dislike", true) => Command::Tier(word.parse()?),
            ("better" | "worse", true) => Command::Answer(word.parse()?),
            ("open", false) => {
                let index: usize = rest
                    .parse()
                    .map_err(|_| Error::InvalidInput(format!("Not a card number: {}", rest)))?;
                if index == 0 {
                    return Err(Error::InvalidInput("Cards are numbered from 1".to_string()));
                }
                Command::Open(index)
            }
            ("media", false) => Command::Media(rest.parse()?),
            ("remove", false) => {
                let (id, name) = rest.split_once(char::is_whitespace).ok_or_else(|| {
                    Error::InvalidInput("usage: remove <external_id> <name>".to_string())
                })?;
                Command::Remove {
                    external_id: id.parse()?,
                    name: name.trim().to_string(),
                }
            }
            ("search", false) => Command::Search(rest.to_string()),
            _ => Command::Search(line.to_string()),
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
<text>                    search (at least 2 characters)
clear                     clear the search box
open <n>                  rate the n-th result
like | neutral | dislike  choose a tier in the rating modal
close | outside | esc     dismiss the rating modal
better | worse            answer the current comparison
remove <id> <name>        remove a ranked item
media <games|books|movies|tv>
quit";
