//! Move route script decoding
//!
//! Script entries (`code 45`) whose line calls one of the branch or effect
//! helpers become typed `RouteCommand`s. Every other entry stays with the host.

use crate::command::{codes, Command};
use crate::condition::{self, AstNode};
use crate::error::{EventAiError, Result};
use crate::host::SoundEffect;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

const DEFAULT_SE_VOLUME: u32 = 90;
const DEFAULT_SE_PITCH: u32 = 100;

static HELPER_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:this\s*\.\s*)?([A-Za-z_]\w*)\s*\((.*)\)\s*;?\s*$")
        .expect("helper call pattern is valid")
});

/// One entry of a move route, after decoding
#[derive(Debug, Clone, PartialEq)]
pub enum RouteCommand {
    /// `rbIf(cond)`
    If(AstNode),
    /// `rbElse(cond)`
    ElseIf(AstNode),
    /// `rbElse()`
    Else,
    /// `rbEnd()`
    End,
    /// `setSe(name, volume, pitch, pan)`
    SetSound(SoundEffect),
    /// `unsetSe()`
    UnsetSound,
    /// `setBln(balloon)`
    SetBalloon(i32),
    /// `unsetBln()`
    UnsetBalloon,
    /// `showBln(balloon)`
    ShowBalloon(i32),
    /// An effect helper whose arguments could not be read; does nothing
    Unreadable,
    /// Anything the host runs itself
    Host(Command),
}

impl RouteCommand {
    /// Decode one route entry
    ///
    /// Only script entries calling a known helper are taken over. An
    /// unreadable condition is logged and never holds; an effect helper with
    /// unreadable arguments is logged and does nothing.
    pub fn decode(command: &Command) -> Self {
        if command.code != codes::ROUTE_SCRIPT {
            return Self::Host(command.clone());
        }
        let Some(line) = command.str_param(0) else {
            return Self::Host(command.clone());
        };
        let Some(captures) = HELPER_CALL.captures(line) else {
            return Self::Host(command.clone());
        };
        let inner = captures[2].trim();

        match captures[1].to_ascii_lowercase().as_str() {
            "rbif" => Self::If(route_condition(inner)),
            "rbelse" if inner.is_empty() => Self::Else,
            "rbelse" => Self::ElseIf(route_condition(inner)),
            "rbend" => Self::End,
            "setse" => effect(line, sound_effect(inner).map(Self::SetSound)),
            "unsetse" => Self::UnsetSound,
            "setbln" => effect(line, balloon_id(inner).map(Self::SetBalloon)),
            "unsetbln" => Self::UnsetBalloon,
            "showbln" => effect(line, balloon_id(inner).map(Self::ShowBalloon)),
            _ => Self::Host(command.clone()),
        }
    }
}

fn effect(line: &str, decoded: Result<RouteCommand>) -> RouteCommand {
    decoded.unwrap_or_else(|err| {
        warn!(line, %err, "unreadable move route effect, ignored");
        RouteCommand::Unreadable
    })
}

fn route_condition(inner: &str) -> AstNode {
    let text = unquote(inner);
    match condition::get_or_parse(text) {
        Ok(ast) => ast,
        Err(err) => {
            warn!(condition = text, %err, "unreadable move route condition, treated as false");
            AstNode::Literal(false)
        }
    }
}

fn sound_effect(inner: &str) -> Result<SoundEffect> {
    let args = split_args(inner);
    let name = args.first().map(|arg| unquote(arg)).unwrap_or_default();
    let mut sound = SoundEffect::new(
        name,
        numeric_arg(&args, 1)?.unwrap_or(DEFAULT_SE_VOLUME),
        numeric_arg(&args, 2)?.unwrap_or(DEFAULT_SE_PITCH),
    );
    sound.pan = numeric_arg(&args, 3)?.unwrap_or(0);
    Ok(sound)
}

fn numeric_arg<T: std::str::FromStr>(args: &[&str], index: usize) -> Result<Option<T>> {
    match args.get(index).map(|arg| unquote(arg)) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| EventAiError::InvalidCommand(format!("Invalid sound argument: {}", text))),
    }
}

/// Balloon by number or by its editor name
fn balloon_id(inner: &str) -> Result<i32> {
    let text = unquote(inner);
    if let Ok(id) = text.parse() {
        return Ok(id);
    }
    let normalized: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let id = match normalized.as_str() {
        "exclamation" => 1,
        "question" => 2,
        "musicnote" | "music" => 3,
        "heart" => 4,
        "anger" => 5,
        "sweat" => 6,
        "frustration" | "cobweb" => 7,
        "silence" => 8,
        "lightbulb" => 9,
        "zzz" => 10,
        _ => {
            return Err(EventAiError::InvalidCommand(format!(
                "Unknown balloon: {}",
                text
            )))
        }
    };
    Ok(id)
}

/// Split call arguments on commas outside quotes
fn split_args(inner: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut quote = None;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match (quote, c) {
            (None, '\'' | '"' | '`') => quote = Some(c),
            (Some(open), _) if c == open => quote = None,
            (None, ',') => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = inner[start..].trim();
    if !last.is_empty() || !args.is_empty() {
        args.push(last);
    }
    args
}

fn unquote(text: &str) -> &str {
    let text = text.trim();
    for quote in ['\'', '"', '`'] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}
