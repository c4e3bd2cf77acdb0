//! Conversion of the uniform (system, history, prompt) triple into the two
//! native turn layouts.
//!
//! In both layouts the current prompt is the final entry and history keeps
//! its order, including duplicates.

use crate::types::{ChatTurn, TurnRole};

/// Native role names for one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleNames {
    pub system: &'static str,
    pub user: &'static str,
    pub assistant: &'static str,
}

impl RoleNames {
    /// `system` / `user` / `assistant`
    pub const STANDARD: RoleNames = RoleNames {
        system: "system",
        user: "user",
        assistant: "assistant",
    };

    /// `user` / `model`; the instruction travels in its own field.
    pub const GEMINI: RoleNames = RoleNames {
        system: "system",
        user: "user",
        assistant: "model",
    };

    pub fn for_turn(&self, role: TurnRole) -> &'static str {
        match role {
            TurnRole::User => self.user,
            TurnRole::Assistant => self.assistant,
        }
    }
}

/// One entry of a native turn list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTurn {
    pub role: &'static str,
    pub content: String,
}

impl NativeTurn {
    fn new(role: &'static str, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Turn list plus a dedicated instruction field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatedTurns {
    pub instruction: Option<String>,
    pub turns: Vec<NativeTurn>,
}

/// A blank instruction counts as no instruction.
pub fn system_instruction(system: Option<&str>) -> Option<&str> {
    system.filter(|s| !s.trim().is_empty())
}

/// Flat-turn layout: optional leading system entry, history, then prompt.
pub fn flat_turns(
    system: Option<&str>,
    history: &[ChatTurn],
    prompt: &str,
    roles: RoleNames,
) -> Vec<NativeTurn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    if let Some(instruction) = system_instruction(system) {
        turns.push(NativeTurn::new(roles.system, instruction));
    }
    turns.extend(history_turns(history, roles));
    turns.push(NativeTurn::new(roles.user, prompt));
    turns
}

/// Separated-instruction layout: history then prompt, with the instruction
/// carried beside the list.
pub fn separated_turns(
    system: Option<&str>,
    history: &[ChatTurn],
    prompt: &str,
    roles: RoleNames,
) -> SeparatedTurns {
    let mut turns: Vec<NativeTurn> = history_turns(history, roles).collect();
    turns.push(NativeTurn::new(roles.user, prompt));

    SeparatedTurns {
        instruction: system_instruction(system).map(str::to_string),
        turns,
    }
}

fn history_turns(
    history: &[ChatTurn],
    roles: RoleNames,
) -> impl Iterator<Item = NativeTurn> + '_ {
    history
        .iter()
        .map(move |turn| NativeTurn::new(roles.for_turn(turn.role), turn.content.clone()))
}
