//! Per-file action state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What should happen to a file when the folder is processed.
///
/// Only an explicit set changes the action; unrecognized input resolves to
/// [`Action::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    /// Let the resolver decide.
    #[default]
    Default,
    /// Collapse to one channel.
    Monoize,
    /// Delete the file.
    Remove,
    /// Write one file per channel.
    Split,
    /// Merge with the file's join peers.
    Join,
    /// Explicitly do nothing.
    None,
}

impl Action {
    /// All actions, in code order.
    pub const ALL: [Action; 6] = [
        Action::Default,
        Action::Monoize,
        Action::Remove,
        Action::Split,
        Action::Join,
        Action::None,
    ];

    /// Fixed display name used in reports and logs.
    pub fn name(self) -> &'static str {
        match self {
            Action::Default => "Default",
            Action::Monoize => "Monoize",
            Action::Remove => "Remove",
            Action::Split => "Split",
            Action::Join => "Join",
            Action::None => "None",
        }
    }

    /// Single-letter code (`D`, `M`, `R`, `S`, `J`, `N`).
    pub fn code(self) -> char {
        match self {
            Action::Default => 'D',
            Action::Monoize => 'M',
            Action::Remove => 'R',
            Action::Split => 'S',
            Action::Join => 'J',
            Action::None => 'N',
        }
    }

    /// Maps a code to an action; anything unknown becomes `Default`.
    pub fn from_code(code: char) -> Self {
        Self::ALL
            .into_iter()
            .find(|a| a.code() == code.to_ascii_uppercase())
            .unwrap_or_default()
    }

    /// True for actions that touch the filesystem.
    pub fn is_mutation(self) -> bool {
        !matches!(self, Action::Default | Action::None)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = std::convert::Infallible;

    /// Accepts a display name (case-insensitive) or a single-letter code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(action) = Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
        {
            return Ok(action);
        }
        let mut chars = s.chars();
        Ok(match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_code(c),
            _ => Action::Default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_roundtrip() {
        for action in Action::ALL {
            assert_eq!(Action::from_code(action.code()), action);
        }
    }

    #[test]
    fn test_unknown_codes_fall_back_to_default() {
        for code in ['A', 'B', 'C', 'E', '#'] {
            assert_eq!(Action::from_code(code), Action::Default);
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(Action::Monoize.to_string(), "Monoize");
        assert_eq!(Action::None.name(), "None");
        assert_eq!("remove".parse::<Action>().unwrap(), Action::Remove);
        assert_eq!("J".parse::<Action>().unwrap(), Action::Join);
        assert_eq!("explode".parse::<Action>().unwrap(), Action::Default);
    }

    #[test]
    fn test_default_and_none_do_not_mutate() {
        assert!(!Action::Default.is_mutation());
        assert!(!Action::None.is_mutation());
        assert!(Action::Split.is_mutation());
    }
}
