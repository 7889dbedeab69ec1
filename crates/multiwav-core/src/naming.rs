//! Channel naming convention: `<base><delimiter><token>`.
//!
//! A token is either a single letter (`L`, `R`, ...) or a positive decimal
//! integer (1-based channel index). Only the last delimiter is considered.

use std::cmp::Ordering;
use std::fmt;

/// Channel discriminator parsed from a filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelToken {
    /// Letter-coded channel (e.g. `L`, `R`).
    Letter(char),
    /// 1-based numeric channel.
    Index(u32),
}

impl ChannelToken {
    /// Parses a token, rejecting anything that is not a single letter or a
    /// positive integer.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_alphabetic() => return Some(Self::Letter(c)),
            (None, _) => return None,
            _ => {}
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match s.parse::<u32>() {
            Ok(n) if n > 0 => Some(Self::Index(n)),
            _ => None,
        }
    }

    /// Token used when splitting channel `index` (0-based) of a file with
    /// `channels` channels: `L`/`R` for stereo, `1..=N` otherwise.
    pub fn for_split(index: usize, channels: usize) -> Self {
        if channels == 2 {
            Self::Letter(if index == 0 { 'L' } else { 'R' })
        } else {
            Self::Index(index as u32 + 1)
        }
    }

    /// 1-based channel number: `L` is 1 and `R` is 2, other letters count
    /// from `A`.
    pub fn number(&self) -> u32 {
        match self {
            Self::Index(n) => *n,
            Self::Letter(c) => match c.to_ascii_uppercase() {
                'L' => 1,
                'R' => 2,
                c if c.is_ascii_uppercase() => c as u32 - 'A' as u32 + 1,
                _ => 0,
            },
        }
    }
}

impl Ord for ChannelToken {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Index(a), Self::Index(b)) => a.cmp(b),
            (Self::Letter(a), Self::Letter(b)) => a.cmp(b),
            (Self::Index(_), Self::Letter(_)) => Ordering::Less,
            (Self::Letter(_), Self::Index(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for ChannelToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ChannelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter(c) => write!(f, "{}", c),
            Self::Index(n) => write!(f, "{}", n),
        }
    }
}

/// Result of splitting a filename on the channel delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Name without the channel suffix, or the whole name when there is none.
    pub base: String,
    /// Channel discriminator, if one was found.
    pub channel: Option<ChannelToken>,
}

/// Splits `filename` (without extension) on the last `delimiter`.
pub fn parse(filename: &str, delimiter: &str) -> ParsedName {
    let unsplit = || ParsedName {
        base: filename.to_string(),
        channel: None,
    };

    if delimiter.is_empty() {
        return unsplit();
    }

    let Some((base, suffix)) = filename.rsplit_once(delimiter) else {
        return unsplit();
    };

    match ChannelToken::parse(suffix) {
        Some(token) if !base.is_empty() => ParsedName {
            base: base.to_string(),
            channel: Some(token),
        },
        _ => unsplit(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_delimiter() {
        let parsed = parse("sin", ".");
        assert_eq!(parsed.base, "sin");
        assert_eq!(parsed.channel, None);
    }

    #[test]
    fn test_letter_suffix() {
        let parsed = parse("sin.R", ".");
        assert_eq!(parsed.base, "sin");
        assert_eq!(parsed.channel, Some(ChannelToken::Letter('R')));
        assert_eq!(parsed.channel.unwrap().number(), 2);
    }

    #[test]
    fn test_multiple_dots_split_on_last() {
        let parsed = parse("sin.wave.R", ".");
        assert_eq!(parsed.base, "sin.wave");
        assert_eq!(parsed.channel, Some(ChannelToken::Letter('R')));
    }

    #[test]
    fn test_word_suffix_is_rejected() {
        let parsed = parse("sin.wave", ".");
        assert_eq!(parsed.base, "sin.wave");
        assert_eq!(parsed.channel, None);
    }

    #[test]
    fn test_numeric_suffix() {
        let parsed = parse("take_12", "_");
        assert_eq!(parsed.base, "take");
        assert_eq!(parsed.channel, Some(ChannelToken::Index(12)));
    }

    #[test]
    fn test_zero_and_empty_suffix_rejected() {
        assert_eq!(parse("take.0", ".").channel, None);
        assert_eq!(parse("take.", ".").channel, None);
        assert_eq!(parse("take.1a", ".").channel, None);
        assert_eq!(parse(".L", ".").channel, None);
    }

    #[test]
    fn test_other_delimiter_ignored() {
        let parsed = parse("sin-m.L", "_");
        assert_eq!(parsed.base, "sin-m.L");
        assert_eq!(parsed.channel, None);
    }

    #[test]
    fn test_token_ordering() {
        let mut tokens = vec![
            ChannelToken::Index(10),
            ChannelToken::Index(2),
            ChannelToken::Index(1),
        ];
        tokens.sort();
        assert_eq!(
            tokens,
            vec![
                ChannelToken::Index(1),
                ChannelToken::Index(2),
                ChannelToken::Index(10)
            ]
        );
        assert!(ChannelToken::Letter('L') < ChannelToken::Letter('R'));
    }

    #[test]
    fn test_split_tokens() {
        assert_eq!(ChannelToken::for_split(0, 2).to_string(), "L");
        assert_eq!(ChannelToken::for_split(1, 2).to_string(), "R");
        assert_eq!(ChannelToken::for_split(2, 4).to_string(), "3");
    }
}
