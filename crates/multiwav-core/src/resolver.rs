//! Default action resolution.
//!
//! Rules are evaluated in order and the first match wins: silence first,
//! redundant stereo second, join groups third.

use crate::action::Action;
use crate::audio_file::{AudioFile, JoinRole};
use crate::options::Options;

/// Decides what a file in [`Action::Default`] should become.
pub fn resolve(file: &AudioFile, options: &Options) -> Action {
    if file.is_silent() == Some(true) {
        return if options.remove {
            Action::Remove
        } else {
            Action::None
        };
    }

    if file.is_fake_stereo() == Some(true) {
        return if options.monoize {
            Action::Monoize
        } else {
            Action::None
        };
    }

    match file.join_role() {
        Some(JoinRole::Leader { peers, .. }) if options.join && !peers.is_empty() => Action::Join,
        // Consumed by the leader's join.
        Some(JoinRole::Follower { .. }) => Action::None,
        _ => Action::None,
    }
}
