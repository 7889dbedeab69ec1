//! Detection of per-channel files belonging to the same take.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::audio_file::AudioFile;
use crate::naming::{self, ChannelToken};

/// Files sharing a base name, ordered by channel token.
///
/// The first member is the leader; the rest are followers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinGroup {
    /// Shared base name.
    pub base: String,
    /// Member paths in channel order (at least two).
    pub members: Vec<PathBuf>,
}

impl JoinGroup {
    /// The member that performs the join.
    pub fn leader(&self) -> &PathBuf {
        &self.members[0]
    }

    /// Members consumed by the leader's join.
    pub fn followers(&self) -> &[PathBuf] {
        &self.members[1..]
    }
}

/// All join groups of one folder, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinGroups {
    groups: Vec<JoinGroup>,
}

impl JoinGroups {
    /// Group with the given base name.
    pub fn get(&self, base: &str) -> Option<&JoinGroup> {
        self.groups.iter().find(|g| g.base == base)
    }

    /// Group containing `path`, with the member's position in it.
    pub fn find_member(&self, path: &std::path::Path) -> Option<(&JoinGroup, usize)> {
        self.groups.iter().find_map(|g| {
            g.members
                .iter()
                .position(|m| m == path)
                .map(|index| (g, index))
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JoinGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every member of every group.
    pub fn members(&self) -> impl Iterator<Item = &PathBuf> {
        self.groups.iter().flat_map(|g| g.members.iter())
    }
}

impl<'a> IntoIterator for &'a JoinGroups {
    type Item = &'a JoinGroup;
    type IntoIter = std::slice::Iter<'a, JoinGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Groups `files` by base name.
///
/// One pass in listing order: files without a channel token are skipped, a
/// channel already claimed under a base keeps its first file, and bases with
/// a single member are dropped.
pub fn detect(files: &[AudioFile], delimiter: &str) -> JoinGroups {
    let mut order: Vec<String> = Vec::new();
    let mut claimed: BTreeMap<String, (String, Vec<(ChannelToken, PathBuf)>)> = BTreeMap::new();

    for file in files {
        let parsed = naming::parse(&file.filename(), delimiter);
        let Some(token) = parsed.channel else {
            continue;
        };
        let key = format!("{}{}", parsed.base, file.extension().to_lowercase());
        let (_, members) = claimed.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (parsed.base.clone(), Vec::new())
        });
        if members.iter().any(|(t, _)| *t == token) {
            tracing::debug!(
                "{} duplicates channel {} of '{}', skipped",
                file.path().display(),
                token,
                parsed.base
            );
            continue;
        }
        members.push((token, file.path().to_path_buf()));
    }

    let groups = order
        .into_iter()
        .filter_map(|key| {
            let (base, mut members) = claimed.remove(&key)?;
            if members.len() < 2 {
                return None;
            }
            members.sort_by(|a, b| a.0.cmp(&b.0));
            Some(JoinGroup {
                base,
                members: members.into_iter().map(|(_, path)| path).collect(),
            })
        })
        .collect();

    JoinGroups { groups }
}
