//! Folder-level processing.
//!
//! A [`FileList`] owns the [`AudioFile`]s of one folder. It is rebuilt from
//! disk on every scan, which also recomputes the join groups and the
//! leader/follower roles derived from them. [`FileList::proceed`] runs one
//! full pass: backup, role assignment, per-file actions, rescan.

mod listing;
mod report;


pub use listing::list;
pub use report::{FileReport, FolderReport, FolderSummary};

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::action::Action;
use crate::audio_file::{AudioFile, JoinRole, Outcome};
use crate::backup::BackupManager;
use crate::error::Result;
use crate::join_groups::{self, JoinGroups};
use crate::options::Options;
use crate::resolver;

/// The audio files of one folder, in listing order.
#[derive(Debug)]
pub struct FileList {
    folder: PathBuf,
    options: Options,
    files: Vec<AudioFile>,
    join_groups: JoinGroups,
    backups: BackupManager,
}

impl FileList {
    /// Lists and analyzes the audio files in `folder`.
    pub fn scan(folder: impl Into<PathBuf>, options: &Options) -> Result<Self> {
        options.validate()?;
        let mut list = Self {
            folder: folder.into(),
            options: options.clone(),
            files: Vec::new(),
            join_groups: JoinGroups::default(),
            backups: BackupManager::new(),
        };
        list.rescan()?;
        Ok(list)
    }

    /// Points the list at another folder and rescans.
    pub fn set_folder(&mut self, folder: impl Into<PathBuf>) -> Result<()> {
        self.folder = folder.into();
        self.rescan()
    }

    /// Rebuilds every file and derived view from disk.
    pub fn rescan(&mut self) -> Result<()> {
        let paths = listing::list(&self.folder, &self.options)?;
        self.files = paths
            .into_iter()
            .map(|path| AudioFile::open(path, &self.options))
            .collect();
        self.join_groups = join_groups::detect(&self.files, &self.options.delimiter);
        self.assign_roles();
        tracing::debug!(
            "scanned {}: {} files, {} join groups",
            self.folder.display(),
            self.files.len(),
            self.join_groups.len()
        );
        Ok(())
    }

    /// Members that the resolver will remove take no part in their group's
    /// join: the leader is the first remaining member and a group left with
    /// a single member assigns no roles.
    fn assign_roles(&mut self) {
        let removed: HashSet<PathBuf> = self
            .files
            .iter()
            .filter(|f| resolver::resolve(f, &self.options) == Action::Remove)
            .map(|f| f.path().to_path_buf())
            .collect();

        for file in &mut self.files {
            let Some((group, _)) = self.join_groups.find_member(file.path()) else {
                file.set_join_role(None);
                file.set_group_size(None);
                continue;
            };
            file.set_group_size(Some(group.members.len()));

            let remaining: Vec<&PathBuf> = group
                .members
                .iter()
                .filter(|p| !removed.contains(*p))
                .collect();
            let role = match remaining.split_first() {
                Some((leader, peers)) if !peers.is_empty() && !removed.contains(file.path()) => {
                    if leader.as_path() == file.path() {
                        Some(JoinRole::Leader {
                            peers: peers.iter().map(|p| p.to_path_buf()).collect(),
                            newfile: group.base.clone(),
                        })
                    } else {
                        Some(JoinRole::Follower {
                            leader: leader.to_path_buf(),
                        })
                    }
                }
                _ => None,
            };
            file.set_join_role(role);
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn files(&self) -> &[AudioFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AudioFile> {
        self.files.iter()
    }

    /// File at `path`, if listed.
    pub fn get(&self, path: &Path) -> Option<&AudioFile> {
        self.files.iter().find(|f| f.path() == path)
    }

    /// Mutable access, e.g. to set an explicit action before [`proceed`](Self::proceed).
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut AudioFile> {
        self.files.iter_mut().find(|f| f.path() == path)
    }

    /// File names without extension.
    pub fn filenames(&self) -> Vec<String> {
        self.files.iter().map(AudioFile::filename).collect()
    }

    /// File names with extension.
    pub fn basenames(&self) -> Vec<String> {
        self.files.iter().map(AudioFile::basename).collect()
    }

    pub fn filepaths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path().to_path_buf()).collect()
    }

    /// Files known to be silent.
    pub fn empty_files(&self) -> Vec<&AudioFile> {
        self.files
            .iter()
            .filter(|f| f.is_silent() == Some(true))
            .collect()
    }

    /// Files known to be fake stereo.
    pub fn fake_stereo_files(&self) -> Vec<&AudioFile> {
        self.files
            .iter()
            .filter(|f| f.is_fake_stereo() == Some(true))
            .collect()
    }

    /// Files known to be multichannel.
    pub fn multichannel_files(&self) -> Vec<&AudioFile> {
        self.files
            .iter()
            .filter(|f| f.is_multichannel() == Some(true))
            .collect()
    }

    pub fn join_groups(&self) -> &JoinGroups {
        &self.join_groups
    }

    /// Action `file` receives from [`proceed`](Self::proceed).
    pub fn planned_action(&self, file: &AudioFile) -> Action {
        planned_action(file, &self.options)
    }

    /// Copies every file into a fresh backup folder.
    ///
    /// In read-only mode (global or backup-only) the destinations are
    /// computed and returned but nothing is created.
    pub fn backup(&mut self) -> Result<Vec<PathBuf>> {
        if self.files.is_empty() {
            return Ok(vec![]);
        }
        let settings = &self.options.backup_options;
        let read_only = self.options.read_only || settings.read_only;
        let folder = self
            .backups
            .backup_folder(&self.folder, &settings.folder, settings.unique);
        if !read_only {
            fs::create_dir_all(&folder)?;
        }

        let mut copies = Vec::with_capacity(self.files.len());
        for file in self.files.iter().filter(|f| f.path().exists()) {
            let destination = self.backups.backup_file(&folder, &file.basename());
            copies.push(file.backup(&destination, read_only)?);
        }
        tracing::info!(
            "backed up {} files to {}{}",
            copies.len(),
            folder.display(),
            if read_only { " (read-only)" } else { "" }
        );
        Ok(copies)
    }

    /// Runs one orchestration pass over the folder.
    ///
    /// A backup failure aborts the pass before anything is mutated. After
    /// that, failures are recorded in the file's report and the pass moves
    /// on to the next file. Joins run after every other action so that
    /// removed and monoized group members are settled first.
    pub fn proceed(&mut self) -> Result<FolderReport> {
        let backups = if self.options.backup {
            self.backup()?
        } else {
            vec![]
        };
        let join_groups = self.join_groups.iter().cloned().collect();

        let planned: Vec<Action> = self
            .files
            .iter()
            .map(|f| planned_action(f, &self.options))
            .collect();
        let order: Vec<usize> = (0..planned.len())
            .filter(|&i| planned[i] != Action::Join)
            .chain((0..planned.len()).filter(|&i| planned[i] == Action::Join))
            .collect();

        let mut consumed: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut reports: Vec<Option<FileReport>> = vec![None; self.files.len()];
        for index in order {
            let file = &mut self.files[index];
            let path = file.path().to_path_buf();
            if let Some(into) = consumed.get(&path) {
                file.mark_removed();
                let outcome = Outcome::Consumed { into: into.clone() };
                reports[index] = Some(FileReport::completed(path, Action::Join, outcome));
                continue;
            }

            let action = planned[index];
            file.set_action(action);
            reports[index] = Some(match file.proceed(&self.options) {
                Ok(applied) => {
                    if let Outcome::Joined { path: merged, removed } = &applied.outcome {
                        for source in removed {
                            consumed.insert(source.clone(), merged.clone());
                        }
                    }
                    FileReport::completed(path, applied.action, applied.outcome)
                }
                Err(e) => {
                    tracing::warn!("{} ({}): {}", path.display(), action, e);
                    FileReport::failed(path, action, e.to_string())
                }
            });
        }

        // Followers were reported before the join that consumed them.
        let mut reports: Vec<FileReport> = reports.into_iter().flatten().collect();
        for report in &mut reports {
            if report.outcome == Some(Outcome::Unchanged) {
                if let Some(into) = consumed.get(&report.path) {
                    report.action = Action::Join;
                    report.outcome = Some(Outcome::Consumed { into: into.clone() });
                    report.applied = true;
                }
            }
        }

        let report = FolderReport::new(
            self.folder.clone(),
            self.options.read_only,
            backups,
            join_groups,
            reports,
        );
        tracing::info!(
            "{}: {} changed, {} unchanged, {} errors",
            self.folder.display(),
            report.summary.applied,
            report.summary.unchanged,
            report.summary.errors
        );

        if let Err(e) = self.rescan() {
            tracing::warn!("rescan of {} failed: {}", self.folder.display(), e);
        }
        Ok(report)
    }
}

/// Explicit actions win, everything else goes through the resolver.
fn planned_action(file: &AudioFile, options: &Options) -> Action {
    match file.action() {
        Action::Default => resolver::resolve(file, options),
        explicit => explicit,
    }
}

impl<'a> IntoIterator for &'a FileList {
    type Item = &'a AudioFile;
    type IntoIter = std::slice::Iter<'a, AudioFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
