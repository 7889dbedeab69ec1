//! End-to-End Scenarios for multiwav-core
//!
//! These tests drive the public API against real folders:
//!
//! 1. Round trip - split followed by join restores the original channels
//! 2. Folder pass - per-channel takes merge, silence goes, fake stereo collapses
//! 3. Safety - size mismatches are refused, backups never collide
//! 4. Idempotence - repeating a completed operation changes nothing
//!
//! Fixtures are written with `hound` directly so the tests do not depend on
//! the crate's own encoder.

use std::fs;
use std::path::{Path, PathBuf};

use multiwav_core::{
    Action, AudioFile, BackupManager, FileList, JoinOptions, JoinOutcome, Options, Outcome,
};
use tempfile::TempDir;

fn write_wav(path: &Path, channels: &[Vec<i16>]) {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate: 48000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
    for frame in 0..frames {
        for channel in channels {
            writer.write_sample(channel[frame]).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn read_wav(path: &Path) -> (hound::WavSpec, Vec<Vec<i16>>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    let channels = (0..spec.channels as usize)
        .map(|c| {
            samples
                .iter()
                .skip(c)
                .step_by(spec.channels as usize)
                .copied()
                .collect()
        })
        .collect();
    (spec, channels)
}

/// Distinct, non-silent content per channel index.
fn tone(channel: usize, frames: usize) -> Vec<i16> {
    (0..frames)
        .map(|i| {
            let phase = i as f64 * 0.01 * (channel + 1) as f64;
            (phase.sin() * 12000.0 + ((i * (channel + 3)) % 17) as f64 * 300.0) as i16
        })
        .collect()
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_split_then_join_restores_channels() {
    for channel_count in 2..=6 {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("take.wav");
        let original: Vec<Vec<i16>> = (0..channel_count).map(|c| tone(c, 2000)).collect();
        write_wav(&path, &original);

        let mut file = AudioFile::open(&path, &Options::default());
        let parts = file.split(".").unwrap();
        assert_eq!(parts.len(), channel_count);
        assert!(!path.exists());

        let mut leader = AudioFile::open(&parts[0], &Options::default());
        let outcome = leader.join(&parts[1..], &JoinOptions::default()).unwrap();
        assert_eq!(
            outcome,
            JoinOutcome::Joined {
                path: path.clone(),
                removed: parts.clone(),
            }
        );

        let (spec, restored) = read_wav(&path);
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(restored, original, "{} channels", channel_count);
        assert_eq!(listing(tmp.path()), vec!["take.wav"]);
    }
}

// ============================================================================
// Folder pass
// ============================================================================

#[test]
fn test_left_right_take_becomes_one_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    write_wav(&dir.join("take.L.wav"), &[tone(0, 1000)]);
    write_wav(&dir.join("take.R.wav"), &[tone(1, 1000)]);

    let options = Options {
        backup: false,
        ..Options::default()
    };
    let mut list = FileList::scan(dir, &options).unwrap();
    let group = list.join_groups().get("take").unwrap();
    assert_eq!(
        group.members,
        vec![dir.join("take.L.wav"), dir.join("take.R.wav")]
    );

    let report = list.proceed().unwrap();
    assert!(report.success);
    assert_eq!(report.files[0].action, Action::Join);
    assert_eq!(listing(dir), vec!["take.wav"]);

    let (_, channels) = read_wav(&dir.join("take.wav"));
    assert_eq!(channels, vec![tone(0, 1000), tone(1, 1000)]);
}

#[test]
fn test_mixed_folder_pass_with_backup() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let same = tone(0, 1000);
    write_wav(&dir.join("fake.wav"), &[same.clone(), same.clone()]);
    write_wav(&dir.join("quiet.wav"), &[vec![0; 500], vec![0; 500]]);
    write_wav(&dir.join("kit.1.wav"), &[tone(1, 800)]);
    write_wav(&dir.join("kit.2.wav"), &[tone(2, 800)]);
    write_wav(&dir.join("kit.3.wav"), &[tone(3, 800)]);

    let mut list = FileList::scan(dir, &Options::default()).unwrap();
    assert_eq!(list.multichannel_files().len(), 3);
    let report = list.proceed().unwrap();

    assert!(report.success);
    assert_eq!(report.backups.len(), 5);
    assert_eq!(
        listing(&dir.join("bak")),
        vec!["fake.wav", "kit.1.wav", "kit.2.wav", "kit.3.wav", "quiet.wav"]
    );
    assert_eq!(listing(dir), vec!["bak", "fake.wav", "kit.wav"]);

    let (_, fake) = read_wav(&dir.join("fake.wav"));
    assert_eq!(fake, vec![same]);
    let (_, kit) = read_wav(&dir.join("kit.wav"));
    assert_eq!(kit.len(), 3);

    let consumed = report.file(&dir.join("kit.3.wav")).unwrap();
    assert_eq!(
        consumed.outcome,
        Some(Outcome::Consumed {
            into: dir.join("kit.wav")
        })
    );
}

#[test]
fn test_report_serializes_to_json() {
    let tmp = TempDir::new().unwrap();
    write_wav(&tmp.path().join("quiet.wav"), &[vec![0; 100]]);

    let options = Options {
        read_only: true,
        ..Options::default()
    };
    let mut list = FileList::scan(tmp.path(), &options).unwrap();
    let report = list.proceed().unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["read_only"], true);
    assert_eq!(json["files"][0]["action"], "Remove");
    assert_eq!(json["summary"]["total"], 1);
    assert!(tmp.path().join("quiet.wav").exists());
}

// ============================================================================
// Safety
// ============================================================================

#[test]
fn test_size_mismatch_is_refused_unless_forced() {
    let tmp = TempDir::new().unwrap();
    let one = tmp.path().join("long.1.wav");
    let two = tmp.path().join("long.2.wav");
    write_wav(&one, &[tone(0, 48000)]);
    write_wav(&two, &[tone(1, 96000)]);

    let mut file = AudioFile::open(&one, &Options::default());
    assert!(file.join(&[two.clone()], &JoinOptions::default()).is_err());
    assert_eq!(listing(tmp.path()), vec!["long.1.wav", "long.2.wav"]);

    let forced = JoinOptions {
        forced: true,
        ..JoinOptions::default()
    };
    file.join(&[two.clone()], &forced).unwrap();
    assert_eq!(listing(tmp.path()), vec!["long.wav"]);

    let (_, channels) = read_wav(&tmp.path().join("long.wav"));
    assert_eq!(channels[0].len(), 96000);
    assert!(channels[0][48000..].iter().all(|&s| s == 0));
}

#[test]
fn test_backup_paths_never_exist() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("bak")).unwrap();
    fs::write(tmp.path().join("bak").join("a.wav"), b"old").unwrap();

    let mut manager = BackupManager::new();
    let mut seen: Vec<PathBuf> = Vec::new();
    for _ in 0..5 {
        let folder = manager.backup_folder(tmp.path(), "bak", true);
        assert!(!folder.exists());
        assert!(!seen.contains(&folder));
        seen.push(folder);
    }

    let existing = tmp.path().join("bak");
    let first = manager.backup_file(&existing, "a.wav");
    let second = manager.backup_file(&existing, "a.wav");
    assert!(!first.exists() && !second.exists());
    assert_ne!(first, second);
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_repeated_operations_are_no_ops() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("voice.wav");
    write_wav(&path, &[tone(0, 500)]);

    let mut file = AudioFile::open(&path, &Options::default());
    let before = fs::read(&path).unwrap();
    assert!(!file.monoize(None).unwrap());
    assert_eq!(fs::read(&path).unwrap(), before);
    assert_eq!(file.channels(), Some(1));

    assert!(file.remove(true).unwrap());
    assert!(!file.remove(true).unwrap());
    assert!(!path.exists());
}

#[test]
fn test_second_pass_finds_nothing_to_do() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let same = tone(0, 1000);
    write_wav(&dir.join("fake.wav"), &[same.clone(), same]);
    write_wav(&dir.join("take.L.wav"), &[tone(1, 1000)]);
    write_wav(&dir.join("take.R.wav"), &[tone(2, 1000)]);

    let options = Options {
        backup: false,
        ..Options::default()
    };
    let mut list = FileList::scan(dir, &options).unwrap();
    assert!(list.proceed().unwrap().summary.applied > 0);

    let after_first = listing(dir);
    let second = list.proceed().unwrap();
    assert_eq!(second.summary.applied, 0);
    assert_eq!(listing(dir), after_first);
}
