//! Code for writing metadata to file
use crate::entity::EntitySet;
use anyhow::Result;
use chrono::prelude::*;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Information about the program build via `built` crate
mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Get information about program version from git
fn get_git_hash() -> String {
    let Some(hash) = built_info::GIT_COMMIT_HASH_SHORT else {
        return "unknown".into();
    };

    if built_info::GIT_DIRTY == Some(true) {
        format!("{hash}-dirty")
    } else {
        hash.into()
    }
}

#[derive(Serialize)]
struct Metadata<'a> {
    run: RunMetadata<'a>,
    sources: Vec<SourceMetadata<'a>>,
    program: ProgramMetadata<'a>,
    platform: PlatformMetadata,
}

/// Information about the report run
#[derive(Serialize)]
struct RunMetadata<'a> {
    /// Path to the report directory
    report_path: &'a Path,
    /// The date and time on which the run started
    datetime: String,
    /// Number of animation frames
    frame_count: usize,
}

/// Summary of the plants read from one source sheet
#[derive(Serialize)]
struct SourceMetadata<'a> {
    sheet: &'a str,
    event_class: String,
    plant_count: usize,
    total_capacity: f64,
}

impl<'a> From<&'a EntitySet> for SourceMetadata<'a> {
    fn from(set: &'a EntitySet) -> Self {
        Self {
            sheet: &set.source,
            event_class: set.event_class.to_string(),
            plant_count: set.entities.len(),
            total_capacity: set.total_capacity().value(),
        }
    }
}

#[derive(Serialize)]
struct ProgramMetadata<'a> {
    /// The program name
    name: &'a str,
    /// The program version as specified in Cargo.toml
    version: &'a str,
    /// The target architecture for the build (e.g. x86_64-unknown-linux-gnu)
    target: &'a str,
    /// Whether it is a debug build
    is_debug: bool,
    /// The version of rustc used to compile the program
    rustc_version: &'a str,
    /// When the program was built
    build_time_utc: &'a str,
    /// The git commit hash for the version of the program (if known)
    git_commit_hash: String,
}

impl Default for ProgramMetadata<'_> {
    fn default() -> Self {
        Self {
            name: built_info::PKG_NAME,
            version: built_info::PKG_VERSION,
            target: built_info::TARGET,
            is_debug: built_info::DEBUG,
            rustc_version: built_info::RUSTC_VERSION,
            build_time_utc: built_info::BUILT_TIME_UTC,
            git_commit_hash: get_git_hash(),
        }
    }
}

/// Information about the platform the program is running on.
///
/// The fields correspond to different data available from the [`PlatformInfo`] struct.
#[derive(Serialize)]
struct PlatformMetadata {
    sysname: String,
    nodename: String,
    release: String,
    version: String,
    machine: String,
    osname: String,
}

impl Default for PlatformMetadata {
    fn default() -> Self {
        let info = PlatformInfo::new().expect("Unable to determine platform info");
        Self {
            sysname: info.sysname().to_string_lossy().into(),
            nodename: info.nodename().to_string_lossy().into(),
            release: info.release().to_string_lossy().into(),
            version: info.version().to_string_lossy().into(),
            machine: info.machine().to_string_lossy().into(),
            osname: info.osname().to_string_lossy().into(),
        }
    }
}

/// Write metadata to the specified output path in TOML format
///
/// # Arguments
///
/// * `output_path` - Folder to write the file to
/// * `report_path` - Path to the report directory which was run
/// * `entity_sets` - The plants read for the report
/// * `frame_count` - Number of frames in the animation
pub fn write_metadata(
    output_path: &Path,
    report_path: &Path,
    entity_sets: &[EntitySet],
    frame_count: usize,
) -> Result<()> {
    let metadata = Metadata {
        run: RunMetadata {
            report_path,
            datetime: Local::now().to_rfc2822(),
            frame_count,
        },
        sources: entity_sets.iter().map(SourceMetadata::from).collect(),
        program: ProgramMetadata::default(),
        platform: PlatformMetadata::default(),
    };
    let file_path = output_path.join(METADATA_FILE_NAME);
    fs::write(&file_path, toml::to_string(&metadata)?)?;

    Ok(())
}
