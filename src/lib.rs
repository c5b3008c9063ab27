//! Common functionality for plantmap.
//!
//! Power plant records are read from spreadsheet workbooks, each plant's status (operating,
//! retired or planned) is worked out for every month in the data, and the result is drawn as an
//! animated map in an HTML report.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod entity;
pub mod frame;
pub mod input;
pub mod log;
pub mod output;
pub mod period;
pub mod report;
pub mod settings;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config dir for the program
pub fn get_plantmap_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No sensible place for it, so use the working directory
        return PathBuf::from(".plantmap");
    };
    config_dir.push("plantmap");

    config_dir
}
