use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use svg::Document;

use crate::EPOCH;

pub mod cli;
pub mod layer_to_svg;
pub mod output;
pub mod svg_util;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("could not open file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).with_context(|| format!("could not parse file: {}", path.display()))
}

pub fn write_json(json: &impl Serialize, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("could not open solution file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, json)
        .with_context(|| format!("could not write solution file: {}", path.display()))?;
    info!("[IO] solution written to file://{}", fs::canonicalize(path)?.display());
    Ok(())
}

pub fn write_svg(document: &Document, path: &Path) -> Result<()> {
    svg::save(path, document).with_context(|| format!("could not write svg file: {}", path.display()))?;
    info!("[IO] svg written to file://{}", fs::canonicalize(path)?.display());
    Ok(())
}

/// Logs to stdout and, when given, to `log_file` as well.
/// Every line is prefixed with its level, the time elapsed since [`EPOCH`] and the thread name.
pub fn init_logger(level_filter: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            let handle = std::thread::current();
            let prefix = format!(
                "[{}] [{}] <{}>",
                record.level(),
                elapsed_hms(),
                handle.name().unwrap_or("-")
            );
            out.finish(format_args!("{prefix:<27}{message}"))
        })
        .level(level_filter)
        .chain(std::io::stdout());
    if let Some(path) = log_file {
        let file = fern::log_file(path).with_context(|| format!("could not open log file: {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }
    dispatch.apply()?;
    info!("[EPOCH]: {}", jiff::Timestamp::now());
    Ok(())
}

/// Time since [`EPOCH`] as `hh:mm:ss`
fn elapsed_hms() -> String {
    let secs = EPOCH.elapsed().as_secs();
    format!("{:0>2}:{:0>2}:{:0>2}", secs / 3600, (secs / 60) % 60, secs % 60)
}
