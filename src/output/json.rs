//! Intermediate JSON file
//!
//! The file is pretty-printed with four-space indentation and keeps
//! non-ASCII text verbatim. Each crawl overwrites it.

use crate::record::Harvest;
use crate::HarvestError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serializes a harvest to a string in the intermediate file format
pub fn harvest_to_string(harvest: &Harvest) -> Result<String, HarvestError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    harvest.serialize(&mut serializer)?;

    String::from_utf8(buffer).map_err(|e| HarvestError::InvalidInput(e.to_string()))
}

/// Writes a harvest to `path`, replacing any previous file
pub fn write_harvest(path: &Path, harvest: &Harvest) -> Result<(), HarvestError> {
    let content = harvest_to_string(harvest)?;

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
