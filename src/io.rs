use crate::profile_scope;
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::level::LevelData;
use crate::simulation::Core;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveFormat {
    /// Human-readable, diff-friendly level files.
    #[default]
    Json,
    Binary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    pub format: SaveFormat,
    pub compress: bool,
}

fn encode<W: Write>(writer: W, level: &LevelData, format: SaveFormat) -> Result<()> {
    match format {
        SaveFormat::Json => serde_json::to_writer_pretty(writer, level)?,
        SaveFormat::Binary => bincode::serialize_into(writer, level)?,
    }
    Ok(())
}

/// Write `level` to `path` through a temporary file so an interrupted save never
/// truncates an existing level.
pub fn save_level<P: AsRef<Path>>(path: P, level: &LevelData, options: SaveOptions) -> Result<()> {
    profile_scope!("save_level");
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension({
        let mut os = path.extension().map(|e| e.to_os_string()).unwrap_or_default();
        os.push(".tmp");
        os
    });
    {
        let file = std::fs::File::create(&tmp_path)?;
        let writer = BufWriter::new(file);
        if options.compress {
            let mut encoder = GzEncoder::new(writer, Compression::fast());
            encode(&mut encoder, level, options.format)?;
            let mut writer = encoder.finish()?;
            writer.flush()?;
        } else {
            let mut writer = writer;
            encode(&mut writer, level, options.format)?;
            writer.flush()?;
        }
    }
    std::fs::rename(&tmp_path, path)?;
    log::info!("saved level '{}' to {}", level.name, path.display());
    Ok(())
}

/// Save the current content of `core` as a level named `name`.
pub fn save_core<P: AsRef<Path>>(path: P, core: &Core, name: &str, options: SaveOptions) -> Result<()> {
    let mut level = LevelData::from_core(core);
    level.name = name.to_string();
    save_level(path, &level, options)
}

/// Read a level in any format written by [`save_level`] and migrate it to the
/// current version.
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<LevelData> {
    profile_scope!("load_level");
    let data = std::fs::read(path.as_ref())?;
    let mut level = match maybe_decompress_gzip(&data)? {
        Some(decoded) => parse_level_bytes(&decoded)?,
        None => parse_level_bytes(&data)?,
    };
    level.migrate()?;
    Ok(level)
}

/// Load the level at `path` straight into `core`.
pub fn load_into<P: AsRef<Path>>(path: P, core: &mut Core) -> Result<()> {
    load_level(path)?.apply_to(core)
}

fn parse_level_bytes(bytes: &[u8]) -> Result<LevelData> {
    let json_err = match serde_json::from_slice::<LevelData>(bytes) {
        Ok(level) => return Ok(level),
        Err(e) => e,
    };
    if let Ok(level) = bincode::deserialize::<LevelData>(bytes) {
        return Ok(level);
    }
    Err(Error::Json(json_err))
}

fn maybe_decompress_gzip(data: &[u8]) -> Result<Option<Vec<u8>>> {
    if data.len() < 2 || data[0] != 0x1f || data[1] != 0x8b {
        return Ok(None);
    }

    let mut decoder = GzDecoder::new(Cursor::new(data));
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    Ok(Some(decoded))
}
