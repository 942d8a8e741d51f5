//! Mappack and layer loading (`.json` or gzipped `.json.gz`).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::info;
use serde::de::DeserializeOwned;

use cartogram_core::map::{CartMap, LayerData, Mappack, VersionExtras, BASE_SYSNAME};

fn is_gz(path: &Path) -> bool {
    path.extension().map_or(false, |e| e == "gz")
}

/// Parses JSON from `reader`, gunzipping first if `gz`.
pub fn read_json<T: DeserializeOwned, R: Read>(reader: R, gz: bool) -> serde_json::Result<T> {
    if gz {
        serde_json::from_reader(GzDecoder::new(reader))
    } else {
        serde_json::from_reader(reader)
    }
}

pub fn load_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let path = Path::new(path);
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_json(BufReader::new(file), is_gz(path)).with_context(|| format!("parsing {}", path.display()))
}

/// An extra version to add after the mappack's own: `SYSNAME=PATH`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraLayer {
    pub sysname: String,
    pub path: String,
}

pub fn parse_extra_layer(arg: &str) -> Result<ExtraLayer, String> {
    match arg.split_once('=') {
        Some((sysname, path)) if !sysname.is_empty() && !path.is_empty() => Ok(ExtraLayer {
            sysname: sysname.to_string(),
            path: path.to_string(),
        }),
        _ => Err(format!("expected SYSNAME=PATH, got {:?}", arg)),
    }
}

/// Builds a map from a mappack file, then adds each extra layer equalized
/// against the base version.
pub fn load_map(path: &str, extra: &[ExtraLayer]) -> Result<CartMap> {
    let mappack: Mappack = load_json(path)?;
    let name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.trim_end_matches(".gz").trim_end_matches(".json").to_string())
        .unwrap_or_else(|| path.to_string());
    let mut map = CartMap::new(name);
    map.init(&mappack).with_context(|| format!("initializing map from {}", path))?;
    for ExtraLayer { sysname, path } in extra {
        let layer: LayerData = load_json(path)?;
        map.add_layer(sysname, &layer, VersionExtras::default(), BASE_SYSNAME)
            .with_context(|| format!("adding version {} from {}", sysname, path))?;
        info!("added version {} from {}", sysname, path);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use serde_json::Value;
    use test_log::test;

    use super::*;

    #[test]
    fn gzipped_json() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(br#"{"config": {"label_size": "9px"}}"#).unwrap();
        let bytes = encoder.finish().unwrap();

        let pack: Mappack = read_json(bytes.as_slice(), true).unwrap();
        assert_eq!(pack.config.label_size.as_deref(), Some("9px"));
        assert!(read_json::<Value, _>(bytes.as_slice(), false).is_err());
    }

    #[test]
    fn extra_layers() {
        assert_eq!(
            parse_extra_layer("2-gdp=out/gdp.json").unwrap(),
            ExtraLayer { sysname: "2-gdp".to_string(), path: "out/gdp.json".to_string() },
        );
        assert!(parse_extra_layer("gdp.json").is_err());
        assert!(parse_extra_layer("=gdp.json").is_err());
    }

    #[test]
    fn missing_file() {
        let err = load_map("does/not/exist.json", &[]).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
