//! Writes every precomputed network to `<dir>/<key>.json`.

use crate::registry::NetworkRegistry;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn export_networks(registry: &NetworkRegistry, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = Vec::new();
    for (key, network) in registry.iter() {
        let path = dir.join(format!("{}.json", key.as_str()));
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, network)
            .with_context(|| format!("writing {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("flushing {}", path.display()))?;
        info!(attribute = key.as_str(), path = %path.display(), "exported network");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{LoaderConfig, ProfileTable};

    #[test]
    fn one_file_per_attribute() {
        let table = ProfileTable::from_reader(
            "name;university;degree\nA;X;PhD\nB;X;MSc\n".as_bytes(),
            &LoaderConfig::default(),
        )
        .unwrap();
        let registry = NetworkRegistry::build(&table);
        let dir = tempfile::tempdir().unwrap();

        let written = export_networks(&registry, dir.path().join("data1")).unwrap();
        assert_eq!(written.len(), 3);

        let university: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("data1/university.json")).unwrap())
                .unwrap();
        assert_eq!(university["links"], serde_json::json!([{"source": 0, "target": 1}]));
        assert_eq!(university["nodes"].as_array().unwrap().len(), 2);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn flush_failure_is_reported() {
        let table = ProfileTable::from_reader("name\nA\n".as_bytes(), &LoaderConfig::default())
            .unwrap();
        let registry = NetworkRegistry::build(&table);
        let dir = tempfile::tempdir().unwrap();
        // Small payloads sit in the buffer until the final flush
        std::os::unix::fs::symlink("/dev/full", dir.path().join("university.json")).unwrap();

        let err = export_networks(&registry, dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("university.json"));
    }
}
