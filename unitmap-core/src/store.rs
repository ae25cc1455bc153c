use crate::flatten::UnitRow;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not finalize artifact {0}: {1}")]
    Finalize(PathBuf, std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Per-project CSV artifacts under a dataset root, keyed by sanitized
/// (region, project) names. Artifact existence is the resume checkpoint:
/// a project with an artifact on disk is never re-crawled.
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DatasetStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic artifact location for a (region, project) key.
    pub fn artifact_path(&self, region: &str, project: &str) -> PathBuf {
        self.root
            .join(sanitize(region))
            .join(format!("{}.csv", sanitize(project)))
    }

    pub fn has_artifact(&self, region: &str, project: &str) -> bool {
        self.artifact_path(region, project).exists()
    }

    /// Write one project's rows as a CSV artifact. The file is written to a
    /// temporary sibling and renamed into place, so a crash mid-write leaves
    /// no artifact for the key and the project is retried on resume.
    pub fn persist(&self, region: &str, project: &str, rows: &[UnitRow]) -> Result<PathBuf> {
        let path = self.artifact_path(region, project);
        let dir = path.parent().expect("artifact path always has a parent");
        fs::create_dir_all(dir)?;

        let tmp = NamedTempFile::new_in(dir)?;
        let mut writer = csv::Writer::from_writer(tmp);
        for row in rows {
            writer.serialize(row)?;
        }
        let tmp = writer.into_inner().map_err(|e| e.into_error())?;
        tmp.persist(&path)
            .map_err(|e| StoreError::Finalize(path.clone(), e.error))?;

        info!("saved {} rows for '{}' as {}", rows.len(), project, path.display());
        Ok(path)
    }

    /// Every (region, project) key currently persisted, sorted. Names are
    /// the sanitized forms the paths were built from.
    pub fn list_artifacts(&self) -> Result<Vec<(String, String)>> {
        let mut artifacts = Vec::new();
        if !self.root.exists() {
            return Ok(artifacts);
        }
        for region_entry in fs::read_dir(&self.root)? {
            let region_entry = region_entry?;
            if !region_entry.file_type()?.is_dir() {
                continue;
            }
            let region = region_entry.file_name().to_string_lossy().into_owned();
            for project_entry in fs::read_dir(region_entry.path())? {
                let path = project_entry?.path();
                if path.extension().is_some_and(|ext| ext == "csv")
                    && let Some(stem) = path.file_stem()
                {
                    artifacts.push((region.clone(), stem.to_string_lossy().into_owned()));
                }
            }
        }
        artifacts.sort();
        debug!("{} artifacts under {}", artifacts.len(), self.root.display());
        Ok(artifacts)
    }
}

/// Strip all whitespace from a UI label so it can serve as a path component.
fn sanitize(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_all_whitespace() {
        assert_eq!(sanitize("TP.Hồ Chí Minh"), "TP.HồChíMinh");
        assert_eq!(sanitize("  Vinhomes\tCentral Park\n"), "VinhomesCentralPark");
        assert_eq!(sanitize("plain"), "plain");
    }
}
