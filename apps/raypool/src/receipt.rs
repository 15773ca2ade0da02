use anyhow::{Context, Result};
use raypool_core::WorkerReport;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Serialize)]
pub struct RenderArgsSummary {
    pub workers: u32,
    pub width: u32,
    pub height: u32,
    pub samples: u32,
    pub scene: Option<PathBuf>,
}

#[derive(Serialize)]
pub struct WorkerSummary {
    pub index: usize,
    pub start: u32,
    pub end: u32,
    pub pixels: u64,
    pub elapsed_secs: f64,
}

impl From<&WorkerReport> for WorkerSummary {
    fn from(report: &WorkerReport) -> Self {
        Self {
            index: report.index,
            start: report.block.start,
            end: report.block.end,
            pixels: report.pixels,
            elapsed_secs: report.elapsed.as_secs_f64(),
        }
    }
}

#[derive(Serialize)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
}

#[derive(Serialize)]
pub struct RunReceipt {
    pub version: String,
    pub started_at_utc: String,
    pub finished_at_utc: String,
    pub args: RenderArgsSummary,
    pub elapsed_secs: f64,
    pub image: PathBuf,
    pub workers: Vec<WorkerSummary>,
    pub host: HostInfo,
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).context("failed to serialize receipt")?;
    atomic_write(path, &json)
}

/// Writes `data` to a hidden file beside `path`, then renames it into place.
fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let staged = temp_path(path);
    let written = fs::File::create(&staged)
        .and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&staged, path));

    if written.is_err() {
        let _ = fs::remove_file(&staged);
    }
    written.with_context(|| format!("failed to write {}", path.display()))
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "receipt".to_string());
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.{nanos}.tmp", std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use raypool_core::Block;
    use std::time::Duration;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("raypool-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn write_json_creates_parents_and_leaves_no_temp_files() {
        let dir = scratch_dir("receipt");
        let path = dir.join("nested").join("run.json");

        let summary = WorkerSummary::from(&WorkerReport {
            index: 2,
            block: Block::new(300, 450),
            pixels: 150 * 600,
            elapsed: Duration::from_millis(1500),
        });
        write_json(&path, &summary).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["index"], 2);
        assert_eq!(value["start"], 300);
        assert_eq!(value["end"], 450);
        assert_eq!(value["pixels"], 90000);
        assert_eq!(value["elapsed_secs"], 1.5);

        let entries: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("run.json")]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_json_reports_the_blocked_directory() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let err = write_json(&blocker.join("run.json"), &1u32).unwrap_err();
        assert!(err.to_string().starts_with("failed to create directory"));
        assert!(err.chain().count() >= 2);

        let _ = fs::remove_dir_all(&dir);
    }
}
