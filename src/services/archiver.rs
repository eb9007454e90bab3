//! 回执归档服务 - 业务能力层
//!
//! 把回执目录下的所有文件打包为一个 zip

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{AppError, Result};

/// 归档结果
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    /// 压缩包内的文件名（按名称排序）
    pub entries: Vec<String>,
}

/// 回执归档服务
#[derive(Debug, Default)]
pub struct Archiver;

impl Archiver {
    pub fn new() -> Self {
        Self
    }

    /// 把 `source_dir` 下的所有普通文件打包到 `output_zip`，覆盖已有压缩包
    pub async fn archive_folder(&self, source_dir: &Path, output_zip: &Path) -> Result<ArchiveSummary> {
        let source_dir = source_dir.to_path_buf();
        let output_zip = output_zip.to_path_buf();

        let summary = tokio::task::spawn_blocking(move || write_archive(&source_dir, &output_zip))
            .await
            .map_err(|e| AppError::Io {
                path: "archive task".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e),
            })??;

        info!(
            "📦 已打包 {} 个回执: {}",
            summary.entries.len(),
            summary.path.display()
        );
        Ok(summary)
    }
}

fn write_archive(source_dir: &Path, output_zip: &Path) -> Result<ArchiveSummary> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(source_dir).map_err(|e| AppError::io(source_dir, e))? {
        let entry = entry.map_err(|e| AppError::io(source_dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if let Some(parent) = output_zip.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }
    }

    let zip_error = |e: zip::result::ZipError| AppError::Archive {
        path: output_zip.display().to_string(),
        source: e,
    };

    let file = File::create(output_zip).map_err(|e| AppError::io(output_zip, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = Vec::with_capacity(files.len());
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = std::fs::read(path).map_err(|e| AppError::io(path, e))?;

        zip.start_file(name.clone(), options).map_err(zip_error)?;
        zip.write_all(&data).map_err(|e| AppError::io(output_zip, e))?;
        entries.push(name);
    }

    let mut writer = zip.finish().map_err(zip_error)?;
    writer.flush().map_err(|e| AppError::io(output_zip, e))?;

    Ok(ArchiveSummary {
        path: output_zip.to_path_buf(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zip_names(path: &Path) -> Vec<String> {
        let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn archives_every_file_in_folder() {
        let dir = tempfile::tempdir().unwrap();
        let receipts = dir.path().join("receipt_pdf");
        std::fs::create_dir_all(receipts.join("nested")).unwrap();
        std::fs::write(receipts.join("receipt_2.pdf"), b"%PDF-2").unwrap();
        std::fs::write(receipts.join("receipt_1.pdf"), b"%PDF-1").unwrap();
        let output = dir.path().join("out").join("receipts.zip");

        let summary = Archiver::new().archive_folder(&receipts, &output).await.unwrap();

        assert_eq!(summary.entries, vec!["receipt_1.pdf", "receipt_2.pdf"]);
        assert_eq!(zip_names(&output), vec!["receipt_1.pdf", "receipt_2.pdf"]);
    }

    #[tokio::test]
    async fn existing_archive_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let receipts = dir.path().join("receipt_pdf");
        std::fs::create_dir_all(&receipts).unwrap();
        std::fs::write(receipts.join("receipt_1.pdf"), b"%PDF").unwrap();
        let output = dir.path().join("receipts.zip");
        std::fs::write(&output, b"stale bytes that are not a zip").unwrap();

        Archiver::new().archive_folder(&receipts, &output).await.unwrap();

        assert_eq!(zip_names(&output), vec!["receipt_1.pdf"]);
    }

    #[tokio::test]
    async fn missing_folder_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Archiver::new()
            .archive_folder(&dir.path().join("missing"), &dir.path().join("r.zip"))
            .await;
        assert!(matches!(result, Err(AppError::Io { .. })));
    }
}
