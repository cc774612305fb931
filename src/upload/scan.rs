use crate::upload::report::UploadError;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 服务端支持的图片格式
pub const ALLOWED_IMAGE_FORMATS: [&str; 7] = ["png", "jpeg", "jpg", "bmp", "tiff", "webp", "gif"];

/// 单个文件的最大字节数
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100_000_000;

pub const INVALID_FILE_MESSAGE: &str = "invalid file format or file too large";

/// 扫描结果：可上传的文件 + 校验失败的文件，均保持遍历顺序
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub candidates: Vec<PathBuf>,
    pub rejected: Vec<UploadError>,
}

/// 收集待上传文件；`max_size` 为 None 时不限制大小
///
/// 目录按文件名排序递归遍历，以 `.` 开头的条目在任何深度都被整体跳过。
/// 单个文件出错只记录到 `rejected`，不会中止扫描。
pub fn collect(path: &Path, max_size: Option<u64>) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    if path.is_file() {
        check_file(path, max_size, &mut outcome);
        return outcome;
    }

    let walker = WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => continue,
            Ok(entry) => check_file(entry.path(), max_size, &mut outcome),
            Err(err) => {
                let err_path = err.path().unwrap_or(path).to_path_buf();
                tracing::warn!(
                    path = %err_path.display(),
                    error = %err,
                    "skipping unreadable entry"
                );
                outcome.rejected.push(UploadError::new(err_path, err.to_string()));
            }
        }
    }

    tracing::info!(
        candidates = outcome.candidates.len(),
        rejected = outcome.rejected.len(),
        "scan finished"
    );
    outcome
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().starts_with(b".")
}

fn check_file(path: &Path, max_size: Option<u64>, outcome: &mut ScanOutcome) {
    if has_allowed_format(path) && within_size(path, max_size) {
        outcome.candidates.push(path.to_path_buf());
    } else {
        tracing::debug!(path = %path.display(), "rejected by validation");
        outcome
            .rejected
            .push(UploadError::new(path.to_path_buf(), INVALID_FILE_MESSAGE));
    }
}

/// 扩展名（不区分大小写）是否在白名单中
pub fn has_allowed_format(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            ALLOWED_IMAGE_FORMATS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

fn within_size(path: &Path, max_size: Option<u64>) -> bool {
    let Some(max) = max_size else {
        return true;
    };

    match fs::metadata(path) {
        Ok(meta) => meta.len() <= max,
        Err(_) => false,
    }
}
