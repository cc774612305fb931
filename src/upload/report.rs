use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// 单个文件的失败记录（校验失败或上传失败），不会中止批次
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadError {
    pub path: PathBuf,
    pub message: String,
}

impl UploadError {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// 文件路径 -> 服务端响应，按插入顺序
pub type UploadResult = Map<String, Value>;

#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub result: UploadResult,
    pub errors: Vec<UploadError>,
}

impl BatchReport {
    /// 以 tab 缩进序列化 result
    pub fn result_json(&self) -> String {
        to_tab_json(&self.result)
    }

    /// 只写入 result，覆盖已有文件
    pub fn save_result(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.result_json())
    }
}

pub fn to_tab_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    // Map<String, Value> 的序列化不会失败
    if value.serialize(&mut ser).is_err() {
        return String::from("{}");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> BatchReport {
        let mut report = BatchReport::default();
        report
            .result
            .insert("z/last.png".into(), json!({"url": "https://x/last.png"}));
        report
            .result
            .insert("a/first.png".into(), json!({"url": "https://x/first.png", "size": 3}));
        report
            .errors
            .push(UploadError::new("b.txt", "invalid file format or file too large"));
        report
    }

    #[test]
    fn result_json_uses_tabs_and_keeps_insertion_order() {
        let text = sample().result_json();
        assert!(text.contains("\n\t\"z/last.png\": {\n\t\t\"url\""));
        assert!(text.find("z/last.png").unwrap() < text.find("a/first.png").unwrap());
    }

    #[test]
    fn saved_result_round_trips_without_errors() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out.json");
        fs::write(&out, "stale content that is much longer than needed").unwrap();

        let report = sample();
        report.save_result(&out).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        let reread: UploadResult = serde_json::from_str(&text).unwrap();
        assert_eq!(reread, report.result);
        assert!(!text.contains("b.txt"));
    }

    #[test]
    fn error_display_names_the_file() {
        let err = UploadError::new("c.png", "server exploded");
        assert_eq!(err.to_string(), "c.png: server exploded");
    }
}
