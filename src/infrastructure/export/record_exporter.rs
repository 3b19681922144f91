// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::{Path, PathBuf};

use crate::config::settings::OutputSettings;
use crate::domain::models::record::CleanRecord;
use crate::utils::errors::PipelineError;
use crate::utils::filename;

/// UTF-8字节序标记，CSV文件带上后可被电子表格软件正确识别编码
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// CSV格式，UTF-8带BOM
    Csv,
    /// JSON格式，UTF-8不带BOM，2空格缩进
    Json,
}

impl ExportFormat {
    /// 对应的文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// 记录导出器
///
/// 将清洗后的规范记录序列化为指定格式并写入输出目录，
/// 文件名为 `<前缀>_<时间戳>.<扩展名>`。
///
/// CSV输出：UTF-8带BOM，首行为固定的中文表头，之后每条记录一行。
/// 没有有效记录时CSV导出以 [`PipelineError::EmptyOutput`] 失败。
/// JSON输出：顶层数组，2空格缩进，非ASCII字符原样输出；
/// 空记录集合正常序列化为 `[]`。
pub struct RecordExporter {
    output_dir: PathBuf,
    prefix: String,
}

impl RecordExporter {
    /// 创建新的导出器
    pub fn new(output_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: prefix.into(),
        }
    }

    /// 从配置创建导出器
    pub fn from_settings(settings: &OutputSettings) -> Self {
        Self::new(&settings.dir, &settings.prefix)
    }

    /// 序列化并写入输出文件
    ///
    /// # 参数
    ///
    /// * `records` - 待导出的规范记录
    /// * `format` - 导出格式（csv或json）
    ///
    /// # 返回值
    ///
    /// * `Ok(PathBuf)` - 输出文件路径
    /// * `Err(PipelineError)` - 序列化或写入失败
    pub async fn export(
        &self,
        records: &[CleanRecord],
        format: ExportFormat,
    ) -> Result<PathBuf, PipelineError> {
        let data = match format {
            ExportFormat::Csv => Self::to_csv_bytes(records)?,
            ExportFormat::Json => Self::to_json_bytes(records)?,
        };

        let output_path = self
            .output_dir
            .join(filename::timestamped(&self.prefix, format.extension()));
        self.write_file(&output_path, &data).await?;

        Ok(output_path)
    }

    /// CSV序列化（UTF-8带BOM）
    ///
    /// 表头来自记录字段的中文显示名。原始工具链在无记录时
    /// 无法推导表头，这里以 `EmptyOutput` 显式失败。
    pub fn to_csv_bytes(records: &[CleanRecord]) -> Result<Vec<u8>, PipelineError> {
        if records.is_empty() {
            return Err(PipelineError::EmptyOutput);
        }

        let mut data = UTF8_BOM.to_vec();
        {
            let mut writer = csv::Writer::from_writer(&mut data);
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        Ok(data)
    }

    /// JSON序列化（2空格缩进，非ASCII原样输出）
    pub fn to_json_bytes(records: &[CleanRecord]) -> Result<Vec<u8>, PipelineError> {
        Ok(serde_json::to_vec_pretty(records)?)
    }

    /// 写入文件，必要时创建输出目录
    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), PipelineError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<CleanRecord> {
        vec![
            CleanRecord {
                title: "深度学习进展".to_string(),
                content: "内容一，句号。".to_string(),
                publish_date: "2024-01-02".to_string(),
                read_count: 200.0,
                comment_count: 5,
            },
            CleanRecord {
                title: "Rust工程实践".to_string(),
                content: "Content two".to_string(),
                publish_date: "2024-03-05".to_string(),
                read_count: 1500.0,
                comment_count: 0,
            },
        ]
    }

    #[test]
    fn test_csv_starts_with_bom_and_header() {
        let data = RecordExporter::to_csv_bytes(&sample_records()).unwrap();

        assert_eq!(&data[..3], b"\xef\xbb\xbf");

        let text = String::from_utf8(data[3..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "标题,内容,发布日期,阅读量,评论数");
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_csv_empty_records_fail() {
        let result = RecordExporter::to_csv_bytes(&[]);
        assert!(matches!(result, Err(PipelineError::EmptyOutput)));
    }

    #[test]
    fn test_json_keeps_non_ascii_literal() {
        let data = RecordExporter::to_json_bytes(&sample_records()).unwrap();
        let text = String::from_utf8(data).unwrap();

        assert!(text.contains("深度学习进展"));
        assert!(text.contains("\"标题\""));
        assert!(!text.contains("\\u"));
        // 2空格缩进
        assert!(text.contains("\n  {"));
    }

    #[test]
    fn test_json_empty_records_serialize() {
        let data = RecordExporter::to_json_bytes(&[]).unwrap();
        assert_eq!(data, b"[]");
    }

    #[test]
    fn test_json_round_trip() {
        let records = sample_records();
        let data = RecordExporter::to_json_bytes(&records).unwrap();

        let parsed: Vec<CleanRecord> = serde_json::from_slice(&data).unwrap();
        assert_eq!(parsed, records);
    }

    #[tokio::test]
    async fn test_export_writes_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = RecordExporter::new(dir.path(), "processed_data");

        let path = exporter
            .export(&sample_records(), ExportFormat::Json)
            .await
            .unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("processed_data_"));
        assert!(name.ends_with(".json"));

        let written = std::fs::read(&path).unwrap();
        let parsed: Vec<CleanRecord> = serde_json::from_slice(&written).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[tokio::test]
    async fn test_export_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("out");
        let exporter = RecordExporter::new(&nested, "processed_data");

        let path = exporter
            .export(&sample_records(), ExportFormat::Csv)
            .await
            .unwrap();
        assert!(path.exists());
        assert!(nested.is_dir());
    }
}
