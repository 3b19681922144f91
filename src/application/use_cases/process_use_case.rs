// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::config::settings::Settings;
use crate::domain::models::record::RawRecord;
use crate::domain::services::normalize_service::{NormalizerConfig, RecordNormalizer};
use crate::infrastructure::export::record_exporter::{ExportFormat, RecordExporter};
use crate::utils::errors::PipelineError;

// === Section: Use Case Definition ===

/// 数据处理结果报告
#[derive(Debug)]
pub struct ProcessReport {
    /// 原始数据条数
    pub raw_count: usize,
    /// 清洗后有效数据条数
    pub valid_count: usize,
    /// 输出文件路径
    pub output_path: PathBuf,
}

/// 数据处理用例
///
/// 编排完整的处理流程：读取输入文件 → 解析记录 →
/// 清洗（去重、规范化、过滤）→ 导出到输出文件
pub struct ProcessDataUseCase {
    normalizer: RecordNormalizer,
    exporter: RecordExporter,
}

// === Section: Implementation ===

impl ProcessDataUseCase {
    pub fn new(normalizer: RecordNormalizer, exporter: RecordExporter) -> Self {
        Self {
            normalizer,
            exporter,
        }
    }

    /// 从配置创建用例实例
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            RecordNormalizer::new(NormalizerConfig {
                min_read_count: settings.filter.min_read_count,
            }),
            RecordExporter::from_settings(&settings.output),
        )
    }

    /// 执行数据处理流程
    ///
    /// # 参数
    ///
    /// * `input_path` - 输入文件路径（JSON对象数组）
    /// * `format` - 导出格式
    ///
    /// # 返回值
    ///
    /// * `Ok(ProcessReport)` - 处理报告（条数统计和输出路径）
    /// * `Err(PipelineError)` - 输入缺失、格式错误或导出失败
    pub async fn execute(
        &self,
        input_path: &Path,
        format: ExportFormat,
    ) -> Result<ProcessReport, PipelineError> {
        info!("读取数据文件: {}", input_path.display());
        if !input_path.exists() {
            return Err(PipelineError::SourceNotFound(input_path.to_path_buf()));
        }

        let raw_text = tokio::fs::read_to_string(input_path).await?;
        let records = parse_raw_records(&raw_text)?;
        info!("原始数据条数: {}", records.len());

        let raw_count = records.len();
        let cleaned = self.normalizer.normalize(records);
        info!("清洗后有效数据条数: {}", cleaned.len());

        let output_path = self.exporter.export(&cleaned, format).await?;
        info!("处理结果已保存: {}", output_path.display());

        Ok(ProcessReport {
            raw_count,
            valid_count: cleaned.len(),
            output_path,
        })
    }
}

// === Section: Input Parsing ===

/// 将输入文本解析为原始记录集合
///
/// 输入必须是JSON对象数组，否则返回 `MalformedInput`。
/// 字段值按以下规则统一为字符串：字符串原样保留，
/// 数值和布尔值转为文本形式，null视为字段缺失，
/// 嵌套结构保留其紧凑JSON文本。
fn parse_raw_records(raw_text: &str) -> Result<Vec<RawRecord>, PipelineError> {
    let value: Value = serde_json::from_str(raw_text)
        .map_err(|e| PipelineError::MalformedInput(e.to_string()))?;

    let Some(items) = value.as_array() else {
        return Err(PipelineError::MalformedInput(
            "期望顶层为JSON数组".to_string(),
        ));
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let Some(object) = item.as_object() else {
            return Err(PipelineError::MalformedInput(
                "数组元素必须是JSON对象".to_string(),
            ));
        };

        let mut record = RawRecord::new();
        for (key, field) in object {
            if let Some(text) = coerce_field_value(field) {
                record.insert(key.clone(), text);
            }
        }
        records.push(record);
    }

    Ok(records)
}

/// 将字段值统一为字符串，null返回 `None` 表示字段缺失
fn coerce_field_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        nested => Some(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::record::CleanRecord;

    fn use_case_for(dir: &tempfile::TempDir) -> ProcessDataUseCase {
        ProcessDataUseCase::new(
            RecordNormalizer::with_default_config(),
            RecordExporter::new(dir.path().join("out"), "processed_data"),
        )
    }

    fn write_input(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("crawler_data.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_missing_input_fails_with_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = use_case_for(&dir);

        let result = use_case
            .execute(&dir.path().join("missing.json"), ExportFormat::Json)
            .await;
        assert!(matches!(result, Err(PipelineError::SourceNotFound(_))));
    }

    #[tokio::test]
    async fn test_non_array_input_fails_with_malformed_input() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = use_case_for(&dir);

        let path = write_input(&dir, r#"{"title": "not an array"}"#);
        let result = use_case.execute(&path, ExportFormat::Json).await;
        assert!(matches!(result, Err(PipelineError::MalformedInput(_))));
    }

    #[tokio::test]
    async fn test_non_object_element_fails_with_malformed_input() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = use_case_for(&dir);

        let path = write_input(&dir, r#"[{"title": "ok"}, 42]"#);
        let result = use_case.execute(&path, ExportFormat::Json).await;
        assert!(matches!(result, Err(PipelineError::MalformedInput(_))));
    }

    #[tokio::test]
    async fn test_invalid_json_fails_with_malformed_input() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = use_case_for(&dir);

        let path = write_input(&dir, "not json at all");
        let result = use_case.execute(&path, ExportFormat::Json).await;
        assert!(matches!(result, Err(PipelineError::MalformedInput(_))));
    }

    #[tokio::test]
    async fn test_threshold_filters_records_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = use_case_for(&dir);

        let path = write_input(
            &dir,
            r#"[
                {"title":"A","content":"x","publish_date":"2024-01-01","read_count":"50"},
                {"title":"B","content":"y","publish_date":"2024-01-02","read_count":"200"}
            ]"#,
        );

        let report = use_case.execute(&path, ExportFormat::Json).await.unwrap();
        assert_eq!(report.raw_count, 2);
        assert_eq!(report.valid_count, 1);

        let written = std::fs::read(&report.output_path).unwrap();
        let parsed: Vec<CleanRecord> = serde_json::from_slice(&written).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "B");
    }

    #[tokio::test]
    async fn test_numeric_fields_coerced_to_strings() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = use_case_for(&dir);

        // read_count是数值而非字符串，null字段视为缺失
        let path = write_input(
            &dir,
            r#"[{"title":"数值","content":null,"publish_date":"2024/5/6","read_count":300,"comment_num":7}]"#,
        );

        let report = use_case.execute(&path, ExportFormat::Json).await.unwrap();
        assert_eq!(report.valid_count, 1);

        let written = std::fs::read(&report.output_path).unwrap();
        let parsed: Vec<CleanRecord> = serde_json::from_slice(&written).unwrap();
        assert_eq!(parsed[0].read_count, 300.0);
        assert_eq!(parsed[0].comment_count, 7);
        assert_eq!(parsed[0].content, "");
        assert_eq!(parsed[0].publish_date, "2024-05-06");
    }

    #[tokio::test]
    async fn test_duplicates_removed_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = use_case_for(&dir);

        let path = write_input(
            &dir,
            r#"[
                {"title":"同一条","publish_date":"2024-01-01","read_count":"150"},
                {"read_count":"150","publish_date":"2024-01-01","title":"同一条"}
            ]"#,
        );

        let report = use_case.execute(&path, ExportFormat::Json).await.unwrap();
        assert_eq!(report.raw_count, 2);
        assert_eq!(report.valid_count, 1);
    }

    #[tokio::test]
    async fn test_empty_csv_output_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = use_case_for(&dir);

        let path = write_input(
            &dir,
            r#"[{"title":"低阅读量","publish_date":"2024-01-01","read_count":"10"}]"#,
        );

        let result = use_case.execute(&path, ExportFormat::Csv).await;
        assert!(matches!(result, Err(PipelineError::EmptyOutput)));
    }
}
