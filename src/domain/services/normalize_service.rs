// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::{CleanRecord, RawRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// 内容白名单过滤：匹配所有不在保留集合内的字符。
/// 保留集合为：汉字（U+4E00-U+9FA5）、ASCII字母、ASCII数字、
/// 空白字符以及中文标点（，。！？）。
static CONTENT_STRIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\u{4e00}-\u{9fa5}a-zA-Z0-9\s，。！？]")
        .expect("content strip pattern must be valid")
});

/// 日期识别：模式一为 年-月-日（分隔符为 - / 或 年月 连接字），
/// 模式二为 月-日-年。两个模式按顺序尝试，先匹配者生效。
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})[-/年](\d{1,2})[-/月](\d{1,2})|(\d{1,2})[-/](\d{1,2})[-/](\d{4})")
        .expect("date pattern must be valid")
});

/// 数值提取：字符串中第一段连续数字
static DIGIT_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("digit run pattern must be valid"));

/// 清洗配置
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// 阅读量下限，低于该值的记录被过滤
    pub min_read_count: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_read_count: 100.0,
        }
    }
}

/// 记录清洗器
///
/// 将原始爬虫记录转换为去重、规范化、过滤后的规范记录序列。
/// 处理流程：去重 → 逐字段清洗 → 有效性过滤，
/// 输出保持有效记录在输入中的首次出现顺序。
///
/// 清洗是输入的纯函数：同一输入的多次清洗结果完全一致。
pub struct RecordNormalizer {
    config: NormalizerConfig,
}

impl RecordNormalizer {
    /// 创建新的清洗器
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// 使用默认配置创建清洗器
    pub fn with_default_config() -> Self {
        Self::new(NormalizerConfig::default())
    }

    /// 过滤重复记录
    ///
    /// 以记录的完整字段值集合为去重键（与字段顺序无关），
    /// 保留首次出现的记录。字段集不同或取值不同的记录互不重复。
    pub fn deduplicate(&self, records: Vec<RawRecord>) -> Vec<RawRecord> {
        let mut seen: HashSet<RawRecord> = HashSet::new();
        let mut unique_records = Vec::new();

        for record in records {
            if seen.contains(&record) {
                continue;
            }
            seen.insert(record.clone());
            unique_records.push(record);
        }

        unique_records
    }

    /// 清洗标题：去除首尾空白
    ///
    /// 返回空字符串表示该记录标题无效
    pub fn clean_title(&self, raw: &str) -> String {
        raw.trim().to_string()
    }

    /// 清洗内容
    ///
    /// 去除首尾空白后，删除所有不在保留集合内的字符，
    /// 剩余字符保持原有顺序。
    pub fn clean_content(&self, raw: &str) -> String {
        CONTENT_STRIP_RE.replace_all(raw.trim(), "").into_owned()
    }

    /// 解析发布日期，统一为 YYYY-MM-DD
    ///
    /// 依次尝试 年月日 和 月日年 两种模式，月和日补零到两位。
    /// 两种模式都不匹配时返回 `None`，该记录随后会被过滤。
    ///
    /// 与上游爬虫工具链保持一致：只做形状匹配，不校验日历合法性，
    /// 月份13这类形状合法但语义非法的日期会原样通过。
    pub fn parse_date(&self, raw: &str) -> Option<String> {
        let caps = DATE_RE.captures(raw)?;

        if let (Some(year), Some(month), Some(day)) = (caps.get(1), caps.get(2), caps.get(3)) {
            Some(format!(
                "{}-{:0>2}-{:0>2}",
                year.as_str(),
                month.as_str(),
                day.as_str()
            ))
        } else {
            let month = caps.get(4)?;
            let day = caps.get(5)?;
            let year = caps.get(6)?;
            Some(format!(
                "{}-{:0>2}-{:0>2}",
                year.as_str(),
                month.as_str(),
                day.as_str()
            ))
        }
    }

    /// 提取阅读量数值
    ///
    /// 取字符串中第一段连续数字解析为数值；字段缺失、为空
    /// 或不含数字时返回默认值0。`"约1500次浏览"` 解析为 `1500`。
    pub fn parse_count(&self, raw: Option<&str>) -> f64 {
        Self::first_digit_run(raw)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0.0)
    }

    /// 提取评论数
    ///
    /// 与阅读量相同的提取规则，解析为非负整数，失败时默认为0
    pub fn parse_comment_count(&self, raw: Option<&str>) -> u64 {
        Self::first_digit_run(raw)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0)
    }

    /// 判断记录是否有效
    ///
    /// 标题非空、发布日期存在且阅读量达到阈值时记录有效
    pub fn is_valid(&self, record: &CleanRecord) -> bool {
        !record.title.is_empty()
            && !record.publish_date.is_empty()
            && record.read_count >= self.config.min_read_count
    }

    /// 执行完整清洗流程
    ///
    /// 去重后逐条清洗字段并过滤无效记录，保持输入顺序。
    /// 单条记录的字段问题不会中断整个批次：日期无法解析的
    /// 记录被丢弃，数值无法解析的字段取默认值0。
    pub fn normalize(&self, records: Vec<RawRecord>) -> Vec<CleanRecord> {
        let mut cleaned_records = Vec::new();

        for record in self.deduplicate(records) {
            let Some(clean) = self.clean_record(&record) else {
                continue;
            };
            if self.is_valid(&clean) {
                cleaned_records.push(clean);
            }
        }

        cleaned_records
    }

    /// 清洗单条记录，日期缺失或无法解析时返回 `None`
    fn clean_record(&self, record: &RawRecord) -> Option<CleanRecord> {
        let title = self.clean_title(record.get("title").map(String::as_str).unwrap_or(""));
        let content = self.clean_content(record.get("content").map(String::as_str).unwrap_or(""));
        let publish_date = record
            .get("publish_date")
            .and_then(|raw| self.parse_date(raw))?;
        let read_count = self.parse_count(record.get("read_count").map(String::as_str));
        let comment_count =
            self.parse_comment_count(record.get("comment_num").map(String::as_str));

        Some(CleanRecord {
            title,
            content,
            publish_date,
            read_count,
            comment_count,
        })
    }

    fn first_digit_run(raw: Option<&str>) -> Option<&str> {
        let raw = raw?;
        if raw.is_empty() {
            return None;
        }
        DIGIT_RUN_RE.find(raw).map(|m| m.as_str())
    }
}

#[cfg(test)]
#[path = "normalize_service_test.rs"]
mod tests;
