// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 原始记录
///
/// 爬虫抓取的未经校验的数据条目，字段名到字符串值的映射。
/// 期望（但不保证）包含 `title`、`content`、`publish_date`、
/// `read_count`、`comment_num` 等字段，字段可能缺失或为空。
///
/// 使用有序映射，使记录自身可以直接作为去重键：
/// 两条字段值集合完全相同的记录（与字段顺序无关）视为重复。
pub type RawRecord = BTreeMap<String, String>;

/// 规范记录
///
/// 经过清洗、校验后可供导出的记录。只有标题非空、
/// 发布日期解析成功且阅读量达到阈值的记录才会被保留。
///
/// 序列化字段名沿用爬虫工具链的中文显示名，
/// CSV表头和JSON键均使用该组名称。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    /// 标题，已去除首尾空白
    #[serde(rename = "标题")]
    pub title: String,
    /// 内容，仅保留汉字、字母、数字、空白及中文标点（，。！？）
    #[serde(rename = "内容")]
    pub content: String,
    /// 发布日期，统一为 YYYY-MM-DD 格式
    #[serde(rename = "发布日期")]
    pub publish_date: String,
    /// 阅读量，非负数值
    #[serde(rename = "阅读量")]
    pub read_count: f64,
    /// 评论数，非负整数
    #[serde(rename = "评论数")]
    pub comment_count: u64,
}
