// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 文章摘要
///
/// 口播稿生成的输入数据，来自爬虫抓取的论文条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDigest {
    /// 文章标题
    pub title: String,
    /// 文章摘要
    pub summary: String,
    /// 学科分类
    pub category: String,
}
