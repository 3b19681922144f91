// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use thiserror::Error;

/// 数据处理管道错误类型
///
/// 三类终止性错误均来自无法通过重试修复的静态前置条件，
/// 直接导致进程以非零状态退出。单条记录内部的解析问题
/// （日期无法解析、数值无法解析）不属于错误：前者丢弃该记录，
/// 后者取默认值，批次继续执行。
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("输入文件不存在: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("输入数据格式错误: {0}")]
    MalformedInput(String),

    #[error("没有有效记录，无法生成CSV输出")]
    EmptyOutput,

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV序列化错误: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}
