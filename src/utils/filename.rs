// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

/// 文件名净化：替换所有非单词字符（\w 含汉字）
static SANITIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\W").expect("sanitize pattern must be valid"));

/// 生成带时间戳的导出文件名：`<前缀>_<YYYYmmddHHMMSS>.<扩展名>`
pub fn timestamped(prefix: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    format!("{}_{}.{}", prefix, timestamp, extension)
}

/// 生成TTS音频输出文件名
///
/// 取合成文本的前15个字符净化后作为文件名后缀：
/// `tts_<YYYYmmdd_HHMMSS>_<净化文本>.wav`
pub fn tts_output(text: &str) -> String {
    let snippet: String = text.chars().take(15).collect();
    let clean_snippet = SANITIZE_RE.replace_all(&snippet, "_");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    format!("tts_{}_{}.wav", timestamp, clean_snippet)
}
