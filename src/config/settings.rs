// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含导出、过滤阈值、TTS和LLM等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 导出配置
    pub output: OutputSettings,
    /// 记录过滤配置
    pub filter: FilterSettings,
    /// TTS语音合成配置
    pub tts: TtsSettings,
    /// LLM配置
    pub llm: LlmSettings,
}

/// 导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    /// 输出目录
    pub dir: String,
    /// 输出文件名前缀
    pub prefix: String,
}

/// 记录过滤配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSettings {
    /// 阅读量下限，低于该值的记录被过滤
    pub min_read_count: f64,
}

/// TTS语音合成配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsSettings {
    /// TTS API密钥
    pub api_key: Option<String>,
    /// TTS API基础地址
    pub base_url: String,
    /// 温度参数，控制合成的随机性（0.0-1.0）
    pub temperature: f32,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

/// LLM配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// LLM API密钥
    pub api_key: Option<String>,
    /// 使用的模型名称
    pub model: String,
    /// LLM API基础URL（OpenAI兼容模式）
    pub base_url: String,
    /// 温度参数
    pub temperature: f32,
    /// 生成的最大令牌数
    pub max_tokens: u32,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default output settings
            .set_default("output.dir", "./processed_data")?
            .set_default("output.prefix", "processed_data")?
            // Default filter settings
            .set_default("filter.min_read_count", 100.0)?
            // Default TTS settings
            .set_default("tts.base_url", "https://indextts.cn")?
            .set_default("tts.temperature", 0.7)?
            .set_default("tts.timeout_secs", 60)?
            // Default LLM settings
            .set_default("llm.model", "qwen-plus")?
            .set_default(
                "llm.base_url",
                "https://dashscope.aliyuncs.com/compatible-mode/v1",
            )?
            .set_default("llm.temperature", 0.7)?
            .set_default("llm.max_tokens", 800)?
            .set_default("llm.timeout_secs", 30)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CLEANRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;

    #[test]
    fn test_default_settings() {
        let settings = Settings::new().expect("default settings must load");

        assert_eq!(settings.output.dir, "./processed_data");
        assert_eq!(settings.output.prefix, "processed_data");
        assert_eq!(settings.filter.min_read_count, 100.0);
        assert_eq!(settings.tts.base_url, "https://indextts.cn");
        assert_eq!(settings.tts.timeout_secs, 60);
        assert_eq!(settings.llm.model, "qwen-plus");
        assert_eq!(
            settings.llm.base_url,
            "https://dashscope.aliyuncs.com/compatible-mode/v1"
        );
        assert_eq!(settings.llm.max_tokens, 800);
    }

    #[test]
    fn test_api_keys_absent_by_default() {
        let settings = Settings::new().expect("default settings must load");

        assert!(settings.tts.api_key.is_none());
        assert!(settings.llm.api_key.is_none());
    }
}
