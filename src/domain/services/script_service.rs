// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::settings::LlmSettings;
use crate::domain::models::article::ArticleDigest;

/// 口播稿Prompt模板
///
/// 将爬虫抓取的文章数据转化为口语化的口播稿
const SCRIPT_PROMPT_TEMPLATE: &str = r#"
任务：将arXiv爬虫数据转化为5分钟专业口语口播稿（2000字左右）
风格：专业不生硬，像资深学长分享，带“说实话”“你懂的”等自然口语垫词,用英语
结构要求：
1. 开场（1句）：学科+标题切入
2. 核心（3-4句）：提炼痛点+1-2个创新点+实际价值
3. 结尾（1句）：互动引导
输入数据：
标题：{title}
摘要：{summary}
学科：{category}
直接输出口播稿！
"#;

#[async_trait]
pub trait ScriptServiceTrait: Send + Sync {
    async fn generate_script(&self, digest: &ArticleDigest) -> Result<String>;
}

/// 口播稿服务 - 处理与LLM提供商的交互
///
/// # 功能
///
/// 基于文章摘要调用OpenAI兼容模式的chat-completion接口，
/// 生成可直接配音的口播稿
///
/// # 配置
///
/// 通过 [`LlmSettings`] 进行配置：API密钥、模型名称、
/// 基础URL、温度和最大令牌数
pub struct ScriptService {
    api_key: Option<String>,
    model: String,
    api_base_url: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

#[async_trait]
impl ScriptServiceTrait for ScriptService {
    async fn generate_script(&self, digest: &ArticleDigest) -> Result<String> {
        ScriptService::generate_script(self, digest).await
    }
}

impl ScriptService {
    /// 从配置创建服务实例
    pub fn from_settings(settings: &LlmSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            api_base_url: settings.base_url.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    /// 使用显式参数创建服务实例（测试及二次封装用）
    pub fn new_with_config(api_key: String, model: String, api_base_url: String) -> Self {
        Self {
            api_key: Some(api_key),
            model,
            api_base_url,
            temperature: 0.7,
            max_tokens: 800,
            timeout: Duration::from_secs(30),
        }
    }

    /// 渲染口播稿Prompt
    fn render_prompt(digest: &ArticleDigest) -> String {
        SCRIPT_PROMPT_TEMPLATE
            .replace("{title}", &digest.title)
            .replace("{summary}", &digest.summary)
            .replace("{category}", &digest.category)
    }

    /// 根据文章摘要生成口播稿
    ///
    /// # 参数
    /// * `digest` - 文章摘要（标题、摘要、学科）
    ///
    /// # 返回值
    /// * `Result<String>` - 生成的口播稿文本（已去除首尾空白）
    ///
    /// # 错误
    /// * 当LLM API密钥未配置时返回错误
    /// * 当LLM服务调用失败或响应格式异常时返回错误
    pub async fn generate_script(&self, digest: &ArticleDigest) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("LLM API key not configured"))?;

        let prompt = Self::render_prompt(digest);

        let request_body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens
        });

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let url = format!("{}/chat/completions", self.api_base_url);
        let response = client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&request_body)
            .send()
            .await
            .context("Failed to send request to LLM API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "LLM API returned error: {} - {}",
                status,
                error_text
            ));
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse LLM API response")?;

        if let Some(content) = body["choices"][0]["message"]["content"].as_str() {
            Ok(content.trim().to_string())
        } else {
            Err(anyhow::anyhow!("Invalid response format from LLM API"))
        }
    }

    /// 将口播稿保存为UTF-8文本文件
    pub async fn save_script(&self, script: &str, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create output directory")?;
            }
        }
        tokio::fs::write(path, script)
            .await
            .with_context(|| format!("Failed to write script to {}", path.display()))?;
        info!("口播稿已保存: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
#[path = "script_service_test.rs"]
mod tests;
