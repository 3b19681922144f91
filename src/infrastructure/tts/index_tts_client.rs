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

use base64::Engine as _;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::settings::TtsSettings;
use crate::utils::filename;

/// 默认的IndexTTS API基础地址
pub const DEFAULT_BASE_URL: &str = "https://indextts.cn";

/// TTS错误类型
#[derive(Error, Debug)]
pub enum TtsError {
    /// 请求失败
    #[error("请求失败: {0}")]
    Request(#[from] reqwest::Error),
    /// 接口返回错误状态
    #[error("TTS接口返回错误: {status} - {body}")]
    Api { status: u16, body: String },
    /// 响应无法解析为音频
    #[error("音频数据解析失败: {0}")]
    Decode(String),
    /// API密钥未配置
    #[error("TTS API密钥未配置")]
    MissingApiKey,
    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 语音合成请求
pub struct SynthesizeRequest {
    /// 要合成的文本
    pub text: String,
    /// 参考音频文件路径（可选）
    pub prompt_audio: Option<PathBuf>,
    /// 温度参数，控制随机性（0.0-1.0）
    pub temperature: f32,
    /// 输出音频文件路径（可选，默认自动生成）
    pub output_path: Option<PathBuf>,
}

impl SynthesizeRequest {
    /// 创建仅含文本的基础合成请求
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prompt_audio: None,
            temperature: 0.7,
            output_path: None,
        }
    }
}

/// IndexTTS客户端
///
/// 基于reqwest实现的IndexTTS语音合成接口客户端。
/// 请求以multipart表单提交（文本、温度、可选参考音频），
/// 响应支持三种形式：直接返回音频字节、JSON内嵌base64音频数据、
/// JSON返回音频下载地址。
pub struct IndexTtsClient {
    api_key: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl IndexTtsClient {
    /// 创建新的TTS客户端
    ///
    /// # 参数
    ///
    /// * `api_key` - API密钥
    /// * `base_url` - API基础地址，末尾斜杠会被去除
    pub fn new(api_key: String, base_url: String) -> Result<Self, TtsError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(60),
            client,
        })
    }

    /// 从配置创建TTS客户端
    ///
    /// # 错误
    ///
    /// * 配置中未设置API密钥时返回 `MissingApiKey`
    pub fn from_settings(settings: &TtsSettings) -> Result<Self, TtsError> {
        let api_key = settings.api_key.clone().ok_or(TtsError::MissingApiKey)?;
        let mut client = Self::new(api_key, settings.base_url.clone())?;
        client.timeout = Duration::from_secs(settings.timeout_secs);
        Ok(client)
    }

    /// 合成语音
    ///
    /// # 参数
    ///
    /// * `request` - 合成请求
    ///
    /// # 返回值
    ///
    /// * `Ok(PathBuf)` - 保存的音频文件路径
    /// * `Err(TtsError)` - 合成过程中出现的错误
    pub async fn synthesize(&self, request: &SynthesizeRequest) -> Result<PathBuf, TtsError> {
        info!("开始合成语音: {}", request.text);

        let mut form = Form::new()
            .text("text", request.text.clone())
            .text("temperature", request.temperature.to_string());

        if let Some(audio_path) = &request.prompt_audio {
            if audio_path.exists() {
                form = form.part("prompt_audio", Self::audio_part(audio_path).await?);
            } else {
                warn!("参考音频不存在，忽略: {}", audio_path.display());
            }
        }

        let response = self
            .client
            .post(format!("{}/tts", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Api { status, body });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.contains("application/json") {
            let body: Value = response.json().await?;
            self.handle_json_response(&body, request).await
        } else {
            // 接口直接返回音频字节
            let audio = response.bytes().await?;
            self.save_audio(&audio, request).await
        }
    }

    /// 处理JSON响应
    ///
    /// 依次尝试内嵌base64音频数据和音频下载地址两种字段
    async fn handle_json_response(
        &self,
        body: &Value,
        request: &SynthesizeRequest,
    ) -> Result<PathBuf, TtsError> {
        if let Some(encoded) = Self::string_field(body, &["audio_data", "audioData"]) {
            let audio = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| TtsError::Decode(e.to_string()))?;
            return self.save_audio(&audio, request).await;
        }

        if let Some(audio_url) = Self::string_field(body, &["audio_url", "audioUrl"]) {
            return self.download_audio(audio_url, request).await;
        }

        Err(TtsError::Decode("未知的响应格式".to_string()))
    }

    /// 下载音频文件
    async fn download_audio(
        &self,
        audio_url: &str,
        request: &SynthesizeRequest,
    ) -> Result<PathBuf, TtsError> {
        let response = self
            .client
            .get(audio_url)
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Api { status, body });
        }

        let audio = response.bytes().await?;
        self.save_audio(&audio, request).await
    }

    /// 保存音频文件
    async fn save_audio(
        &self,
        audio: &[u8],
        request: &SynthesizeRequest,
    ) -> Result<PathBuf, TtsError> {
        let output_path = request
            .output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(filename::tts_output(&request.text)));

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&output_path, audio).await?;

        info!(
            "音频合成成功，保存至: {} ({:.2} KB)",
            output_path.display(),
            audio.len() as f64 / 1024.0
        );

        Ok(output_path)
    }

    /// 构建参考音频表单分片，MIME类型按扩展名推断
    async fn audio_part(path: &Path) -> Result<Part, TtsError> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "prompt_audio".to_string());

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(Self::mime_type(path))?;
        Ok(part)
    }

    /// 根据文件扩展名获取MIME类型
    fn mime_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("wav") => "audio/wav",
            Some("mp3") => "audio/mpeg",
            Some("ogg") => "audio/ogg",
            Some("flac") => "audio/flac",
            Some("m4a") => "audio/mp4",
            _ => "application/octet-stream",
        }
    }

    fn string_field<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a str> {
        keys.iter().find_map(|key| body.get(*key)?.as_str())
    }
}

/// 快捷语音合成
///
/// 使用默认地址和参数，一步完成文本合成并保存音频
pub async fn quick_synthesize(api_key: &str, text: &str) -> Result<PathBuf, TtsError> {
    let client = IndexTtsClient::new(api_key.to_string(), DEFAULT_BASE_URL.to_string())?;
    client.synthesize(&SynthesizeRequest::new(text)).await
}

#[cfg(test)]
#[path = "index_tts_client_test.rs"]
mod tests;
