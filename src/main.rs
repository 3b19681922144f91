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

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use cleanrs::application::use_cases::process_use_case::ProcessDataUseCase;
use cleanrs::config::settings::Settings;
use cleanrs::domain::models::article::ArticleDigest;
use cleanrs::domain::services::script_service::ScriptService;
use cleanrs::infrastructure::export::record_exporter::ExportFormat;
use cleanrs::infrastructure::tts::{IndexTtsClient, SynthesizeRequest};
use cleanrs::utils::telemetry;

#[derive(Parser)]
#[command(name = "cleanrs", about = "爬虫数据清洗与配音工具")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 清洗爬虫数据并导出为CSV或JSON
    Process {
        /// 输入文件路径（JSON对象数组）
        #[arg(long)]
        input: PathBuf,
        /// 导出格式
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
    /// 合成语音并保存音频文件
    Tts {
        /// 要合成的文本
        #[arg(long)]
        text: String,
        /// 参考音频文件路径（可选）
        #[arg(long)]
        prompt_audio: Option<PathBuf>,
        /// 温度参数，覆盖配置中的默认值
        #[arg(long)]
        temperature: Option<f32>,
        /// 输出音频文件路径（可选，默认自动生成）
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// 根据文章摘要生成口播稿
    Script {
        /// 文章标题
        #[arg(long)]
        title: String,
        /// 文章摘要
        #[arg(long)]
        summary: String,
        /// 学科分类
        #[arg(long)]
        category: String,
        /// 口播稿输出路径
        #[arg(long, default_value = "output_script.txt")]
        output: PathBuf,
    },
}

/// 主函数
///
/// 应用程序入口点，根据子命令执行数据清洗、语音合成或口播稿生成
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();

    let cli = Cli::parse();

    // 2. Load configuration
    let settings = Settings::new()?;

    match cli.command {
        Command::Process { input, format } => {
            let use_case = ProcessDataUseCase::from_settings(&settings);
            let report = use_case.execute(&input, format).await?;
            info!(
                "处理完成，有效记录 {} 条，输出文件: {}",
                report.valid_count,
                report.output_path.display()
            );
        }
        Command::Tts {
            text,
            prompt_audio,
            temperature,
            output,
        } => {
            let client = IndexTtsClient::from_settings(&settings.tts)?;
            let request = SynthesizeRequest {
                text,
                prompt_audio,
                temperature: temperature.unwrap_or(settings.tts.temperature),
                output_path: output,
            };
            let path = client.synthesize(&request).await?;
            info!("语音合成完成: {}", path.display());
        }
        Command::Script {
            title,
            summary,
            category,
            output,
        } => {
            let service = ScriptService::from_settings(&settings.llm);
            let digest = ArticleDigest {
                title,
                summary,
                category,
            };
            let script = service.generate_script(&digest).await?;
            service.save_script(&script, &output).await?;
            info!("口播稿生成完成: {}", output.display());
        }
    }

    Ok(())
}
