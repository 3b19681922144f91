// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务：
/// - 清洗服务（normalize_service）：记录去重、字段规范化和有效性过滤
/// - 口播稿服务（script_service）：调用LLM生成口播稿
pub mod normalize_service;
pub mod script_service;
