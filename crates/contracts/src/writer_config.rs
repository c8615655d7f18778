//! 写入器配置
//!
//! 描述一个 SlowWriter：名称、刷新间隔、关闭策略以及下游 sink。

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// SlowWriter 配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WriterConfig {
    /// 写入器名称 (用于日志与指标标签)
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    /// 刷新间隔 (毫秒)，允许为 0
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// 关闭时对未刷新数据的处理方式
    #[serde(default)]
    pub close_policy: ClosePolicy,

    /// 下游 sink
    #[serde(default)]
    pub sink: SinkConfig,
}

fn default_interval_ms() -> u64 {
    // ~1/60 s
    16
}

impl WriterConfig {
    /// Create a config with default interval, close policy and a stdout sink
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interval_ms: default_interval_ms(),
            close_policy: ClosePolicy::default(),
            sink: SinkConfig::default(),
        }
    }

    /// Flush interval as a `Duration`
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// 关闭策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosePolicy {
    /// 关闭前最后刷新一次缓冲区
    #[default]
    Drain,
    /// 丢弃缓冲区中尚未刷新的数据
    Discard,
}

/// Sink 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink 类型
    #[serde(default)]
    pub sink_type: SinkType,

    /// 类型特定参数
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl SinkConfig {
    /// Create a sink config without params
    pub fn of(sink_type: SinkType) -> Self {
        Self {
            sink_type,
            params: HashMap::new(),
        }
    }

    /// Add a type-specific parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Sink 类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// 标准输出
    #[default]
    Stdout,
    /// 标准错误
    Stderr,
    /// 文件输出 (追加模式，需要 `path` 参数)
    File,
    /// 日志输出
    Log,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let config: WriterConfig = serde_json::from_str(r#"{ "name": "console" }"#).unwrap();
        assert_eq!(config.interval_ms, 16);
        assert_eq!(config.interval(), Duration::from_millis(16));
        assert_eq!(config.close_policy, ClosePolicy::Drain);
        assert_eq!(config.sink.sink_type, SinkType::Stdout);
        assert!(config.sink.params.is_empty());
    }

    #[test]
    fn test_enum_names_are_snake_case() {
        let config: WriterConfig = serde_json::from_str(
            r#"{ "name": "w", "close_policy": "discard", "sink": { "sink_type": "file", "params": { "path": "/tmp/x" } } }"#,
        )
        .unwrap();
        assert_eq!(config.close_policy, ClosePolicy::Discard);
        assert_eq!(config.sink.sink_type, SinkType::File);
        assert_eq!(config.sink.params.get("path").map(String::as_str), Some("/tmp/x"));
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let config = WriterConfig::new("");
        assert!(config.validate().is_err());
        assert!(WriterConfig::new("ok").validate().is_ok());
    }
}
