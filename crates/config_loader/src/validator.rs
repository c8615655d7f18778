//! 配置校验模块
//!
//! 校验规则：
//! - name 非空 (derive 规则)
//! - file sink 必须提供非空的 `path` 参数

use contracts::{ContractError, SinkType, WriterConfig};
use ::validator::Validate;

/// 校验 WriterConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &WriterConfig) -> Result<(), ContractError> {
    validate_fields(config)?;
    validate_sink(config)?;
    Ok(())
}

/// 字段级规则，来自 `#[validate(..)]` 注解
fn validate_fields(config: &WriterConfig) -> Result<(), ContractError> {
    config.validate().map_err(|errors| {
        let (field, message) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "invalid value".to_string());
                (field.to_string(), message)
            })
            .unwrap_or_else(|| ("<config>".to_string(), errors.to_string()));
        ContractError::config_validation(field, message)
    })
}

/// 校验 sink 必填参数
fn validate_sink(config: &WriterConfig) -> Result<(), ContractError> {
    if config.sink.sink_type == SinkType::File {
        let has_path = config
            .sink
            .params
            .get("path")
            .is_some_and(|p| !p.trim().is_empty());
        if !has_path {
            return Err(ContractError::config_validation(
                "sink.params.path",
                "file sink requires a non-empty 'path' param",
            ));
        }
    }
    Ok(())
}
