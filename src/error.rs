//! 统一错误类型模块
//!
//! 提供 sized-kdf 中所有操作的错误类型定义。
//!
//! 策略违规 ([`PolicyViolation`]) 在内部始终以枚举形式收集，
//! 只有在生成响应时才通过 `Display` 转换为可读文本。

use std::fmt;

/// sized-kdf 的统一结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// sized-kdf 的错误类型
#[derive(Debug)]
pub enum Error {
    /// 请求无法解析为预期的结构
    MalformedRequest(String),

    /// 请求违反了一条或多条策略（全部收集，不短路）
    Validation(Vec<PolicyViolation>),

    /// 配置错误
    Config(ConfigError),

    /// 密钥派生错误
    Derivation(DerivationError),

    /// 响应序列化失败
    Serialization(String),

    /// 内部错误
    Internal(String),
}

impl Error {
    /// 创建一个内部错误
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// 创建一个请求格式错误
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedRequest(msg.into())
    }

    /// 是否由调用方输入引起（对应 400 类状态码）
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::MalformedRequest(_) | Error::Validation(_))
    }

    /// 面向调用方的错误消息列表
    ///
    /// 内部错误不会泄露细节，只返回通用消息。
    pub fn messages(&self) -> Vec<String> {
        match self {
            Error::MalformedRequest(_) => vec![MALFORMED_REQUEST_MESSAGE.to_string()],
            Error::Validation(violations) => violations.iter().map(|v| v.to_string()).collect(),
            Error::Config(_)
            | Error::Derivation(_)
            | Error::Serialization(_)
            | Error::Internal(_) => vec![INTERNAL_ERROR_MESSAGE.to_string()],
        }
    }
}

/// 请求格式错误时返回给调用方的消息
pub const MALFORMED_REQUEST_MESSAGE: &str = "The request is malformed";

/// 内部错误时返回给调用方的消息
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// 请求策略违规
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyViolation {
    /// 密码太短
    PasswordTooShort,
    /// 盐太短
    SaltTooShort,
    /// 请求的编码长度超过上限
    SizeTooLarge,
}

/// 配置相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 无效的配置值
    InvalidValue { key: String, message: String },
}

/// 密钥派生相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    /// 底层 KDF 原语失败
    Primitive(String),
    /// 长度搜索超过迭代上限
    SearchExhausted { desired: usize, last_raw_len: usize },
}

// ============================================================================
// Display 实现
// ============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedRequest(msg) => write!(f, "{}: {}", MALFORMED_REQUEST_MESSAGE, msg),
            Error::Validation(violations) => {
                write!(f, "Validation error: ")?;
                for (i, v) in violations.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", v)?;
                }
                Ok(())
            }
            Error::Config(e) => write!(f, "Config error: {}", e),
            Error::Derivation(e) => write!(f, "Derivation error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyViolation::PasswordTooShort => write!(f, "The password is too short"),
            PolicyViolation::SaltTooShort => write!(f, "The salt is too short"),
            PolicyViolation::SizeTooLarge => write!(f, "The requested size is too large"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, message } => {
                write!(f, "invalid configuration value for '{}': {}", key, message)
            }
        }
    }
}

impl fmt::Display for DerivationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivationError::Primitive(msg) => write!(f, "key derivation failed: {}", msg),
            DerivationError::SearchExhausted {
                desired,
                last_raw_len,
            } => write!(
                f,
                "no raw length up to {} bytes reaches encoded size {}",
                last_raw_len, desired
            ),
        }
    }
}

// ============================================================================
// std::error::Error 实现
// ============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Derivation(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for PolicyViolation {}
impl std::error::Error for ConfigError {}
impl std::error::Error for DerivationError {}

// ============================================================================
// From 实现 - 方便错误转换
// ============================================================================

impl From<Vec<PolicyViolation>> for Error {
    fn from(violations: Vec<PolicyViolation>) -> Self {
        Error::Validation(violations)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<DerivationError> for Error {
    fn from(err: DerivationError) -> Self {
        Error::Derivation(err)
    }
}

impl From<argon2::Error> for Error {
    fn from(err: argon2::Error) -> Self {
        Error::Derivation(DerivationError::Primitive(err.to_string()))
    }
}
