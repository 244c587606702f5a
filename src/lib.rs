//! # sized-kdf
//!
//! 按调用方指定的编码长度派生密钥的 HTTP 服务。
//!
//! 调用方提交密码、盐和期望的 base64（无填充）长度，服务用 Argon2id
//! 派生密钥并返回编码结果。由于 Argon2 的输出以字节计、而期望长度以字符计，
//! 服务会搜索编码后满足期望长度的最小原始字节数。
//!
//! ## 功能特性
//!
//! - **请求校验**: 密码和盐的最小长度检查，所有违规一次性返回
//! - **定长派生**: 结果总是某个完整派生输出的未截断编码
//! - **固定参数**: Argon2id 成本参数在启动时确定，不受请求影响
//! - **HTTP 服务**: 单一路由，JSON 请求/响应（需启用 `server` feature）
//!
//! ## Features
//!
//! - `server` - 启用 HTTP 服务和命令行入口（默认启用）
//!
//! ## 示例
//!
//! ```rust
//! use sized_kdf::config::{KdfParams, ServiceConfig};
//! use sized_kdf::policy::DerivationRequest;
//! use sized_kdf::service::DeriveService;
//!
//! let service = DeriveService::new(ServiceConfig::new().with_kdf(KdfParams::TESTING)).unwrap();
//!
//! let response = service
//!     .derive(DerivationRequest::new("password", "saltsalt", 12))
//!     .unwrap();
//! assert_eq!(response.size, 12);
//! ```

pub mod config;
pub mod error;
pub mod kdf;
pub mod policy;
pub mod service;
pub mod wire;

#[cfg(feature = "server")]
pub mod cli;
#[cfg(feature = "server")]
pub mod server;

pub use error::{Error, PolicyViolation, Result};

// ============================================================================
// 常用类型导出
// ============================================================================

pub use config::{KdfParams, ServiceConfig};
pub use kdf::{Argon2idKdf, DerivationResult, KeyDerivation, SizedDeriver};
pub use policy::{DerivationRequest, Policy};
pub use service::{DeriveService, Reply};
pub use wire::{DeriveRequestBody, DeriveResponseBody, ErrorResponseBody};
