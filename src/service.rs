//! 派生服务
//!
//! 与传输层无关的请求处理：解析 → 校验 → 派生 → 响应信封。
//! HTTP 层只负责搬运字节和状态码。
//!
//! ## 示例
//!
//! ```rust
//! use sized_kdf::config::{KdfParams, ServiceConfig};
//! use sized_kdf::service::DeriveService;
//!
//! let service = DeriveService::new(ServiceConfig::new().with_kdf(KdfParams::TESTING)).unwrap();
//!
//! let reply = service.handle(br#"{"password": "password", "salt": "saltsalt", "size": 8}"#);
//! assert_eq!(reply.status, 200);
//!
//! let reply = service.handle(br#"{"password": "short", "salt": "saltsalt", "size": 8}"#);
//! assert_eq!(reply.status, 400);
//! ```

use tracing::{error, warn};

use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::kdf::{Argon2idKdf, KeyDerivation, SizedDeriver};
use crate::policy::DerivationRequest;
use crate::wire::{DeriveRequestBody, DeriveResponseBody, ErrorResponseBody};

/// 连错误信封都无法序列化时返回的固定响应体
const FALLBACK_ERROR_BODY: &[u8] = br#"{"errors":["An internal error occurred"]}"#;

/// 成功状态码
pub const STATUS_OK: u16 = 200;
/// 请求格式错误或违反策略
pub const STATUS_BAD_REQUEST: u16 = 400;
/// 内部错误
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// 一次请求的应答：状态码和 JSON 响应体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Reply {
    /// 是否成功
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    /// 把错误转换为失败信封
    pub fn from_error(err: &Error) -> Self {
        let status = if err.is_client_error() {
            STATUS_BAD_REQUEST
        } else {
            STATUS_INTERNAL_ERROR
        };
        let body = serde_json::to_vec(&ErrorResponseBody::from(err)).unwrap_or_else(|e| {
            error!(error = %e, "failed to serialize error response");
            FALLBACK_ERROR_BODY.to_vec()
        });
        Self { status, body }
    }
}

/// 派生服务
///
/// 只持有只读配置，可通过 `Arc` 在并发请求间共享。
#[derive(Debug, Clone)]
pub struct DeriveService<K = Argon2idKdf> {
    config: ServiceConfig,
    deriver: SizedDeriver<K>,
}

impl DeriveService<Argon2idKdf> {
    /// 用 Argon2id 创建服务
    ///
    /// 配置无效时返回错误，调用方应当拒绝启动。
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let kdf = Argon2idKdf::new(config.kdf)?;
        Ok(Self {
            config,
            deriver: SizedDeriver::new(kdf),
        })
    }
}

impl<K: KeyDerivation> DeriveService<K> {
    /// 用自定义派生原语创建服务
    pub fn with_kdf(config: ServiceConfig, kdf: K) -> Result<Self> {
        config.validate_limits()?;
        Ok(Self {
            config,
            deriver: SizedDeriver::new(kdf),
        })
    }

    /// 当前配置
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// 校验并派生
    ///
    /// 任一策略违规时不进行派生，所有违规一并返回。
    pub fn derive(&self, mut request: DerivationRequest) -> Result<DeriveResponseBody> {
        let violations = self.config.policy.validate(&mut request);
        if !violations.is_empty() {
            return Err(violations.into());
        }

        let result = self.deriver.derive(
            request.password.as_bytes(),
            request.salt.as_bytes(),
            request.desired_size,
        )?;

        let size = u32::try_from(result.encoded_size)
            .map_err(|_| Error::internal("encoded size does not fit in u32"))?;
        Ok(DeriveResponseBody {
            hashed: result.encoded,
            size,
        })
    }

    /// 处理原始请求体
    pub fn process(&self, body: &[u8]) -> Result<DeriveResponseBody> {
        let request = DeriveRequestBody::from_slice(body)?;
        self.derive(request.into())
    }

    /// 处理原始请求体并生成应答，总是返回两种信封之一
    pub fn handle(&self, body: &[u8]) -> Reply {
        let outcome = self.process(body).and_then(|response| {
            serde_json::to_vec(&response).map_err(|e| Error::Serialization(e.to_string()))
        });

        match outcome {
            Ok(body) => Reply {
                status: STATUS_OK,
                body,
            },
            Err(err) => {
                if err.is_client_error() {
                    warn!(error = %err, "rejected derivation request");
                } else {
                    error!(error = %err, "derivation request failed");
                }
                Reply::from_error(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KdfParams;
    use crate::error::{DerivationError, PolicyViolation};
    use crate::kdf::encoding::is_alphabet_char;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_service() -> DeriveService {
        DeriveService::new(ServiceConfig::new().with_kdf(KdfParams::TESTING)).unwrap()
    }

    /// 统计调用次数的原语
    #[derive(Default)]
    struct CountingKdf {
        calls: AtomicUsize,
    }

    impl KeyDerivation for CountingKdf {
        fn derive_into(&self, _password: &[u8], _salt: &[u8], out: &mut [u8]) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            out.fill(7);
            Ok(())
        }
    }

    /// 总是失败的原语
    struct FailingKdf;

    impl KeyDerivation for FailingKdf {
        fn derive_into(&self, _password: &[u8], _salt: &[u8], _out: &mut [u8]) -> Result<()> {
            Err(DerivationError::Primitive("boom".to_string()).into())
        }
    }

    #[test]
    fn test_derive_success() {
        let service = test_service();
        let response = service
            .derive(DerivationRequest::new("password", "saltsalt", 8))
            .unwrap();
        assert_eq!(response.size, 8);
        assert_eq!(response.hashed.len(), 8);
        assert!(response.hashed.chars().all(is_alphabet_char));
    }

    #[test]
    fn test_size_zero_behaves_like_floor() {
        let service = test_service();
        let zero = service
            .derive(DerivationRequest::new("password", "saltsalt", 0))
            .unwrap();
        let eight = service
            .derive(DerivationRequest::new("password", "saltsalt", 8))
            .unwrap();
        assert_eq!(zero, eight);
    }

    #[test]
    fn test_violations_skip_derivation() {
        let service = DeriveService::with_kdf(ServiceConfig::new(), CountingKdf::default()).unwrap();
        let err = service
            .derive(DerivationRequest::new("pass", "salt", 8))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ref v) if v == &[PolicyViolation::PasswordTooShort, PolicyViolation::SaltTooShort]
        ));
        assert_eq!(service.deriver.kdf().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_malformed_skips_derivation() {
        let service = DeriveService::with_kdf(ServiceConfig::new(), CountingKdf::default()).unwrap();
        let reply = service.handle(br#"{"password": "password"}"#);

        assert_eq!(reply.status, STATUS_BAD_REQUEST);
        let body: ErrorResponseBody = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(body.errors, vec!["The request is malformed"]);
        assert_eq!(service.deriver.kdf().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handle_success_envelope() {
        let service = test_service();
        let reply = service.handle(br#"{"password": "password", "salt": "saltsalt", "size": 43}"#);

        assert!(reply.is_success());
        let body: DeriveResponseBody = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(body.size, 43);
        assert_eq!(body.hashed.len(), 43);
    }

    #[test]
    fn test_handle_reports_all_violations() {
        let service = test_service();
        let reply = service.handle(br#"{"password": "pass", "salt": "salt", "size": 8}"#);

        assert_eq!(reply.status, STATUS_BAD_REQUEST);
        let body: ErrorResponseBody = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(
            body.errors,
            vec!["The password is too short", "The salt is too short"]
        );
    }

    #[test]
    fn test_handle_size_too_large() {
        let service = test_service();
        let reply = service.handle(br#"{"password": "password", "salt": "saltsalt", "size": 1000000}"#);

        assert_eq!(reply.status, STATUS_BAD_REQUEST);
        let body: ErrorResponseBody = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(body.errors, vec!["The requested size is too large"]);
    }

    #[test]
    fn test_primitive_failure_is_internal() {
        let service = DeriveService::with_kdf(ServiceConfig::new(), FailingKdf).unwrap();
        let reply = service.handle(br#"{"password": "password", "salt": "saltsalt", "size": 8}"#);

        assert_eq!(reply.status, STATUS_INTERNAL_ERROR);
        let body: ErrorResponseBody = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(body.errors, vec!["An internal error occurred"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ServiceConfig::new().with_kdf(KdfParams::new(8, 1, 4));
        assert!(DeriveService::new(config).is_err());
    }

    #[test]
    fn test_fallback_body_is_valid_json() {
        let body: ErrorResponseBody = serde_json::from_slice(FALLBACK_ERROR_BODY).unwrap();
        assert_eq!(body.errors.len(), 1);
    }
}
