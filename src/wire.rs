//! 请求与响应的 JSON 信封

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::policy::DerivationRequest;

/// 入站请求
///
/// 三个字段都必须存在；未知字段被忽略。
#[derive(Clone, Deserialize)]
pub struct DeriveRequestBody {
    pub password: String,
    pub salt: String,
    pub size: u32,
}

impl DeriveRequestBody {
    /// 从 JSON 字节解析
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| Error::malformed(e.to_string()))
    }
}

impl From<DeriveRequestBody> for DerivationRequest {
    fn from(body: DeriveRequestBody) -> Self {
        DerivationRequest::new(body.password, body.salt, body.size as usize)
    }
}

/// 成功响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeriveResponseBody {
    /// 编码后的密钥
    pub hashed: String,
    /// 实际编码长度
    pub size: u32,
}

/// 失败响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponseBody {
    /// 可读的错误消息，失败时永不为空
    pub errors: Vec<String>,
}

impl From<&Error> for ErrorResponseBody {
    fn from(err: &Error) -> Self {
        Self {
            errors: err.messages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MALFORMED_REQUEST_MESSAGE;

    #[test]
    fn test_parse_valid_body() {
        let body = DeriveRequestBody::from_slice(
            br#"{"size": 12, "salt": "saltsalt", "password": "password"}"#,
        )
        .unwrap();
        assert_eq!(body.password, "password");
        assert_eq!(body.salt, "saltsalt");
        assert_eq!(body.size, 12);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let body = DeriveRequestBody::from_slice(
            br#"{"password": "password", "salt": "saltsalt", "size": 8, "extra": true}"#,
        );
        assert!(body.is_ok());
    }

    #[test]
    fn test_malformed_bodies() {
        let cases: &[&[u8]] = &[
            b"",
            b"not json",
            br#"{"password": "password", "salt": "saltsalt"}"#,
            br#"{"password": "password", "size": 8}"#,
            br#"{"salt": "saltsalt", "size": 8}"#,
            br#"{"password": "password", "salt": "saltsalt", "size": -1}"#,
            br#"{"password": "password", "salt": "saltsalt", "size": 8.5}"#,
            br#"{"password": "password", "salt": "saltsalt", "size": "8"}"#,
            br#"{"password": 12345678, "salt": "saltsalt", "size": 8}"#,
            br#""password""#,
        ];
        for case in cases {
            let err = DeriveRequestBody::from_slice(case).err().unwrap();
            assert!(matches!(err, Error::MalformedRequest(_)));
            assert_eq!(err.messages(), vec![MALFORMED_REQUEST_MESSAGE]);
        }
    }

    #[test]
    fn test_response_shapes() {
        let ok = DeriveResponseBody {
            hashed: "abcdEFGH".to_string(),
            size: 8,
        };
        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"{"hashed":"abcdEFGH","size":8}"#
        );

        let err = ErrorResponseBody {
            errors: vec!["The salt is too short".to_string()],
        };
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            r#"{"errors":["The salt is too short"]}"#
        );
    }
}
