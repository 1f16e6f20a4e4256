//! 상태 디코더 에러 타입
//!
//! [`StatusError`]는 원시 레코드가 레이아웃 계약을 만족하지 못할 때 생성 시점에
//! 한 번만 발생합니다. 생성된 스냅샷의 렌더링은 실패하지 않습니다.

use pfstat_core::error::{DecodeError, PfstatError};

/// 상태 디코더 도메인 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    /// 배열 길이 부족, 버퍼 길이 부족, 범위를 벗어난 디버그 레벨
    #[error("malformed status record: field '{field}': {reason}")]
    MalformedRecord {
        /// 문제가 된 원시 필드 이름
        field: &'static str,
        /// 실패 사유
        reason: String,
    },
}

impl StatusError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            field,
            reason: reason.into(),
        }
    }
}

impl From<StatusError> for PfstatError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::MalformedRecord { field, reason } => {
                PfstatError::Decode(DecodeError::MalformedRecord {
                    field: field.to_owned(),
                    reason,
                })
            }
        }
    }
}
