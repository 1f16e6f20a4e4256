//! 에러 타입 — 도메인별 에러 정의

/// pfstat 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum PfstatError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 상태 레코드 디코딩 에러
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 상태 레코드 디코딩 에러
///
/// 원시 레코드가 레이아웃 계약을 만족하지 못하는 경우 하나의 종류만 존재합니다.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// 필드 길이 부족, 범위를 벗어난 값 등
    #[error("malformed status record: field '{field}': {reason}")]
    MalformedRecord { field: String, reason: String },
}
