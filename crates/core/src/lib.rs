//! pfstat 공통 크레이트
//!
//! # 모듈 구성
//! - [`config`]: `pfstat.toml` 파싱, 환경변수 오버라이드, 유효성 검증
//! - [`error`]: 최상위 에러 타입 [`PfstatError`]와 도메인별 에러

pub mod config;
pub mod error;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, DecodeError, PfstatError};

// 설정
pub use config::{GeneralConfig, PfstatConfig, StatusConfig};
