//! 설정 관리 — pfstat.toml 파싱 및 런타임 설정
//!
//! [`PfstatConfig`]는 로깅과 상태 레코드 입력 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`PFSTAT_STATUS_INPUT=/tmp/status.bin` 형식)
//! 3. 설정 파일 (`pfstat.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), pfstat_core::error::PfstatError> {
//! use pfstat_core::config::PfstatConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = PfstatConfig::load("pfstat.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = PfstatConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use pfstat_pf_common::StatusLayout;

use crate::error::{ConfigError, PfstatError};

/// pfstat 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PfstatConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 상태 레코드 입력 설정
    #[serde(default)]
    pub status: StatusConfig,
}

impl PfstatConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PfstatError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값에 환경변수 오버라이드만 적용합니다.
    ///
    /// 파일이 존재하지만 파싱/검증에 실패하면 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, PfstatError> {
        match Self::load(path.as_ref()).await {
            Ok(config) => Ok(config),
            Err(PfstatError::Config(ConfigError::FileNotFound { path })) => {
                debug!(path = %path, "config file not found, using defaults");
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(e),
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, PfstatError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PfstatError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                PfstatError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, PfstatError> {
        toml::from_str(toml_str).map_err(|e| {
            PfstatError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `PFSTAT_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "PFSTAT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "PFSTAT_GENERAL_LOG_FORMAT");

        override_string(&mut self.status.input, "PFSTAT_STATUS_INPUT");
        override_string(&mut self.status.layout, "PFSTAT_STATUS_LAYOUT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), PfstatError> {
        self.general.validate()?;

        if StatusLayout::by_name(&self.status.layout).is_none() {
            let names: Vec<&str> = StatusLayout::KNOWN.iter().map(|l| l.name).collect();
            return Err(ConfigError::InvalidValue {
                field: "status.layout".to_owned(),
                reason: format!("must be one of: {}", names.join(", ")),
            }
            .into());
        }

        if self.status.input.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "status.input".to_owned(),
                reason: "input path must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 허용되는 로그 레벨
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
/// 허용되는 로그 형식
pub const LOG_FORMATS: [&str; 2] = ["json", "pretty"];

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl GeneralConfig {
    /// 로그 레벨과 형식을 검증합니다.
    ///
    /// CLI `--log-level` 오버라이드 후에도 같은 규칙으로 호출됩니다.
    pub fn validate(&self) -> Result<(), PfstatError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", LOG_LEVELS.join(", ")),
            }
            .into());
        }

        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }

        Ok(())
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 상태 레코드 입력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// 커널에서 덤프한 원시 상태 레코드 경로
    pub input: String,
    /// 레코드 레이아웃 이름 (v1)
    pub layout: String,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            input: "/var/db/pfstat/status.bin".to_owned(),
            layout: StatusLayout::V1.name.to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}
