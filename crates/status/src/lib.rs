//! 패킷 필터 상태 레코드 디코더
//!
//! 커널이 채워 준 고정 레이아웃 `pf_status` 레코드를 타입이 있는 필드로
//! 해석하고, 사람이 읽을 수 있는 리포트로 렌더링합니다. 레코드 획득(ioctl)은
//! 이 크레이트의 범위가 아닙니다.
//!
//! # 모듈 구성
//! - [`raw`]: 레이아웃 기반 바이트 디코딩 ([`RawStatusRecord`])
//! - [`counters`]: 라벨 테이블, [`CounterGroup`], 트래픽 축 열거형
//! - [`snapshot`]: 불변 스냅샷 [`StatusSnapshot`]
//! - [`report`]: 열 정렬 텍스트 리포트 (`render`, `render_at`)
//! - [`delta`]: 스냅샷 간 증가량 [`SnapshotDelta`]
//!
//! # 사용 예시
//! ```no_run
//! use pfstat_pf_common::StatusLayout;
//! use pfstat_status::StatusSnapshot;
//!
//! # fn example(bytes: &[u8]) -> Result<(), pfstat_status::StatusError> {
//! let snapshot = StatusSnapshot::decode(bytes, &StatusLayout::V1)?;
//! println!("{}", snapshot.render());
//! # Ok(())
//! # }
//! ```

pub mod counters;
pub mod delta;
pub mod error;
pub mod raw;
pub mod report;
pub mod snapshot;

// --- 주요 타입 re-export ---

pub use counters::{AddressFamily, CounterGroup, Direction, PacketAction, TrafficCounters};
pub use delta::{DeltaSection, SnapshotDelta};
pub use error::StatusError;
pub use raw::RawStatusRecord;
pub use snapshot::{DebugLevel, StatusSnapshot};

// 레이아웃 (커널/유저스페이스 공통)
pub use pfstat_pf_common;
