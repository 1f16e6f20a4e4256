//! 상태 스냅샷 — 원시 레코드의 해석된 불변 뷰
//!
//! [`StatusSnapshot`]은 생성 시점에 모든 필드를 한 번에 디코딩합니다.
//! 잘못된 입력은 생성 시 `MalformedRecord`로 실패하며, 생성된 스냅샷은 이후
//! 변경되지 않으므로 여러 스레드에서 동시에 읽어도 안전합니다.

use std::fmt::Write;

use serde::Serialize;
use tracing::debug;

use pfstat_pf_common::{
    PF_DEBUG_MISC, PF_DEBUG_NOISY, PF_DEBUG_NONE, PF_DEBUG_URGENT, StatusLayout,
};

use crate::counters::{
    CounterGroup, LIMIT_COUNTER_LABELS, OPERATION_COUNTER_LABELS,
    SOURCE_TRACKING_COUNTER_LABELS, STATE_TABLE_COUNTER_LABELS, TrafficCounters,
};
use crate::error::StatusError;
use crate::raw::RawStatusRecord;

/// 패킷 필터 디버그 레벨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugLevel {
    None,
    Urgent,
    Misc,
    Loud,
}

impl DebugLevel {
    /// 리포트에 표시되는 라벨
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Urgent => "urgent",
            Self::Misc => "misc",
            Self::Loud => "loud",
        }
    }
}

impl TryFrom<u32> for DebugLevel {
    type Error = StatusError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            PF_DEBUG_NONE => Ok(Self::None),
            PF_DEBUG_URGENT => Ok(Self::Urgent),
            PF_DEBUG_MISC => Ok(Self::Misc),
            PF_DEBUG_NOISY => Ok(Self::Loud),
            other => Err(StatusError::malformed(
                "debug",
                format!("debug level {other} is outside 0..=3"),
            )),
        }
    }
}

/// 해석된 패킷 필터 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    interface_name: String,
    running: bool,
    since: Option<i64>,
    state_count: u32,
    source_node_count: u32,
    debug_level: DebugLevel,
    host_id: u32,
    checksum_hex: String,
    reassembly_flags: u32,
    state_id: u64,
    operation_counters: CounterGroup,
    limit_counters: CounterGroup,
    state_table_counters: CounterGroup,
    source_tracking_counters: CounterGroup,
    traffic: TrafficCounters,
}

impl StatusSnapshot {
    /// 원시 레코드에서 스냅샷을 생성합니다.
    ///
    /// # Errors
    /// 카운터 배열이 라벨 수보다 짧거나 디버그 레벨이 0..=3 범위를 벗어나면
    /// `MalformedRecord`를 반환합니다.
    pub fn from_raw(raw: &RawStatusRecord) -> Result<Self, StatusError> {
        let debug_level = DebugLevel::try_from(raw.debug)?;

        let operation_counters =
            CounterGroup::from_raw("counters", &OPERATION_COUNTER_LABELS, &raw.counters)?;
        let limit_counters =
            CounterGroup::from_raw("lcounters", &LIMIT_COUNTER_LABELS, &raw.lcounters)?;
        let state_table_counters =
            CounterGroup::from_raw("fcounters", &STATE_TABLE_COUNTER_LABELS, &raw.fcounters)?;
        let source_tracking_counters = CounterGroup::from_raw(
            "scounters",
            &SOURCE_TRACKING_COUNTER_LABELS,
            &raw.scounters,
        )?;

        let snapshot = Self {
            interface_name: raw.interface_name(),
            running: raw.running != 0,
            since: (raw.since != 0).then_some(raw.since),
            state_count: raw.states,
            source_node_count: raw.src_nodes,
            debug_level,
            host_id: u32::from_be(raw.hostid),
            checksum_hex: checksum_hex(&raw.checksum),
            reassembly_flags: raw.reass,
            state_id: raw.stateid,
            operation_counters,
            limit_counters,
            state_table_counters,
            source_tracking_counters,
            traffic: TrafficCounters::from_raw(raw.pcounters, raw.bcounters),
        };

        debug!(
            interface = snapshot.interface_name.as_str(),
            running = snapshot.running,
            states = snapshot.state_count,
            "decoded status snapshot"
        );

        Ok(snapshot)
    }

    /// 바이트 버퍼를 레이아웃으로 디코딩한 뒤 스냅샷을 생성합니다.
    pub fn decode(bytes: &[u8], layout: &StatusLayout) -> Result<Self, StatusError> {
        let raw = RawStatusRecord::decode(bytes, layout)?;
        Self::from_raw(&raw)
    }

    /// 감시 인터페이스 이름 (비어 있으면 인터페이스 통계 없음)
    pub fn interface_name(&self) -> &str {
        &self.interface_name
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 마지막 활성화 시각 (epoch 초)
    pub fn since(&self) -> Option<i64> {
        self.since
    }

    pub fn state_count(&self) -> u32 {
        self.state_count
    }

    pub fn source_node_count(&self) -> u32 {
        self.source_node_count
    }

    pub fn debug_level(&self) -> DebugLevel {
        self.debug_level
    }

    /// 호스트 바이트 오더로 변환된 host id
    pub fn host_id(&self) -> u32 {
        self.host_id
    }

    /// `0x` 접두사가 붙은 소문자 16진 체크섬
    pub fn checksum_hex(&self) -> &str {
        &self.checksum_hex
    }

    pub fn reassembly_flags(&self) -> u32 {
        self.reassembly_flags
    }

    pub fn state_id(&self) -> u64 {
        self.state_id
    }

    pub fn operation_counters(&self) -> &CounterGroup {
        &self.operation_counters
    }

    pub fn limit_counters(&self) -> &CounterGroup {
        &self.limit_counters
    }

    pub fn state_table_counters(&self) -> &CounterGroup {
        &self.state_table_counters
    }

    pub fn source_tracking_counters(&self) -> &CounterGroup {
        &self.source_tracking_counters
    }

    pub fn traffic(&self) -> &TrafficCounters {
        &self.traffic
    }
}

fn checksum_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        // String에 대한 fmt::Write는 실패하지 않습니다.
        let _ = write!(out, "{b:02x}");
    }
    out
}
