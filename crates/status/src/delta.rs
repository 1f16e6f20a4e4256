//! 스냅샷 간 카운터 증가량
//!
//! 카운터는 필터가 활성화된 동안 단조 증가하고 재활성화 시(`since` 변경)에만
//! 초기화됩니다. 따라서 두 스냅샷의 `since`가 다르면 차이를 계산하지 않습니다.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::counters::{CounterGroup, TrafficCounters};
use crate::snapshot::StatusSnapshot;

/// 같은 활성화 구간에 속한 두 스냅샷의 차이
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotDelta {
    /// 이전 스냅샷 대비 상태 테이블 크기 변화
    pub state_count_change: i64,
    pub source_node_count_change: i64,
    pub operation_counters: CounterGroup,
    pub limit_counters: CounterGroup,
    pub state_table_counters: CounterGroup,
    pub source_tracking_counters: CounterGroup,
    pub traffic: TrafficCounters,
}

/// 리포트 섹션 하나
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaSection<'a> {
    pub title: &'static str,
    /// 테이블 섹션의 현재 항목 수 변화. 카운터 섹션은 `None`
    pub current_change: Option<i64>,
    pub counters: &'a CounterGroup,
}

impl SnapshotDelta {
    /// 리포트 섹션을 출력 순서대로 반환합니다.
    pub fn sections(&self) -> [DeltaSection<'_>; 4] {
        [
            DeltaSection {
                title: "State Table",
                current_change: Some(self.state_count_change),
                counters: &self.state_table_counters,
            },
            DeltaSection {
                title: "Source Tracking Table",
                current_change: Some(self.source_node_count_change),
                counters: &self.source_tracking_counters,
            },
            DeltaSection {
                title: "Counters",
                current_change: None,
                counters: &self.operation_counters,
            },
            DeltaSection {
                title: "Limit Counters",
                current_change: None,
                counters: &self.limit_counters,
            },
        ]
    }

    /// 간격 동안의 초당 비율. 간격이 0이면 `None`
    #[allow(clippy::cast_precision_loss)]
    pub fn rate(value: u64, interval: Duration) -> Option<f64> {
        let secs = interval.as_secs_f64();
        (secs > 0.0).then(|| value as f64 / secs)
    }
}

impl StatusSnapshot {
    /// `earlier` 이후의 카운터 증가량을 계산합니다.
    ///
    /// 두 스냅샷의 `since`가 다르면(재활성화로 카운터가 초기화됨) `None`을
    /// 반환합니다. 감소한 카운터는 0으로 고정합니다.
    pub fn delta_since(&self, earlier: &StatusSnapshot) -> Option<SnapshotDelta> {
        if self.since() != earlier.since() {
            debug!(
                earlier = ?earlier.since(),
                later = ?self.since(),
                "filter was re-enabled between snapshots, counters are not comparable"
            );
            return None;
        }

        Some(SnapshotDelta {
            state_count_change: i64::from(self.state_count()) - i64::from(earlier.state_count()),
            source_node_count_change: i64::from(self.source_node_count())
                - i64::from(earlier.source_node_count()),
            operation_counters: self
                .operation_counters()
                .saturating_sub(earlier.operation_counters()),
            limit_counters: self
                .limit_counters()
                .saturating_sub(earlier.limit_counters()),
            state_table_counters: self
                .state_table_counters()
                .saturating_sub(earlier.state_table_counters()),
            source_tracking_counters: self
                .source_tracking_counters()
                .saturating_sub(earlier.source_tracking_counters()),
            traffic: self.traffic().saturating_sub(earlier.traffic()),
        })
    }
}
