//! 카운터 그룹 — 위치 기반 원시 배열에 고정 라벨 부여
//!
//! 각 그룹의 라벨 순서는 원시 배열 인덱스와 1:1로 고정되어 있으며 리포트 출력
//! 순서이기도 합니다. 따라서 해시 맵이 아닌 `(라벨, 값)` 순서 목록으로 보관합니다.

use serde::ser::{Serialize, SerializeMap, Serializer};

use pfstat_pf_common::{
    FCNT_MAX, LCNT_MAX, PF_AF_INET_IDX, PF_AF_INET6_IDX, PF_DIR_IN_IDX, PF_DIR_OUT_IDX, PF_DROP,
    PF_PASS, PFRES_MAX, SCNT_MAX,
};

use crate::error::StatusError;

// =============================================================================
// 라벨 테이블
// =============================================================================

/// 연산 카운터 라벨 (`counters[0..15]`)
pub const OPERATION_COUNTER_LABELS: [&str; PFRES_MAX] = [
    "match",
    "bad-offset",
    "fragment",
    "short",
    "normalize",
    "memory",
    "bad-timestamp",
    "congestion",
    "ip-option",
    "proto-cksum",
    "state-mismatch",
    "state-insert",
    "state-limit",
    "src-limit",
    "synproxy",
];

/// 한도 카운터 라벨 (`lcounters[0..7]`)
pub const LIMIT_COUNTER_LABELS: [&str; LCNT_MAX] = [
    "max states per rule",
    "max-src-states",
    "max-src-nodes",
    "max-src-conn",
    "max-src-conn-rate",
    "overload table insertion",
    "overload flush states",
];

/// 상태 테이블 카운터 라벨 (`fcounters[0..3]`)
pub const STATE_TABLE_COUNTER_LABELS: [&str; FCNT_MAX] = ["searches", "inserts", "removals"];

/// 소스 추적 테이블 카운터 라벨 (`scounters[0..3]`)
pub const SOURCE_TRACKING_COUNTER_LABELS: [&str; SCNT_MAX] = ["searches", "inserts", "removals"];

// =============================================================================
// CounterGroup
// =============================================================================

/// 라벨이 붙은 카운터 묶음
///
/// 항목 순서는 라벨 테이블 순서와 같습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterGroup {
    entries: Vec<(&'static str, u64)>,
}

impl CounterGroup {
    /// 라벨 목록과 원시 배열을 위치 순서대로 묶습니다.
    ///
    /// 원시 배열이 라벨 수보다 짧으면 `MalformedRecord`, 길면 남는 항목은 무시합니다.
    pub fn from_raw(
        field: &'static str,
        labels: &[&'static str],
        raw: &[u64],
    ) -> Result<Self, StatusError> {
        if raw.len() < labels.len() {
            return Err(StatusError::malformed(
                field,
                format!("expected {} entries, got {}", labels.len(), raw.len()),
            ));
        }
        let entries = labels.iter().copied().zip(raw.iter().copied()).collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(라벨, 값)`을 라벨 테이블 순서대로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// 라벨로 값을 조회합니다.
    pub fn get(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| *v)
    }

    /// 같은 라벨 구성의 이전 그룹과의 차이 (음수는 0으로 고정)
    pub(crate) fn saturating_sub(&self, earlier: &Self) -> Self {
        let entries = self
            .entries
            .iter()
            .zip(&earlier.entries)
            .map(|(&(label, now), &(_, then))| (label, now.saturating_sub(then)))
            .collect();
        Self { entries }
    }
}

impl Serialize for CounterGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

// =============================================================================
// 트래픽 축
// =============================================================================

/// 트래픽 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub const ALL: [Self; 2] = [Self::In, Self::Out];

    fn index(self) -> usize {
        match self {
            Self::In => PF_DIR_IN_IDX,
            Self::Out => PF_DIR_OUT_IDX,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::In => "In",
            Self::Out => "Out",
        }
    }
}

/// 주소 패밀리
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Inet,
    Inet6,
}

impl AddressFamily {
    pub const ALL: [Self; 2] = [Self::Inet, Self::Inet6];

    fn index(self) -> usize {
        match self {
            Self::Inet => PF_AF_INET_IDX,
            Self::Inet6 => PF_AF_INET6_IDX,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Inet => "IPv4",
            Self::Inet6 => "IPv6",
        }
    }
}

/// 패킷 처리 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketAction {
    Passed,
    Blocked,
}

impl PacketAction {
    pub const ALL: [Self; 2] = [Self::Passed, Self::Blocked];

    fn index(self) -> usize {
        match self {
            Self::Passed => PF_PASS,
            Self::Blocked => PF_DROP,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Blocked => "Blocked",
        }
    }
}

// =============================================================================
// TrafficCounters
// =============================================================================

/// 인터페이스 바이트/패킷 카운터
///
/// 원시 배열의 `[af][dir]...` 순서를 그대로 보관하고, 조회는 열거형 축으로만
/// 합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficCounters {
    /// `[af][dir][action]`
    packets: [[[u64; 2]; 2]; 2],
    /// `[af][dir]`
    bytes: [[u64; 2]; 2],
}

impl TrafficCounters {
    pub fn from_raw(pcounters: [[[u64; 2]; 2]; 2], bcounters: [[u64; 2]; 2]) -> Self {
        Self {
            packets: pcounters,
            bytes: bcounters,
        }
    }

    pub fn bytes(&self, dir: Direction, af: AddressFamily) -> u64 {
        self.bytes[af.index()][dir.index()]
    }

    pub fn packets(&self, dir: Direction, action: PacketAction, af: AddressFamily) -> u64 {
        self.packets[af.index()][dir.index()][action.index()]
    }

    pub(crate) fn saturating_sub(&self, earlier: &Self) -> Self {
        let mut out = *self;
        for (af, by_dir) in out.packets.iter_mut().enumerate() {
            for (dir, by_action) in by_dir.iter_mut().enumerate() {
                for (action, v) in by_action.iter_mut().enumerate() {
                    *v = v.saturating_sub(earlier.packets[af][dir][action]);
                }
            }
        }
        for (af, by_dir) in out.bytes.iter_mut().enumerate() {
            for (dir, v) in by_dir.iter_mut().enumerate() {
                *v = v.saturating_sub(earlier.bytes[af][dir]);
            }
        }
        out
    }
}

/// JSON 형태: `{"in": {"bytes": {"ipv4": .., "ipv6": ..}, "passed": {..}, "blocked": {..}}, "out": ..}`
impl Serialize for TrafficCounters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct PerFamily {
            ipv4: u64,
            ipv6: u64,
        }

        #[derive(serde::Serialize)]
        struct PerDirection {
            bytes: PerFamily,
            passed: PerFamily,
            blocked: PerFamily,
        }

        let mut map = serializer.serialize_map(Some(Direction::ALL.len()))?;
        for dir in Direction::ALL {
            let packets = |action| PerFamily {
                ipv4: self.packets(dir, action, AddressFamily::Inet),
                ipv6: self.packets(dir, action, AddressFamily::Inet6),
            };
            let entry = PerDirection {
                bytes: PerFamily {
                    ipv4: self.bytes(dir, AddressFamily::Inet),
                    ipv6: self.bytes(dir, AddressFamily::Inet6),
                },
                passed: packets(PacketAction::Passed),
                blocked: packets(PacketAction::Blocked),
            };
            let key = match dir {
                Direction::In => "in",
                Direction::Out => "out",
            };
            map.serialize_entry(key, &entry)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_zips_labels_in_order() {
        let raw: Vec<u64> = (0..15).map(|i| i * 10).collect();
        let group =
            CounterGroup::from_raw("counters", &OPERATION_COUNTER_LABELS, &raw).unwrap();

        assert_eq!(group.len(), 15);
        let labels: Vec<&str> = group.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, OPERATION_COUNTER_LABELS.to_vec());
        for (i, (_, v)) in group.iter().enumerate() {
            assert_eq!(v, raw[i]);
        }
        assert_eq!(group.get("match"), Some(0));
        assert_eq!(group.get("synproxy"), Some(140));
        assert_eq!(group.get("nonexistent"), None);
    }

    #[test]
    fn from_raw_rejects_short_array() {
        let err = CounterGroup::from_raw("lcounters", &LIMIT_COUNTER_LABELS, &[1, 2, 3])
            .unwrap_err();
        assert_eq!(
            err,
            StatusError::MalformedRecord {
                field: "lcounters",
                reason: "expected 7 entries, got 3".to_owned(),
            }
        );
    }

    #[test]
    fn from_raw_ignores_extra_entries() {
        let group = CounterGroup::from_raw(
            "fcounters",
            &STATE_TABLE_COUNTER_LABELS,
            &[1, 2, 3, 99, 100],
        )
        .unwrap();
        assert_eq!(group.len(), 3);
        assert_eq!(group.get("removals"), Some(3));
    }

    #[test]
    fn serialize_preserves_label_order() {
        let group =
            CounterGroup::from_raw("scounters", &SOURCE_TRACKING_COUNTER_LABELS, &[7, 8, 9])
                .unwrap();
        let json = serde_json::to_string(&group).unwrap();
        assert_eq!(json, r#"{"searches":7,"inserts":8,"removals":9}"#);
    }

    #[test]
    fn saturating_sub_never_underflows() {
        let later =
            CounterGroup::from_raw("fcounters", &STATE_TABLE_COUNTER_LABELS, &[10, 5, 0])
                .unwrap();
        let earlier =
            CounterGroup::from_raw("fcounters", &STATE_TABLE_COUNTER_LABELS, &[4, 9, 0])
                .unwrap();
        let delta = later.saturating_sub(&earlier);
        assert_eq!(delta.get("searches"), Some(6));
        assert_eq!(delta.get("inserts"), Some(0));
    }

    #[test]
    fn traffic_axes_map_to_raw_positions() {
        // pcounters[af][dir][action], bcounters[af][dir]
        let traffic = TrafficCounters::from_raw(
            [[[1, 2], [3, 4]], [[5, 6], [7, 8]]],
            [[10, 11], [12, 13]],
        );

        assert_eq!(traffic.bytes(Direction::In, AddressFamily::Inet), 10);
        assert_eq!(traffic.bytes(Direction::Out, AddressFamily::Inet), 11);
        assert_eq!(traffic.bytes(Direction::In, AddressFamily::Inet6), 12);
        assert_eq!(traffic.bytes(Direction::Out, AddressFamily::Inet6), 13);

        use AddressFamily::*;
        use PacketAction::*;
        assert_eq!(traffic.packets(Direction::In, Passed, Inet), 1);
        assert_eq!(traffic.packets(Direction::In, Blocked, Inet), 2);
        assert_eq!(traffic.packets(Direction::Out, Passed, Inet), 3);
        assert_eq!(traffic.packets(Direction::Out, Blocked, Inet), 4);
        assert_eq!(traffic.packets(Direction::In, Passed, Inet6), 5);
        assert_eq!(traffic.packets(Direction::Out, Blocked, Inet6), 8);
    }

    #[test]
    fn traffic_serializes_by_direction() {
        let traffic = TrafficCounters::from_raw(
            [[[1, 2], [3, 4]], [[5, 6], [7, 8]]],
            [[10, 11], [12, 13]],
        );
        let value = serde_json::to_value(traffic).unwrap();
        assert_eq!(value["in"]["bytes"]["ipv4"], 10);
        assert_eq!(value["in"]["bytes"]["ipv6"], 12);
        assert_eq!(value["out"]["blocked"]["ipv6"], 8);
        assert_eq!(value["out"]["passed"]["ipv4"], 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn values_follow_label_positions(
                raw in proptest::collection::vec(any::<u64>(), LCNT_MAX..LCNT_MAX + 8)
            ) {
                let group =
                    CounterGroup::from_raw("lcounters", &LIMIT_COUNTER_LABELS, &raw).unwrap();
                prop_assert_eq!(group.len(), LIMIT_COUNTER_LABELS.len());
                for (i, (label, value)) in group.iter().enumerate() {
                    prop_assert_eq!(label, LIMIT_COUNTER_LABELS[i]);
                    prop_assert_eq!(value, raw[i]);
                }
            }

            #[test]
            fn short_raw_array_is_malformed(
                raw in proptest::collection::vec(any::<u64>(), 0..PFRES_MAX)
            ) {
                let err = CounterGroup::from_raw("counters", &OPERATION_COUNTER_LABELS, &raw)
                    .unwrap_err();
                prop_assert!(
                    matches!(err, StatusError::MalformedRecord { field: "counters", .. }),
                    "unexpected error: {:?}",
                    err
                );
            }
        }
    }
}

