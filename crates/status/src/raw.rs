//! 원시 상태 레코드 — 레이아웃 기반 바이트 디코딩
//!
//! [`RawStatusRecord`]는 커널 `pf_status` 구조체의 필드를 해석 없이 그대로 담은
//! 중간 표현입니다. 바이트 버퍼는 [`StatusLayout`]이 정의한 필드 순서와 폭에 따라
//! 읽으며, 의미 부여(라벨, 바이트 오더 정규화, 범위 검증)는
//! [`StatusSnapshot`](crate::StatusSnapshot)이 담당합니다.
//!
//! # 데이터 흐름
//! ```text
//! &[u8] ──decode(layout)──▶ RawStatusRecord ──from_raw──▶ StatusSnapshot
//!                            (네이티브 값 그대로)          (라벨/정규화)
//! ```

use bytes::Buf;
use tracing::debug;

use pfstat_pf_common::{PfStatus, StatusLayout};

use crate::error::StatusError;

/// 해석 전 원시 상태 레코드
///
/// 카운터 배열은 `Vec`이므로 레이아웃 버전에 따라 길이가 다를 수 있습니다.
/// 길이 검증은 스냅샷 생성 시 수행됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStatusRecord {
    /// 인터페이스 이름 버퍼 (NUL 패딩 포함)
    pub ifname: Vec<u8>,
    /// 0이 아니면 활성화 상태
    pub running: u32,
    /// 마지막 활성화 시각 (epoch 초), 0이면 정보 없음
    pub since: i64,
    pub states: u32,
    pub src_nodes: u32,
    pub debug: u32,
    /// 메모리에 저장된 그대로의 값 (네트워크 바이트 오더)
    pub hostid: u32,
    pub reass: u32,
    pub stateid: u64,
    pub checksum: Vec<u8>,
    pub counters: Vec<u64>,
    pub lcounters: Vec<u64>,
    pub fcounters: Vec<u64>,
    pub scounters: Vec<u64>,
    /// `[af][dir][action]`
    pub pcounters: [[[u64; 2]; 2]; 2],
    /// `[af][dir]`
    pub bcounters: [[u64; 2]; 2],
}

impl RawStatusRecord {
    /// 바이트 버퍼를 주어진 레이아웃으로 디코딩합니다.
    ///
    /// 버퍼가 레코드 길이보다 짧으면 `MalformedRecord`를 반환합니다.
    /// 레코드 길이를 넘는 뒷부분은 무시합니다.
    pub fn decode(bytes: &[u8], layout: &StatusLayout) -> Result<Self, StatusError> {
        let record_len = layout.record_len();
        if bytes.len() < record_len {
            return Err(StatusError::malformed(
                "record",
                format!(
                    "layout {} needs {} bytes, got {}",
                    layout.name,
                    record_len,
                    bytes.len()
                ),
            ));
        }
        if bytes.len() > record_len {
            debug!(
                layout = layout.name,
                record_len,
                trailing = bytes.len() - record_len,
                "ignoring trailing bytes after status record"
            );
        }

        let mut buf = &bytes[..record_len];

        let counters = get_u64_vec(&mut buf, layout.counters);
        let lcounters = get_u64_vec(&mut buf, layout.lcounters);
        let fcounters = get_u64_vec(&mut buf, layout.fcounters);
        let scounters = get_u64_vec(&mut buf, layout.scounters);

        let mut pcounters = [[[0u64; 2]; 2]; 2];
        for by_dir in pcounters.iter_mut() {
            for by_action in by_dir.iter_mut() {
                for slot in by_action.iter_mut() {
                    *slot = buf.get_u64_ne();
                }
            }
        }

        let mut bcounters = [[0u64; 2]; 2];
        for by_dir in bcounters.iter_mut() {
            for slot in by_dir.iter_mut() {
                *slot = buf.get_u64_ne();
            }
        }

        let stateid = buf.get_u64_ne();
        let since = buf.get_i64_ne();
        let running = buf.get_u32_ne();
        let states = buf.get_u32_ne();
        let src_nodes = buf.get_u32_ne();
        let debug = buf.get_u32_ne();
        let hostid = buf.get_u32_ne();
        let reass = buf.get_u32_ne();

        let mut ifname = vec![0u8; layout.ifname_len];
        buf.copy_to_slice(&mut ifname);
        let mut checksum = vec![0u8; layout.checksum_len];
        buf.copy_to_slice(&mut checksum);

        debug!(
            layout = layout.name,
            record_len,
            padding = buf.remaining(),
            "decoded raw status record"
        );

        Ok(Self {
            ifname,
            running,
            since,
            states,
            src_nodes,
            debug,
            hostid,
            reass,
            stateid,
            checksum,
            counters,
            lcounters,
            fcounters,
            scounters,
            pcounters,
            bcounters,
        })
    }

    /// NUL 이전까지의 인터페이스 이름
    pub fn interface_name(&self) -> String {
        let end = self
            .ifname
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.ifname.len());
        String::from_utf8_lossy(&self.ifname[..end]).into_owned()
    }
}

impl From<&PfStatus> for RawStatusRecord {
    fn from(s: &PfStatus) -> Self {
        Self {
            ifname: s.ifname.to_vec(),
            running: s.running,
            since: s.since,
            states: s.states,
            src_nodes: s.src_nodes,
            debug: s.debug,
            hostid: s.hostid,
            reass: s.reass,
            stateid: s.stateid,
            checksum: s.pf_chksum.to_vec(),
            counters: s.counters.to_vec(),
            lcounters: s.lcounters.to_vec(),
            fcounters: s.fcounters.to_vec(),
            scounters: s.scounters.to_vec(),
            pcounters: s.pcounters,
            bcounters: s.bcounters,
        }
    }
}

fn get_u64_vec(buf: &mut &[u8], count: usize) -> Vec<u64> {
    (0..count).map(|_| buf.get_u64_ne()).collect()
}

#[cfg(test)]
pub(crate) mod testutil {
    use bytes::BufMut;

    use super::*;

    /// 레이아웃 v1 순서대로 네이티브 구조체를 직렬화합니다.
    pub(crate) fn encode_v1(s: &PfStatus) -> Vec<u8> {
        let mut out = Vec::with_capacity(StatusLayout::V1.record_len());
        for v in s
            .counters
            .iter()
            .chain(&s.lcounters)
            .chain(&s.fcounters)
            .chain(&s.scounters)
        {
            out.put_u64_ne(*v);
        }
        for v in s.pcounters.iter().flatten().flatten() {
            out.put_u64_ne(*v);
        }
        for v in s.bcounters.iter().flatten() {
            out.put_u64_ne(*v);
        }
        out.put_u64_ne(s.stateid);
        out.put_i64_ne(s.since);
        for v in [s.running, s.states, s.src_nodes, s.debug, s.hostid, s.reass] {
            out.put_u32_ne(v);
        }
        out.put_slice(&s.ifname);
        out.put_slice(&s.pf_chksum);
        out
    }

    /// 인터페이스 이름을 NUL 패딩된 버퍼로 만듭니다.
    pub(crate) fn ifname(name: &str) -> [u8; pfstat_pf_common::IFNAMSIZ] {
        let mut buf = [0u8; pfstat_pf_common::IFNAMSIZ];
        buf[..name.len()].copy_from_slice(name.as_bytes());
        buf
    }
}
