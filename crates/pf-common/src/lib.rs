//! pf_status 네이티브 레코드 레이아웃 공유 타입
//!
//! 이 크레이트는 `#![no_std]` 환경에서 사용 가능한 레이아웃 정의를 담습니다.
//! 패킷 필터 커널이 채워 주는 `pf_status` 구조체와 동일한 메모리 레이아웃
//! (`#[repr(C)]`)을 [`PfStatus`]로, 같은 레이아웃을 필드 목록 형태로
//! [`StatusLayout`]으로 표현합니다.
//!
//! 레이아웃은 버전이 붙은 계약입니다. 필드 순서나 폭이 바뀌면 새 버전을 추가해야
//! 하며 기존 버전을 수정해서는 안 됩니다.
//!
//! # 바이트 오더
//! 모든 정수 필드는 호스트(네이티브) 바이트 오더이며, `hostid`만 네트워크 바이트
//! 오더로 저장됩니다.

#![no_std]

// =============================================================================
// 배열 길이 상수
// =============================================================================

/// 연산 카운터(`counters`) 개수
pub const PFRES_MAX: usize = 15;
/// 한도 카운터(`lcounters`) 개수
pub const LCNT_MAX: usize = 7;
/// 상태 테이블 카운터(`fcounters`) 개수
pub const FCNT_MAX: usize = 3;
/// 소스 추적 테이블 카운터(`scounters`) 개수
pub const SCNT_MAX: usize = 3;
/// 인터페이스 이름 버퍼 길이
pub const IFNAMSIZ: usize = 16;
/// 룰셋 체크섬(MD5) 길이
pub const PF_MD5_DIGEST_LENGTH: usize = 16;

// =============================================================================
// 트래픽 카운터 인덱스
// =============================================================================

/// 주소 패밀리 인덱스: IPv4
pub const PF_AF_INET_IDX: usize = 0;
/// 주소 패밀리 인덱스: IPv6
pub const PF_AF_INET6_IDX: usize = 1;
/// 방향 인덱스: 수신
pub const PF_DIR_IN_IDX: usize = 0;
/// 방향 인덱스: 송신
pub const PF_DIR_OUT_IDX: usize = 1;
/// 액션 인덱스: 통과
pub const PF_PASS: usize = 0;
/// 액션 인덱스: 차단
pub const PF_DROP: usize = 1;

// =============================================================================
// 디버그 레벨
// =============================================================================

/// 디버그 출력 없음
pub const PF_DEBUG_NONE: u32 = 0;
/// 긴급 메시지만
pub const PF_DEBUG_URGENT: u32 = 1;
/// 기타 메시지 포함
pub const PF_DEBUG_MISC: u32 = 2;
/// 모든 메시지
pub const PF_DEBUG_NOISY: u32 = 3;

// =============================================================================
// 네이티브 구조체
// =============================================================================

/// 커널 `pf_status` 구조체 (레이아웃 v1)
///
/// # 메모리 레이아웃 (392 바이트, 8바이트 정렬)
/// ```text
/// offset  field       size
/// 0       counters    120   (u64 x 15)
/// 120     lcounters   56    (u64 x 7)
/// 176     fcounters   24    (u64 x 3)
/// 200     scounters   24    (u64 x 3)
/// 224     pcounters   64    (u64 [af][dir][action])
/// 288     bcounters   32    (u64 [af][dir])
/// 320     stateid     8
/// 328     since       8     (time_t)
/// 336     running     4
/// 340     states      4
/// 344     src_nodes   4
/// 348     debug       4
/// 352     hostid      4     (network byte order)
/// 356     reass       4
/// 360     ifname      16
/// 376     pf_chksum   16
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PfStatus {
    pub counters: [u64; PFRES_MAX],
    pub lcounters: [u64; LCNT_MAX],
    pub fcounters: [u64; FCNT_MAX],
    pub scounters: [u64; SCNT_MAX],
    /// `[af][dir][action]`
    pub pcounters: [[[u64; 2]; 2]; 2],
    /// `[af][dir]`
    pub bcounters: [[u64; 2]; 2],
    pub stateid: u64,
    /// 마지막으로 활성화된 시각 (epoch 초), 0이면 정보 없음
    pub since: i64,
    pub running: u32,
    pub states: u32,
    pub src_nodes: u32,
    pub debug: u32,
    /// 네트워크 바이트 오더
    pub hostid: u32,
    pub reass: u32,
    /// NUL 종료 문자열
    pub ifname: [u8; IFNAMSIZ],
    pub pf_chksum: [u8; PF_MD5_DIGEST_LENGTH],
}

impl PfStatus {
    /// 제로 초기화된 구조체를 생성합니다.
    pub const fn zeroed() -> Self {
        Self {
            counters: [0; PFRES_MAX],
            lcounters: [0; LCNT_MAX],
            fcounters: [0; FCNT_MAX],
            scounters: [0; SCNT_MAX],
            pcounters: [[[0; 2]; 2]; 2],
            bcounters: [[0; 2]; 2],
            stateid: 0,
            since: 0,
            running: 0,
            states: 0,
            src_nodes: 0,
            debug: 0,
            hostid: 0,
            reass: 0,
            ifname: [0; IFNAMSIZ],
            pf_chksum: [0; PF_MD5_DIGEST_LENGTH],
        }
    }

    /// 커널이 덤프하는 것과 같은 네이티브 바이트 표현을 반환합니다.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

// =============================================================================
// 필드 목록 레이아웃
// =============================================================================

/// 레이아웃을 구성하는 필드 수
pub const FIELD_COUNT: usize = 16;

/// 필드 하나의 이름, 오프셋, 크기 (바이트)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub size: usize,
}

/// 버전이 붙은 원시 레코드 레이아웃
///
/// 가변 길이인 것은 카운터 배열과 두 바이트 배열뿐이며, 나머지 필드의 폭과
/// 순서는 고정입니다. 필드 순서는 [`PfStatus`]와 같습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLayout {
    /// 레이아웃 이름 (설정 파일의 `status.layout`)
    pub name: &'static str,
    pub counters: usize,
    pub lcounters: usize,
    pub fcounters: usize,
    pub scounters: usize,
    pub ifname_len: usize,
    pub checksum_len: usize,
}

impl StatusLayout {
    /// [`PfStatus`]와 일치하는 레이아웃
    pub const V1: Self = Self {
        name: "v1",
        counters: PFRES_MAX,
        lcounters: LCNT_MAX,
        fcounters: FCNT_MAX,
        scounters: SCNT_MAX,
        ifname_len: IFNAMSIZ,
        checksum_len: PF_MD5_DIGEST_LENGTH,
    };

    /// 이름으로 조회 가능한 레이아웃 목록
    pub const KNOWN: &'static [Self] = &[Self::V1];

    /// 이름으로 레이아웃을 찾습니다.
    pub fn by_name(name: &str) -> Option<Self> {
        Self::KNOWN.iter().copied().find(|l| l.name == name)
    }

    /// 필드 목록을 레코드 내 순서대로 반환합니다.
    pub const fn fields(&self) -> [FieldSpec; FIELD_COUNT] {
        const U64: usize = 8;
        const U32: usize = 4;

        let counters = FieldSpec {
            name: "counters",
            offset: 0,
            size: self.counters * U64,
        };
        let lcounters = next(counters, "lcounters", self.lcounters * U64);
        let fcounters = next(lcounters, "fcounters", self.fcounters * U64);
        let scounters = next(fcounters, "scounters", self.scounters * U64);
        let pcounters = next(scounters, "pcounters", 8 * U64);
        let bcounters = next(pcounters, "bcounters", 4 * U64);
        let stateid = next(bcounters, "stateid", U64);
        let since = next(stateid, "since", U64);
        let running = next(since, "running", U32);
        let states = next(running, "states", U32);
        let src_nodes = next(states, "src_nodes", U32);
        let debug = next(src_nodes, "debug", U32);
        let hostid = next(debug, "hostid", U32);
        let reass = next(hostid, "reass", U32);
        let ifname = next(reass, "ifname", self.ifname_len);
        let pf_chksum = next(ifname, "pf_chksum", self.checksum_len);

        [
            counters, lcounters, fcounters, scounters, pcounters, bcounters, stateid, since,
            running, states, src_nodes, debug, hostid, reass, ifname, pf_chksum,
        ]
    }

    /// 이름으로 필드를 찾습니다.
    pub fn field(&self, name: &str) -> Option<FieldSpec> {
        self.fields().into_iter().find(|f| f.name == name)
    }

    /// 레코드 전체 길이 (8바이트 정렬 패딩 포함)
    pub const fn record_len(&self) -> usize {
        let fields = self.fields();
        let last = fields[FIELD_COUNT - 1];
        let end = last.offset + last.size;
        end.div_ceil(8) * 8
    }
}

const fn next(prev: FieldSpec, name: &'static str, size: usize) -> FieldSpec {
    FieldSpec {
        name,
        offset: prev.offset + prev.size,
        size,
    }
}
