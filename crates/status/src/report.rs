//! 상태 리포트 — 열 정렬된 평문 텍스트 렌더링
//!
//! 출력은 스냅샷 상태와 현재 시각만의 순수 함수입니다. 섹션 순서:
//! 헤더, Hostid, Checksum, (인터페이스 통계), State Table, Source Tracking Table,
//! Counters, Limit Counters. 마지막 행 뒤에는 개행을 붙이지 않습니다.
//!
//! ```text
//! Status: Enabled for 0 days 01:00:00           Debug: urgent
//!
//! Hostid:   0x01020304
//! Checksum: 0xabab...
//!
//! State Table                          Total             Rate
//!   current entries                        5
//!   searches                               0            0.0/s
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::warn;

use crate::counters::{AddressFamily, CounterGroup, Direction, PacketAction};
use crate::snapshot::StatusSnapshot;

/// 헤더 상태 문구 폭 (왼쪽 정렬)
const HEADER_STATUS_WIDTH: usize = 44;
/// 헤더 디버그 문구 폭 (오른쪽 정렬)
const HEADER_DEBUG_WIDTH: usize = 15;
/// 카운터 행 라벨 폭
const LABEL_WIDTH: usize = 25;
/// 섹션 제목 폭 (라벨 폭 + 들여쓰기 2칸)
const TITLE_WIDTH: usize = LABEL_WIDTH + 2;
/// 카운터 값 폭
const TOTAL_WIDTH: usize = 14;
/// 비율 값 폭 (`/s` 제외)
const RATE_WIDTH: usize = 14;
/// 인터페이스 통계의 두 번째 값 열 폭
const SECOND_COLUMN_WIDTH: usize = 16;
/// 인터페이스 이름 폭
const IFNAME_WIDTH: usize = 16;
/// 인터페이스 통계 첫 번째 프로토콜 제목 폭
const FIRST_PROTO_TITLE_WIDTH: usize = 5;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// 마지막 활성화 이후 경과 시간
#[derive(Debug, Clone, Copy, PartialEq)]
struct Elapsed {
    secs: f64,
}

impl Elapsed {
    /// 현재 시각이 `since`보다 앞서면 0으로 고정합니다.
    fn between(since: i64, now: SystemTime) -> Self {
        let now_secs = match now.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs_f64(),
            Err(e) => -e.duration().as_secs_f64(),
        };
        #[allow(clippy::cast_precision_loss)]
        let secs = now_secs - since as f64;
        if secs < 0.0 {
            warn!(
                since,
                now = now_secs,
                "clock is behind filter enable time, clamping elapsed to zero"
            );
            return Self { secs: 0.0 };
        }
        Self { secs }
    }

    /// ` for <days> days <HH>:<MM>:<SS>`
    fn describe(self) -> String {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let total = self.secs as u64;
        let days = total / SECS_PER_DAY;
        let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
        let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
        let seconds = total % SECS_PER_MINUTE;
        format!(" for {days} days {hours:02}:{minutes:02}:{seconds:02}")
    }

    /// 초당 비율. 경과 시간이 0이면 0.0
    #[allow(clippy::cast_precision_loss)]
    fn rate(self, value: u64) -> f64 {
        if self.secs > 0.0 {
            value as f64 / self.secs
        } else {
            0.0
        }
    }
}

impl StatusSnapshot {
    /// 현재 시각 기준으로 리포트를 렌더링합니다.
    pub fn render(&self) -> String {
        self.render_at(SystemTime::now())
    }

    /// 주어진 시각 기준으로 리포트를 렌더링합니다.
    ///
    /// `since`가 없으면 경과 시간과 `/s` 비율 열을 모두 생략합니다.
    pub fn render_at(&self, now: SystemTime) -> String {
        let elapsed = self.since().map(|since| Elapsed::between(since, now));
        let mut out = String::new();

        self.push_header(&mut out, elapsed);
        if !self.interface_name().is_empty() {
            self.push_interface_stats(&mut out);
        }

        out.push_str(&format!(
            "{:<TITLE_WIDTH$} {:>TOTAL_WIDTH$} {:>SECOND_COLUMN_WIDTH$}",
            "State Table", "Total", "Rate"
        ));
        push_table(
            &mut out,
            self.state_count(),
            self.state_table_counters(),
            elapsed,
        );

        out.push_str("\nSource Tracking Table");
        push_table(
            &mut out,
            self.source_node_count(),
            self.source_tracking_counters(),
            elapsed,
        );

        out.push_str("\nCounters");
        push_counters(&mut out, self.operation_counters(), elapsed);

        out.push_str("\nLimit Counters");
        push_counters(&mut out, self.limit_counters(), elapsed);

        out
    }

    fn push_header(&self, out: &mut String, elapsed: Option<Elapsed>) {
        let mut status = String::from("Status: ");
        status.push_str(if self.is_running() {
            "Enabled"
        } else {
            "Disabled"
        });
        if let Some(elapsed) = elapsed {
            status.push_str(&elapsed.describe());
        }
        let debug = format!("Debug: {}", self.debug_level().label());

        out.push_str(&format!(
            "{status:<HEADER_STATUS_WIDTH$}{debug:>HEADER_DEBUG_WIDTH$}\n\n"
        ));
        out.push_str(&format!("Hostid:   0x{:08x}\n", self.host_id()));
        out.push_str(&format!("Checksum: {}\n\n", self.checksum_hex()));
    }

    fn push_interface_stats(&self, out: &mut String) {
        let traffic = self.traffic();

        out.push_str(&format!(
            "Interface Stats for {:<IFNAME_WIDTH$} {:>FIRST_PROTO_TITLE_WIDTH$} {:>SECOND_COLUMN_WIDTH$}\n",
            self.interface_name(),
            AddressFamily::Inet.label(),
            AddressFamily::Inet6.label(),
        ));

        for dir in Direction::ALL {
            let label = format!("Bytes {}", dir.label());
            push_pair(
                out,
                &label,
                traffic.bytes(dir, AddressFamily::Inet),
                traffic.bytes(dir, AddressFamily::Inet6),
            );
        }

        for dir in Direction::ALL {
            out.push_str(&format!("  Packets {}\n", dir.label()));
            for action in PacketAction::ALL {
                let label = format!("  {}", action.label());
                push_pair(
                    out,
                    &label,
                    traffic.packets(dir, action, AddressFamily::Inet),
                    traffic.packets(dir, action, AddressFamily::Inet6),
                );
            }
        }

        out.push('\n');
    }
}

fn push_pair(out: &mut String, label: &str, inet: u64, inet6: u64) {
    out.push_str(&format!(
        "  {label:<LABEL_WIDTH$} {inet:>TOTAL_WIDTH$} {inet6:>SECOND_COLUMN_WIDTH$}\n"
    ));
}

fn push_table(out: &mut String, current: u32, group: &CounterGroup, elapsed: Option<Elapsed>) {
    out.push_str(&format!(
        "\n  {:<LABEL_WIDTH$} {current:>TOTAL_WIDTH$}",
        "current entries"
    ));
    push_counters(out, group, elapsed);
}

fn push_counters(out: &mut String, group: &CounterGroup, elapsed: Option<Elapsed>) {
    for (label, value) in group.iter() {
        out.push_str(&format!("\n  {label:<LABEL_WIDTH$} {value:>TOTAL_WIDTH$} "));
        if let Some(elapsed) = elapsed {
            let rate = elapsed.rate(value);
            out.push_str(&format!("{rate:>RATE_WIDTH$.1}/s"));
        }
    }
}
