//! 통합 테스트 -- 네이티브 구조체 바이트에서 리포트까지
//!
//! 커널이 채워 주는 것과 같은 `#[repr(C)]` 메모리 이미지를 그대로 디코딩해
//! 레이아웃 정의와 네이티브 구조체가 일치하는지 검증합니다.

use std::time::{Duration, UNIX_EPOCH};

use pfstat_core::error::{DecodeError, PfstatError};
use pfstat_pf_common::{PfStatus, StatusLayout};
use pfstat_status::{
    AddressFamily, DebugLevel, Direction, PacketAction, RawStatusRecord, StatusError,
    StatusSnapshot,
};

const NOW: u64 = 1_700_003_600;

fn sample_status() -> PfStatus {
    let mut s = PfStatus::zeroed();
    s.running = 1;
    s.since = (NOW - 3600) as i64;
    s.states = 5;
    s.src_nodes = 2;
    s.debug = 1;
    s.hostid = 0x0102_0304u32.to_be();
    s.stateid = 42;
    s.ifname[..3].copy_from_slice(b"em0");
    s.pf_chksum = [0xab; 16];
    s.counters[0] = 100;
    s.lcounters[6] = 7;
    s.fcounters = [10, 20, 30];
    s.scounters = [1, 2, 3];
    s.pcounters[1][1][1] = 99;
    s.bcounters[0][1] = 4096;
    s
}

#[test]
fn native_memory_image_decodes() {
    let bytes = sample_status().as_bytes().to_vec();
    assert_eq!(bytes.len(), StatusLayout::V1.record_len());

    let snapshot = StatusSnapshot::decode(&bytes, &StatusLayout::V1).expect("valid record");
    assert!(snapshot.is_running());
    assert_eq!(snapshot.since(), Some((NOW - 3600) as i64));
    assert_eq!(snapshot.state_count(), 5);
    assert_eq!(snapshot.source_node_count(), 2);
    assert_eq!(snapshot.debug_level(), DebugLevel::Urgent);
    assert_eq!(snapshot.host_id(), 0x0102_0304);
    assert_eq!(snapshot.state_id(), 42);
    assert_eq!(snapshot.interface_name(), "em0");
    assert_eq!(snapshot.checksum_hex(), format!("0x{}", "ab".repeat(16)));
    assert_eq!(snapshot.operation_counters().get("match"), Some(100));
    assert_eq!(
        snapshot.limit_counters().get("overload flush states"),
        Some(7)
    );
    assert_eq!(snapshot.state_table_counters().get("removals"), Some(30));
    assert_eq!(snapshot.source_tracking_counters().get("inserts"), Some(2));
    assert_eq!(
        snapshot
            .traffic()
            .packets(Direction::Out, PacketAction::Blocked, AddressFamily::Inet6),
        99
    );
    assert_eq!(
        snapshot.traffic().bytes(Direction::Out, AddressFamily::Inet),
        4096
    );
}

#[test]
fn full_report_from_native_image() {
    let bytes = sample_status().as_bytes().to_vec();
    let snapshot = StatusSnapshot::decode(&bytes, &StatusLayout::V1).unwrap();
    let report = snapshot.render_at(UNIX_EPOCH + Duration::from_secs(NOW));

    assert!(report.starts_with("Status: Enabled for 0 days 01:00:00"));
    assert!(report.contains("Debug: urgent"));
    assert!(report.contains("Hostid:   0x01020304\n"));
    assert!(report.contains("Interface Stats for em0"));
    assert!(report.contains(&format!(
        "\n  {:<25} {:>14} {:>14}/s",
        "match", 100, "0.0"
    )));
    assert!(!report.ends_with('\n'));
}

#[test]
fn short_counter_array_is_malformed() {
    let mut raw = RawStatusRecord::from(&sample_status());
    raw.counters.truncate(10);

    let err = StatusSnapshot::from_raw(&raw).unwrap_err();
    assert!(matches!(
        err,
        StatusError::MalformedRecord {
            field: "counters",
            ..
        }
    ));

    // 상위 에러로 변환
    let top: PfstatError = err.into();
    assert!(matches!(
        top,
        PfstatError::Decode(DecodeError::MalformedRecord { ref field, .. }) if field == "counters"
    ));
}

#[test]
fn truncated_buffer_is_malformed() {
    let bytes = sample_status().as_bytes().to_vec();
    let err = StatusSnapshot::decode(&bytes[..100], &StatusLayout::V1).unwrap_err();
    assert!(matches!(
        err,
        StatusError::MalformedRecord {
            field: "record",
            ..
        }
    ));
}

#[test]
fn absent_since_hides_rates() {
    let mut status = sample_status();
    status.since = 0;
    let bytes = status.as_bytes().to_vec();
    let report = StatusSnapshot::decode(&bytes, &StatusLayout::V1)
        .unwrap()
        .render_at(UNIX_EPOCH + Duration::from_secs(NOW));

    assert!(!report.contains("/s"));
    assert!(report.starts_with("Status: Enabled "));
    assert!(!report.starts_with("Status: Enabled for"));
}

#[test]
fn empty_interface_name_omits_interface_section() {
    let mut status = sample_status();
    status.ifname = [0; 16];
    let bytes = status.as_bytes().to_vec();
    let report = StatusSnapshot::decode(&bytes, &StatusLayout::V1)
        .unwrap()
        .render_at(UNIX_EPOCH + Duration::from_secs(NOW));

    assert!(!report.contains("Interface Stats"));
    assert!(report.contains("State Table"));
    assert!(report.contains("\nLimit Counters"));
}

#[test]
fn delta_between_two_images() {
    let earlier_status = sample_status();
    let mut later_status = sample_status();
    later_status.counters[0] = 160;
    later_status.bcounters[0][1] = 8192;

    let earlier = StatusSnapshot::decode(earlier_status.as_bytes(), &StatusLayout::V1).unwrap();
    let later = StatusSnapshot::decode(later_status.as_bytes(), &StatusLayout::V1).unwrap();

    let delta = later.delta_since(&earlier).expect("same enable period");
    assert_eq!(delta.operation_counters.get("match"), Some(60));
    assert_eq!(delta.traffic.bytes(Direction::Out, AddressFamily::Inet), 4096);

    later_status.since += 10;
    let reenabled = StatusSnapshot::decode(later_status.as_bytes(), &StatusLayout::V1).unwrap();
    assert!(reenabled.delta_since(&earlier).is_none());
}

#[test]
fn snapshot_serializes_to_json() {
    let snapshot =
        StatusSnapshot::decode(sample_status().as_bytes(), &StatusLayout::V1).unwrap();
    let value = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(value["interface_name"], "em0");
    assert_eq!(value["host_id"], 0x0102_0304);
    assert_eq!(value["debug_level"], "urgent");
    assert_eq!(value["operation_counters"]["match"], 100);
}
