//! SlowWriter 指标收集模块
//!
//! 每个写入器以 `writer` 标签区分；刷新操作额外带 `trigger` 标签。

use contracts::DrainTrigger;
use metrics::{counter, gauge, histogram};

/// 记录一次被接受的写入
pub fn record_write(writer: &str, bytes: usize) {
    counter!("slow_writer_writes_total", "writer" => writer.to_string()).increment(1);
    counter!("slow_writer_bytes_accepted_total", "writer" => writer.to_string())
        .increment(bytes as u64);
}

/// 记录显式 flush 请求 (包括空闲时的空操作)
pub fn record_flush_request(writer: &str) {
    counter!("slow_writer_flush_requests_total", "writer" => writer.to_string()).increment(1);
}

/// 记录当前缓冲区字节数
pub fn record_buffered_bytes(writer: &str, bytes: usize) {
    gauge!("slow_writer_buffered_bytes", "writer" => writer.to_string()).set(bytes as f64);
}

/// 记录一次刷新
///
/// `window_ms` 为从缓冲区变为非空到本次刷新之间的时长。
pub fn record_drain(
    writer: &str,
    trigger: DrainTrigger,
    bytes: usize,
    window_ms: f64,
    success: bool,
) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "slow_writer_drains_total",
        "writer" => writer.to_string(),
        "trigger" => trigger.as_str(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "slow_writer_drain_bytes",
        "writer" => writer.to_string(),
        "trigger" => trigger.as_str()
    )
    .record(bytes as f64);

    histogram!("slow_writer_window_ms", "writer" => writer.to_string()).record(window_ms);
}

/// 记录关闭时丢弃的字节
pub fn record_discarded(writer: &str, bytes: usize) {
    counter!("slow_writer_bytes_discarded_total", "writer" => writer.to_string())
        .increment(bytes as u64);
}
