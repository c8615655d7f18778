//! # SlowWriter
//!
//! 限速缓冲写入模块。
//!
//! 负责：
//! - 累积调用方写入的字节
//! - 每个间隔最多向下游 sink 刷新一次 (合并小写入)
//! - 支持显式 flush，以及关闭时的最后一次刷新
//!
//! 所有可变状态 (缓冲区、定时器) 只由每个写入器独占的调度任务持有，
//! 调用方通过会合式通道与之交互，无需加锁。

pub mod error;
pub mod factory;
pub mod metrics;
mod scheduler;
pub mod sinks;
pub mod writer;

pub use contracts::{ByteSink, ClosePolicy, DrainTrigger, SinkError, WriterConfig};
pub use error::WriterError;
pub use factory::{create_sink, create_writer, ConfiguredSink};
pub use metrics::{MetricsSnapshot, WriterMetrics};
pub use sinks::{Drain, IoSink, LogSink, MemorySink};
pub use writer::{SlowWriter, WriteAck, WriterHandle, WriterOptions};
