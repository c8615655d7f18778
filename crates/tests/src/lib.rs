//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置 -> 写入器 -> sink 的端到端流程
//! - 多调用方共享写入器
//! - 故障 sink 下的错误传播

#[cfg(test)]
mod contract_tests {
    use contracts::{ClosePolicy, SinkType, WriterConfig};

    #[test]
    fn test_contract_defaults() {
        let config = WriterConfig::new("defaults");
        assert_eq!(config.interval_ms, 16);
        assert_eq!(config.close_policy, ClosePolicy::Drain);
        assert_eq!(config.sink.sink_type, SinkType::Stdout);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::ClosePolicy;
    use slow_writer::{create_writer, MemorySink, SlowWriter, WriterError, WriterOptions};
    use tokio::time::{sleep, Instant};

    /// End-to-end test: TOML config -> ConfigLoader -> create_writer -> file
    #[tokio::test]
    async fn test_e2e_config_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("app.log");
        let content = format!(
            r#"
name = "app_log"
interval_ms = 10

[sink]
sink_type = "file"
[sink.params]
path = "{}"
"#,
            path.display().to_string().replace('\\', "/")
        );

        let config = ConfigLoader::load_from_str(&content, ConfigFormat::Toml).unwrap();
        let writer = create_writer(&config).await.unwrap();

        for i in 0..10 {
            writer
                .write(format!("event {i}\n").as_bytes())
                .await
                .unwrap();
        }
        let metrics = writer.metrics().clone();
        writer.close().await.unwrap();

        // Timer or close drains, depending on scheduling; either way nothing stays buffered.
        let snapshot = metrics.snapshot();
        assert!(snapshot.drain_count >= 1);
        assert_eq!(snapshot.buffered_bytes, 0);
        assert_eq!(snapshot.bytes_drained, snapshot.bytes_accepted);

        let written = std::fs::read_to_string(&path).unwrap();
        let expected: String = (0..10).map(|i| format!("event {i}\n")).collect();
        assert_eq!(written, expected);
    }

    /// Scenario: interval 16ms; "hello"@0, "world"@5, flush@6, "x"@20
    #[tokio::test(start_paused = true)]
    async fn test_e2e_flush_and_timer_timeline() {
        let sink = MemorySink::new("timeline");
        let writer = SlowWriter::spawn(sink.clone(), Duration::from_millis(16));
        let start = Instant::now();

        writer.write(b"hello").await.unwrap();
        sleep(Duration::from_millis(5)).await;
        writer.write(b"world").await.unwrap();
        sleep(Duration::from_millis(1)).await;
        writer.flush().await.unwrap();
        sleep(Duration::from_millis(14)).await;
        writer.write(b"x").await.unwrap();
        sleep(Duration::from_millis(40)).await;

        let drains = sink.drains();
        let observed: Vec<(&[u8], u128)> = drains
            .iter()
            .map(|d| (&d.bytes[..], (d.at - start).as_millis()))
            .collect();
        assert_eq!(observed.len(), 2, "drains: {observed:?}");
        assert_eq!(observed[0].0, b"helloworld");
        assert_eq!(observed[0].1, 6);
        assert_eq!(observed[1].0, b"x");
        assert!((36..38).contains(&observed[1].1), "x drained at {}", observed[1].1);

        writer.close().await.unwrap();
    }

    /// Many producers share one writer through cloned handles
    #[tokio::test]
    async fn test_e2e_shared_handles() {
        let sink = MemorySink::new("shared");
        let writer = SlowWriter::with_options(
            sink.clone(),
            WriterOptions::new(Duration::from_millis(2)).with_name("shared"),
        );

        let producers: Vec<_> = (0..8)
            .map(|_| {
                let handle = writer.handle();
                tokio::spawn(async move {
                    for _ in 0..50 {
                        handle.write(b"0123456789").await.unwrap();
                    }
                    handle.flush().await.unwrap();
                })
            })
            .collect();
        for producer in producers {
            producer.await.unwrap();
        }

        writer.close().await.unwrap();
        assert_eq!(sink.contents().len(), 8 * 50 * 10);
        // Coalescing means far fewer sink calls than writes.
        assert!(sink.call_count() < 8 * 50);
    }

    /// A failing sink does not stop the writer; close still reports it
    #[tokio::test(start_paused = true)]
    async fn test_e2e_error_surfaces_on_close() {
        let sink = MemorySink::new("flaky").fail_on_call(2);
        let writer = SlowWriter::with_options(
            sink.clone(),
            WriterOptions::new(Duration::from_millis(16)).with_close_policy(ClosePolicy::Discard),
        );

        for chunk in [b"a", b"b", b"c"] {
            let ack = writer.write(chunk).await.unwrap();
            assert_eq!(ack.accepted, 1);
            sleep(Duration::from_millis(20)).await;
        }

        assert_eq!(sink.call_count(), 3);
        assert_eq!(sink.contents(), b"ac");
        let ack = writer.write(b"d").await.unwrap();
        assert!(ack.last_error.is_some());

        match writer.close().await {
            Err(WriterError::Sink(err)) => assert_eq!(err.sink_name(), "flaky"),
            other => panic!("expected sink error, got {other:?}"),
        }
        assert_eq!(sink.call_count(), 3);
    }
}
