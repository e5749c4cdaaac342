//! Optional JSONL command log
//!
//! Records are handed to a background task over an unbounded channel so the session
//! task never waits on file I/O. Write failures end the logger silently.

use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

/// One line of the command log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub command: &'static str,
    pub ok: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub game_over: bool,
}

/// Handle to the background log writer
#[derive(Debug, Clone)]
pub struct EventLog {
    tx: mpsc::UnboundedSender<LogRecord>,
}

impl EventLog {
    /// Spawn a writer appending to `path`
    ///
    /// Must be called from inside a tokio runtime.
    pub fn spawn(path: String) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<LogRecord>();

        tokio::spawn(async move {
            let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("[Runtime] Cannot open log {}: {}", path, e);
                    return;
                }
            };

            let mut buf: Vec<u8> = Vec::with_capacity(256);
            while let Some(rec) = rx.recv().await {
                buf.clear();
                if serde_json::to_writer(&mut buf, &rec).is_err() {
                    continue;
                }
                buf.push(b'\n');
                if file.write_all(&buf).await.is_err() {
                    break;
                }
            }

            let _ = file.flush().await;
        });

        Self { tx }
    }

    pub fn record(&self, rec: LogRecord) {
        let _ = self.tx.send(rec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_record_serializes_flat() {
        let rec = LogRecord {
            command: "hard_drop",
            ok: true,
            score: 36,
            level: 1,
            lines: 0,
            game_over: false,
        };
        let line = serde_json::to_string(&rec).unwrap();
        assert_eq!(
            line,
            r#"{"command":"hard_drop","ok":true,"score":36,"level":1,"lines":0,"game_over":false}"#
        );
    }

    #[tokio::test]
    async fn log_appends_jsonl_lines() {
        let path = std::env::temp_dir().join(format!("blockfall-log-{}.jsonl", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let log = EventLog::spawn(path.to_string_lossy().into_owned());
        for ok in [true, false] {
            log.record(LogRecord {
                command: "rotate_cw",
                ok,
                score: 0,
                level: 1,
                lines: 0,
                game_over: false,
            });
        }
        drop(log);

        let mut contents = String::new();
        for _ in 0..100 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            contents = std::fs::read_to_string(&path).unwrap_or_default();
            if contents.lines().count() == 2 {
                break;
            }
        }
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""ok":true"#));
        assert!(lines[1].contains(r#""ok":false"#));
    }
}
