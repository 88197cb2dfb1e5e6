//! 考试倒计时
//!
//! 截止时间 = 开始时间 + 考试时长。开始时间取考试数据加载成功的时刻，
//! 而不是发起请求的时刻。

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// 考试倒计时
///
/// 到点后回调只触发一次；会话结束（`stop` 或 drop）后不再触发。
#[derive(Debug)]
pub struct SessionClock {
    deadline: Instant,
    handle: Option<JoinHandle<()>>,
}

impl SessionClock {
    /// 计算截止时间
    pub fn deadline_for(start: Instant, duration_minutes: u32) -> Instant {
        start + Duration::from_secs(u64::from(duration_minutes) * 60)
    }

    /// 启动倒计时
    ///
    /// # 参数
    /// - `deadline`: 截止时间
    /// - `on_expire`: 到点时调用的回调
    pub fn start<F>(deadline: Instant, on_expire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            debug!("⏰ 考试时间到");
            on_expire();
        });

        Self {
            deadline,
            handle: Some(handle),
        }
    }

    /// 剩余时间，已过截止时间则为 0
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// 停止倒计时，之后回调不会再触发
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// 倒计时是否仍在运行
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.stop();
    }
}

/// 把剩余时间格式化为 `mm:ss`
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_deadline_is_anchored_to_start() {
        let start = Instant::now();
        assert_eq!(
            SessionClock::deadline_for(start, 2),
            start + Duration::from_secs(120)
        );
        assert_eq!(SessionClock::deadline_for(start, 0), start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_at_deadline() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let start = Instant::now();
        let clock = SessionClock::start(SessionClock::deadline_for(start, 1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(clock.remaining(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(clock.remaining(), Duration::ZERO);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_clock_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let mut clock = SessionClock::start(
            SessionClock::deadline_for(Instant::now(), 1),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );

        tokio::time::sleep(Duration::from_secs(10)).await;
        clock.stop();
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_fires_immediately() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let _clock = SessionClock::start(SessionClock::deadline_for(Instant::now(), 0), move || {
            let _ = tx.send(());
        });
        tokio_test::assert_ok!(rx.await);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(Duration::from_secs(0)), "00:00");
        assert_eq!(format_remaining(Duration::from_secs(125)), "02:05");
        assert_eq!(format_remaining(Duration::from_millis(59_900)), "00:59");
    }
}
