//! 时钟抽象
//!
//! 所有固定等待和轮询都经由 `Clock`，测试中用 `ManualClock` 推进虚拟时间。

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

/// 单调时钟
#[async_trait]
pub trait Clock: Send + Sync {
    /// 自时钟创建以来经过的时间
    fn now(&self) -> Duration;

    /// 等待指定时长
    async fn sleep(&self, duration: Duration);
}

/// 基于 tokio 定时器的真实时钟
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// 手动时钟：`sleep` 立即返回并把虚拟时间向前推进
#[derive(Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += duration;
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
