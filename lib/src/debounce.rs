//! 防抖
//!
//! [`Debouncer`] 把一连串 `schedule` 合并成一次执行：最后一次调度之后静默
//! `delay`，才运行最后提交的动作。计时基于 `tokio::time`，由持有者所在的
//! 任务驱动，动作在调用 [`Debouncer::fire`] 的任务上运行。

use std::future;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

struct Pending<F> {
    deadline: Instant,
    action: F,
}

pub struct Debouncer<F> {
    delay: Duration,
    pending: Option<Pending<F>>,
}

impl<F> Default for Debouncer<F> {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl<F> Debouncer<F> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// 是否有尚未执行的动作
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// 丢弃之前未执行的动作，重新计时
    pub fn schedule(&mut self, action: F) {
        self.pending = Some(Pending {
            deadline: Instant::now() + self.delay,
            action,
        });
    }

    /// 取消未执行的动作，返回是否真的取消了一个
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// 等到静默期结束，执行动作并返回其结果
    ///
    /// 没有待执行动作时永远挂起，便于放进 `tokio::select!`。在到期前丢弃
    /// 这个 future 不会消耗动作。
    pub async fn fire<T>(&mut self) -> T
    where
        F: FnOnce() -> T,
    {
        let Some(deadline) = self.pending.as_ref().map(|p| p.deadline) else {
            return future::pending().await;
        };

        sleep_until(deadline).await;

        match self.pending.take() {
            Some(pending) => (pending.action)(),
            None => future::pending().await,
        }
    }
}
