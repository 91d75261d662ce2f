//! 防抖的性质测试
//!
//! 1. 间隔都短于 delay 的一串调度只执行一次，执行的是最后一次调度的动作
//! 2. 到期前取消，动作永远不会执行

use lib::debounce::Debouncer;
use proptest::prelude::*;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio::time::{advance, timeout};

const DELAY_MS: u64 = 300;

fn paused_runtime() -> Runtime {
    Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

fn gaps_strategy() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..DELAY_MS, 1..40)
}

proptest! {
    #[test]
    fn burst_runs_last_action_once(gaps in gaps_strategy()) {
        let rt = paused_runtime();

        let (first, second) = rt.block_on(async {
            let mut debouncer = Debouncer::new(Duration::from_millis(DELAY_MS));

            for (i, gap) in gaps.iter().enumerate() {
                debouncer.schedule(move || i);
                advance(Duration::from_millis(*gap)).await;
            }

            let first = timeout(Duration::from_secs(60), debouncer.fire::<usize>()).await.ok();
            let second = timeout(Duration::from_secs(60), debouncer.fire::<usize>()).await.ok();
            (first, second)
        });

        prop_assert_eq!(first, Some(gaps.len() - 1));
        prop_assert_eq!(second, None);
    }

    #[test]
    fn cancel_before_expiry_never_runs(gaps in gaps_strategy()) {
        let rt = paused_runtime();

        let (cancelled, fired) = rt.block_on(async {
            let mut debouncer = Debouncer::new(Duration::from_millis(DELAY_MS));

            for (i, gap) in gaps.iter().enumerate() {
                debouncer.schedule(move || i);
                advance(Duration::from_millis(*gap)).await;
            }

            // 最后一次调度之后还不到 delay
            let cancelled = debouncer.cancel();
            let fired = timeout(Duration::from_secs(60), debouncer.fire::<usize>()).await.ok();
            (cancelled, fired)
        });

        prop_assert!(cancelled);
        prop_assert_eq!(fired, None);
    }
}
