// Copyright (c) 2022 Huawei Technologies Co.,Ltd. All rights reserved.
//
// sysMaster is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan
// PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//         http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY
// KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO
// NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

//! Cancellable grace interval between two signals.
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct State {
    cancelled: Mutex<bool>,
    cond: Condvar,
}

/// Blocks for a fixed interval unless cancelled from another thread.
#[derive(Debug, Clone, Default)]
pub struct GraceTimer {
    state: Arc<State>,
}

/// Handle cancelling the pending or next wait of a [`GraceTimer`].
#[derive(Debug, Clone)]
pub struct GraceCanceller {
    state: Arc<State>,
}

impl GraceCanceller {
    /// wake the waiter up
    pub fn cancel(&self) {
        let mut cancelled = self
            .state
            .cancelled
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *cancelled = true;
        self.state.cond.notify_all();
    }
}

impl GraceTimer {
    /// New timer.
    pub fn new() -> Self {
        GraceTimer::default()
    }

    /// Handle cancelling this timer.
    pub fn canceller(&self) -> GraceCanceller {
        GraceCanceller {
            state: self.state.clone(),
        }
    }

    /// Block for `interval`. Returns false when the wait was cancelled; the
    /// cancellation is consumed.
    pub fn wait(&self, interval: Duration) -> bool {
        let deadline = Instant::now() + interval;
        let mut cancelled = self
            .state
            .cancelled
            .lock()
            .unwrap_or_else(|e| e.into_inner());

        loop {
            if *cancelled {
                *cancelled = false;
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            cancelled = match self.state.cond.wait_timeout(cancelled, deadline - now) {
                Ok((guard, _)) => guard,
                Err(e) => e.into_inner().0,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_wait_elapses() {
        let timer = GraceTimer::new();
        let start = Instant::now();
        assert!(timer.wait(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(timer.wait(Duration::ZERO));
    }

    #[test]
    fn test_cancel() {
        let timer = GraceTimer::new();
        let canceller = timer.canceller();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            canceller.cancel();
        });
        let start = Instant::now();
        assert!(!timer.wait(Duration::from_secs(30)));
        assert!(start.elapsed() < Duration::from_secs(30));
        handle.join().unwrap();

        // consumed
        assert!(timer.wait(Duration::from_millis(1)));
    }
}
