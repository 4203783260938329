//! Engine Gate - 引擎互斥门
//!
//! 进程内唯一的可变锁：任意时刻最多一个合成调用在引擎内。
//! tokio Mutex 按 FIFO 唤醒等待者，排队请求不会丢失。
//! 引擎调用在独立任务中执行并持有 owned guard，调用方被取消时门不会提前释放。

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Error)]
pub enum GateError {
    #[error("timed out after {waited_ms} ms waiting for the engine")]
    Timeout { waited_ms: u64 },

    #[error("engine task aborted: {0}")]
    Aborted(String),
}

/// 等待计数，Drop 时递减（包括等待中被取消）
struct WaitTicket(Arc<AtomicUsize>);

impl WaitTicket {
    fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for WaitTicket {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 持有期间独占引擎
pub struct EnginePermit {
    _guard: OwnedMutexGuard<()>,
    busy: Arc<AtomicBool>,
}

impl Drop for EnginePermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// 引擎互斥门
#[derive(Clone)]
pub struct EngineGate {
    lock: Arc<Mutex<()>>,
    waiting: Arc<AtomicUsize>,
    busy: Arc<AtomicBool>,
    queue_timeout: Option<Duration>,
}

impl EngineGate {
    /// queue_timeout 为 None 时无限等待
    pub fn new(queue_timeout: Option<Duration>) -> Self {
        Self {
            lock: Arc::new(Mutex::new(())),
            waiting: Arc::new(AtomicUsize::new(0)),
            busy: Arc::new(AtomicBool::new(false)),
            queue_timeout,
        }
    }

    /// 获取引擎独占许可
    pub async fn acquire(&self) -> Result<EnginePermit, GateError> {
        let _ticket = WaitTicket::new(self.waiting.clone());
        let started = Instant::now();

        let guard = match self.queue_timeout {
            Some(limit) => tokio::time::timeout(limit, self.lock.clone().lock_owned())
                .await
                .map_err(|_| GateError::Timeout {
                    waited_ms: started.elapsed().as_millis() as u64,
                })?,
            None => self.lock.clone().lock_owned().await,
        };

        self.busy.store(true, Ordering::SeqCst);
        tracing::debug!(
            waited_ms = started.elapsed().as_millis() as u64,
            "Engine gate acquired"
        );

        Ok(EnginePermit {
            _guard: guard,
            busy: self.busy.clone(),
        })
    }

    /// 在独占许可下运行 future
    ///
    /// future 在单独的任务中运行并持有许可，直到它完成或 panic 才释放
    pub async fn run<F, T>(&self, job: F) -> Result<T, GateError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = self.acquire().await?;
        let handle = tokio::spawn(async move {
            let _permit = permit;
            job.await
        });
        handle
            .await
            .map_err(|e| GateError::Aborted(e.to_string()))
    }

    /// 排队数（含正在执行的一个）
    pub fn queue_depth(&self) -> usize {
        let waiting = self.waiting.load(Ordering::SeqCst);
        let running = usize::from(self.is_busy());
        // 持有许可者已离开等待计数
        waiting + running
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

impl Default for EngineGate {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[tokio::test]
    async fn test_runs_never_overlap() {
        let gate = EngineGate::new(None);
        let intervals: Arc<StdMutex<Vec<(Instant, Instant)>>> = Arc::new(StdMutex::new(Vec::new()));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let gate = gate.clone();
            let intervals = intervals.clone();
            handles.push(tokio::spawn(async move {
                gate.run(async move {
                    let start = Instant::now();
                    tokio::time::sleep(Duration::from_millis(15)).await;
                    intervals.lock().unwrap().push((start, Instant::now()));
                })
                .await
                .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut intervals = intervals.lock().unwrap().clone();
        assert_eq!(intervals.len(), 6);
        intervals.sort_by_key(|(start, _)| *start);
        for pair in intervals.windows(2) {
            assert!(pair[0].1 <= pair[1].0, "engine intervals overlap");
        }
    }

    #[tokio::test]
    async fn test_timeout_does_not_wedge_gate() {
        let gate = EngineGate::new(Some(Duration::from_millis(20)));
        let holder = gate.acquire().await.unwrap();

        let err = gate.acquire().await.err().unwrap();
        assert!(matches!(err, GateError::Timeout { .. }));
        assert_eq!(gate.queue_depth(), 1);

        drop(holder);
        assert!(!gate.is_busy());
        assert!(gate.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_panicking_job_releases_gate() {
        let gate = EngineGate::new(None);
        let result: Result<(), GateError> = gate.run(async { panic!("engine exploded") }).await;
        assert!(matches!(result, Err(GateError::Aborted(_))));

        assert_eq!(gate.run(async { 7 }).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_cancelled_caller_keeps_gate_until_job_finishes() {
        let gate = EngineGate::new(None);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let runner = {
            let gate = gate.clone();
            tokio::spawn(async move {
                gate.run(async move {
                    let _ = rx.await;
                })
                .await
            })
        };
        // 等待任务进入引擎
        while !gate.is_busy() {
            tokio::task::yield_now().await;
        }
        runner.abort();
        let _ = runner.await;

        assert!(gate.is_busy(), "gate released while job still running");
        tx.send(()).unwrap();

        let permit = tokio::time::timeout(Duration::from_secs(1), gate.acquire())
            .await
            .expect("gate never released")
            .unwrap();
        drop(permit);
    }
}
