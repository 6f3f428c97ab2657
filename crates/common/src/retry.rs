//! 连接重试
//!
//! 启动阶段建立连接池时使用的指数退避重试

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// 重试策略
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// 最大尝试次数（包含第一次）
    pub max_attempts: u32,
    /// 初始延迟
    pub initial_delay: Duration,
    /// 最大延迟
    pub max_delay: Duration,
    /// 退避乘数
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_multiplier() -> f64 {
    2.0
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay,
            multiplier: 2.0,
        }
    }

    /// 第 n 次失败后的等待时间（n 从 0 开始）
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms =
            self.initial_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        let capped = (delay_ms as u64).min(self.max_delay.as_millis() as u64);
        Duration::from_millis(capped)
    }

    /// 执行操作，只在 `is_transient` 判定为临时错误时重试
    pub async fn run<F, Fut, T, E, P>(
        &self,
        operation_name: &str,
        mut operation: F,
        is_transient: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        info!(
                            operation = operation_name,
                            attempt = attempt + 1,
                            "Operation succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(e) if attempt + 1 < max_attempts && is_transient(&e) => {
                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        max_attempts,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Operation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        error = %e,
                        "Operation failed, giving up"
                    );
                    return Err(e);
                }
            }
        }
    }
}

/// 连接阶段可重试的错误特征
const TRANSIENT_PATTERNS: &[&str] = &[
    "connection refused",
    "connection reset",
    "timed out",
    "timeout",
    "too many connections",
    "the database system is starting up",
    "could not connect",
    "no route to host",
    "broken pipe",
    "pool timed out",
];

/// 判断错误信息是否属于临时性连接错误
pub fn is_transient_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_PATTERNS.iter().any(|p| lower.contains(p))
}
