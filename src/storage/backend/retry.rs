//! 数据库操作重试
//!
//! 失败按"语句是否可能已生效"分为三类。读取和幂等更新在连接中断后可以重放；
//! 条件写入（`ON CONFLICT DO NOTHING`、配额自增、删除）只在语句确定未执行时重放，
//! 否则第二次执行会把自己刚写入的行当成冲突，或者重复扣减配额。

use std::future::Future;
use std::ops::Deref;
use std::time::Duration;

use sea_orm::DbErr;
use sea_orm::error::RuntimeErr;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

/// 调用方声明的重放语义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    /// 重复执行结果相同（查询、覆盖式更新）
    Idempotent,
    /// 结果依赖执行前状态，只有确定未执行时才能重放
    Conditional,
}

/// 一次失败对重放的意义
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// 语句没有生效：拿不到连接、锁冲突导致回滚
    NotApplied,
    /// 连接在请求发出后断开，语句可能已经提交
    Ambiguous,
    /// 重放无意义的错误（约束冲突、SQL 错误等）
    Permanent,
}

impl Failure {
    pub fn classify(err: &DbErr) -> Self {
        match err {
            DbErr::ConnectionAcquire(_) => Failure::NotApplied,
            DbErr::Conn(_) => Failure::Ambiguous,
            DbErr::Exec(runtime) | DbErr::Query(runtime) if rolled_back(runtime) => {
                Failure::NotApplied
            }
            _ => Failure::Permanent,
        }
    }

    pub fn allows(self, replay: Replay) -> bool {
        match self {
            Failure::NotApplied => true,
            Failure::Ambiguous => replay == Replay::Idempotent,
            Failure::Permanent => false,
        }
    }
}

// 死锁、锁等待超时、序列化失败、SQLite BUSY/LOCKED：数据库已回滚该语句
const ROLLBACK_CODES: &[&str] = &["1213", "1205", "40001", "40P01", "5", "6", "517", "262"];

fn rolled_back(err: &RuntimeErr) -> bool {
    let message = match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            if let Some(code) = sqlx_err.deref().as_database_error().and_then(|e| e.code()) {
                return ROLLBACK_CODES.contains(&code.as_ref());
            }
            sqlx_err.to_string()
        }
        RuntimeErr::Internal(msg) => msg.clone(),
        #[allow(unreachable_patterns)]
        _ => return false,
    };

    let message = message.to_lowercase();
    ["deadlock", "lock wait timeout", "database is locked", "serialization failure"]
        .iter()
        .any(|needle| message.contains(needle))
}

#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl RetryConfig {
    /// 第 `attempt` 次重试前的等待时间，指数增长，封顶后再加 0-25% 抖动
    fn delay_before(&self, attempt: u32) -> Duration {
        let doubled = self
            .base_delay_ms
            .saturating_mul(1u64 << attempt.saturating_sub(1).min(32));
        let capped = doubled.min(self.max_delay_ms);
        let jitter = rand::random_range(0..=capped / 4);
        Duration::from_millis(capped.saturating_add(jitter))
    }
}

/// 执行 `operation`，按 `replay` 允许的失败类别重试
pub async fn with_retry<T, F, Fut>(
    label: &str,
    config: RetryConfig,
    replay: Replay,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        let err = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("{} succeeded after {} retries", label, attempt);
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        let failure = Failure::classify(&err);
        if !failure.allows(replay) || attempt >= config.max_retries {
            if failure == Failure::Ambiguous && replay == Replay::Conditional {
                warn!("{} lost its connection mid-statement, not replaying: {}", label, err);
            }
            return Err(err);
        }

        attempt += 1;
        let delay = config.delay_before(attempt);
        warn!(
            "{} failed ({:?}, attempt {}/{}): {}; retrying in {:?}",
            label,
            failure,
            attempt,
            config.max_retries + 1,
            err,
            delay
        );
        sleep(delay).await;
    }
}
