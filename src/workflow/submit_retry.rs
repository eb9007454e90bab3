//! 提交重试状态机 - 流程层
//!
//! 每次尝试：点击提交 → 固定等待 → 在检测窗口内查找服务器错误提示。
//! 没有错误提示即成功；最后一次尝试仍有错误提示则整个运行中止。

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::{Config, Timings};
use crate::error::{AppError, Result};
use crate::infrastructure::{wait_for_visible, Clock, Session, WebPage};
use crate::workflow::order_ctx::OrderCtx;

/// 提交状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    /// 正在进行第 `attempt` 次尝试（从1开始）
    Attempting { attempt: usize },
    Succeeded { attempts: usize },
    Failed { attempts: usize },
}

impl SubmitState {
    /// 根据本次尝试是否出现错误提示计算下一状态
    pub fn next(self, error_seen: bool, max_attempts: usize) -> SubmitState {
        match self {
            SubmitState::Attempting { attempt } if !error_seen => {
                SubmitState::Succeeded { attempts: attempt }
            }
            SubmitState::Attempting { attempt } if attempt >= max_attempts => {
                SubmitState::Failed { attempts: attempt }
            }
            SubmitState::Attempting { attempt } => SubmitState::Attempting {
                attempt: attempt + 1,
            },
            terminal => terminal,
        }
    }
}

/// 重试参数
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub settle_delay: Duration,
    pub error_timeout: Duration,
    pub poll_interval: Duration,
}

impl From<&Timings> for RetryPolicy {
    fn from(timings: &Timings) -> Self {
        Self {
            max_attempts: timings.max_retries,
            settle_delay: timings.settle_delay(),
            error_timeout: timings.error_timeout(),
            poll_interval: timings.poll_interval(),
        }
    }
}

/// 带重试的订单提交
pub struct SubmitRetry {
    page: Arc<dyn WebPage>,
    clock: Arc<dyn Clock>,
    order_button: String,
    error_alert: String,
    policy: RetryPolicy,
}

impl SubmitRetry {
    pub fn new(session: &Session, config: &Config) -> Self {
        Self {
            page: session.page.clone(),
            clock: session.clock.clone(),
            order_button: config.selectors.order.clone(),
            error_alert: config.selectors.error_alert.clone(),
            policy: RetryPolicy::from(&config.timings),
        }
    }

    /// 提交订单
    ///
    /// # 返回
    /// 成功时返回实际尝试次数；重试耗尽返回 `AppError::RetryExhausted`
    pub async fn submit(&self, ctx: &OrderCtx) -> Result<usize> {
        let max = self.policy.max_attempts;
        let mut state = SubmitState::Attempting { attempt: 1 };

        loop {
            match state {
                SubmitState::Attempting { attempt } => {
                    self.page.click(&self.order_button).await?;
                    self.clock.sleep(self.policy.settle_delay).await;

                    let error_seen = wait_for_visible(
                        self.page.as_ref(),
                        self.clock.as_ref(),
                        &self.error_alert,
                        self.policy.error_timeout,
                        self.policy.poll_interval,
                    )
                    .await
                    .is_visible();

                    if error_seen && attempt < max {
                        warn!("{} ⚠️ 服务器错误，重试中... ({}/{})", ctx, attempt, max);
                    }
                    state = state.next(error_seen, max);
                }
                SubmitState::Succeeded { attempts } => {
                    if attempts > 1 {
                        info!("{} ✓ 第 {} 次尝试提交成功", ctx, attempts);
                    } else {
                        info!("{} ✓ 订单提交成功", ctx);
                    }
                    return Ok(attempts);
                }
                SubmitState::Failed { attempts } => {
                    error!("{} ❌ 已尝试 {} 次，订单提交失败", ctx, attempts);
                    return Err(AppError::RetryExhausted {
                        order_number: ctx.order_number.clone(),
                        attempts,
                    });
                }
            }
        }
    }
}
