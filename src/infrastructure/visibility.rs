//! 有界轮询的可见性检测
//!
//! "元素没有出现"是正常结果，用 `Visibility::Absent` 表达，不作为错误返回。

use std::time::Duration;

use tracing::debug;

use crate::infrastructure::{Clock, WebPage};

/// 可见性检测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Absent,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// 在 `timeout` 内轮询元素是否可见
///
/// 立即探测一次，之后每隔 `interval` 探测一次，直到可见或超时。
/// 探测本身出错时视为"尚不可见"继续轮询。
pub async fn wait_for_visible(
    page: &dyn WebPage,
    clock: &dyn Clock,
    selector: &str,
    timeout: Duration,
    interval: Duration,
) -> Visibility {
    let deadline = clock.now() + timeout;

    loop {
        match page.is_visible(selector).await {
            Ok(true) => return Visibility::Visible,
            Ok(false) => {}
            Err(e) => debug!("可见性探测失败 {}: {}", selector, e),
        }

        let now = clock.now();
        if now >= deadline {
            return Visibility::Absent;
        }
        clock.sleep(interval.min(deadline - now)).await;
    }
}
