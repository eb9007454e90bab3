//! 页面导航服务 - 业务能力层
//!
//! 只负责"打开页面"和"关掉弹窗"两个能力

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::{wait_for_visible, Clock, Session, Visibility, WebPage};

/// 弹窗检测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalOutcome {
    /// 弹窗出现并已点击确认
    Dismissed,
    /// 超时内未出现弹窗，或确认按钮点击失败
    NotPresent,
}

/// 页面导航服务
pub struct Navigator {
    page: Arc<dyn WebPage>,
    clock: Arc<dyn Clock>,
    modal: String,
    modal_confirm: String,
    poll_interval: Duration,
}

impl Navigator {
    pub fn new(session: &Session, config: &Config) -> Self {
        Self {
            page: session.page.clone(),
            clock: session.clock.clone(),
            modal: config.selectors.modal.clone(),
            modal_confirm: config.selectors.modal_confirm.clone(),
            poll_interval: config.timings.poll_interval(),
        }
    }

    /// 打开目标页面
    pub async fn open(&self, url: &str) -> Result<()> {
        info!("🌐 正在打开: {}", url);
        self.page.goto(url).await?;
        info!("✓ 已导航到: {}", url);
        Ok(())
    }

    /// 在 `timeout` 内检测弹窗，出现则点击确认
    ///
    /// 弹窗没有出现不是错误。确认按钮点击失败（如弹窗正在动画中）同样视为无弹窗。
    pub async fn dismiss_modal(&self, timeout: Duration) -> Result<ModalOutcome> {
        let visibility = wait_for_visible(
            self.page.as_ref(),
            self.clock.as_ref(),
            &self.modal,
            timeout,
            self.poll_interval,
        )
        .await;

        match visibility {
            Visibility::Visible => match self.page.click(&self.modal_confirm).await {
                Ok(()) => {
                    info!("✓ 已关闭弹窗");
                    Ok(ModalOutcome::Dismissed)
                }
                Err(e) => {
                    warn!("⚠️ 点击弹窗确认按钮失败，继续执行: {}", e);
                    Ok(ModalOutcome::NotPresent)
                }
            },
            Visibility::Absent => {
                debug!("{:?} 内未出现弹窗", timeout);
                Ok(ModalOutcome::NotPresent)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::infrastructure::{ManualClock, PdfPrinter};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ModalPage {
        modal_visible: Mutex<bool>,
        confirm_broken: bool,
        clicks: Mutex<Vec<String>>,
        visited: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl WebPage for ModalPage {
        async fn goto(&self, url: &str) -> Result<()> {
            self.visited.lock().unwrap().push(url.to_string());
            Ok(())
        }
        async fn click(&self, selector: &str) -> Result<()> {
            self.clicks.lock().unwrap().push(selector.to_string());
            let mut visible = self.modal_visible.lock().unwrap();
            if selector == Config::default().selectors.modal_confirm && *visible && !self.confirm_broken {
                *visible = false;
                Ok(())
            } else {
                Err(AppError::element_not_found(selector))
            }
        }
        async fn fill(&self, _selector: &str, _value: &str) -> Result<()> {
            Ok(())
        }
        async fn select_option(&self, _selector: &str, _value: &str) -> Result<()> {
            Ok(())
        }
        async fn is_visible(&self, selector: &str) -> Result<bool> {
            Ok(selector == Config::default().selectors.modal && *self.modal_visible.lock().unwrap())
        }
        async fn inner_html(&self, selector: &str) -> Result<String> {
            Err(AppError::element_not_found(selector))
        }
        async fn screenshot_element(&self, selector: &str, _path: &Path) -> Result<()> {
            Err(AppError::element_not_found(selector))
        }
    }

    struct NoPrinter;

    #[async_trait]
    impl PdfPrinter for NoPrinter {
        async fn print_to_pdf(&self, _html: &Path, pdf: &Path) -> Result<()> {
            Err(AppError::receipt("-", format!("unexpected print {}", pdf.display())))
        }
    }

    fn navigator(page: Arc<ModalPage>, clock: Arc<ManualClock>) -> Navigator {
        let session = Session::new(page, Arc::new(NoPrinter), clock);
        Navigator::new(&session, &Config::default())
    }

    #[tokio::test]
    async fn dismiss_is_noop_without_modal() {
        let page = Arc::new(ModalPage::default());
        let clock = Arc::new(ManualClock::new());
        let nav = navigator(page.clone(), clock.clone());

        let outcome = nav.dismiss_modal(Duration::from_millis(1000)).await.unwrap();

        assert_eq!(outcome, ModalOutcome::NotPresent);
        assert!(page.clicks.lock().unwrap().is_empty(), "没有弹窗时不应点击");
        assert_eq!(clock.now(), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn visible_modal_is_confirmed() {
        let page = Arc::new(ModalPage::default());
        *page.modal_visible.lock().unwrap() = true;
        let clock = Arc::new(ManualClock::new());
        let nav = navigator(page.clone(), clock);

        let outcome = nav.dismiss_modal(Duration::from_millis(1000)).await.unwrap();

        assert_eq!(outcome, ModalOutcome::Dismissed);
        assert_eq!(
            *page.clicks.lock().unwrap(),
            vec![Config::default().selectors.modal_confirm]
        );
        assert!(!*page.modal_visible.lock().unwrap());
    }

    #[tokio::test]
    async fn failed_confirm_click_is_not_fatal() {
        let page = Arc::new(ModalPage {
            modal_visible: Mutex::new(true),
            confirm_broken: true,
            ..Default::default()
        });
        let nav = navigator(page.clone(), Arc::new(ManualClock::new()));

        let outcome = nav.dismiss_modal(Duration::from_millis(1000)).await.unwrap();

        assert_eq!(outcome, ModalOutcome::NotPresent);
        assert_eq!(page.clicks.lock().unwrap().len(), 1);
        assert!(*page.modal_visible.lock().unwrap());
    }

    #[tokio::test]
    async fn open_navigates_to_url() {
        let page = Arc::new(ModalPage::default());
        let nav = navigator(page.clone(), Arc::new(ManualClock::new()));

        nav.open("https://example.test/#/robot-order").await.unwrap();

        assert_eq!(
            *page.visited.lock().unwrap(),
            vec!["https://example.test/#/robot-order".to_string()]
        );
    }
}
