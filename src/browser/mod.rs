//! 浏览器会话
//!
//! 启动或连接浏览器，创建下单页与回执打印页两个标签页。

mod connection;
mod headless;

pub use connection::connect_to_browser;
pub use headless::launch_browser;

use chromiumoxide::{Browser, Page};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};

/// 浏览器会话
///
/// 持有浏览器和两个页面：
/// - `order_page`：下单页，整个运行期间只有这一个
/// - `print_page`：打印回执用，不影响下单页状态
pub struct BrowserSession {
    browser: Browser,
    order_page: Page,
    print_page: Page,
    launched: bool,
}

impl BrowserSession {
    /// 按配置启动或连接浏览器
    pub async fn open(config: &Config) -> Result<Self> {
        let (browser, launched) = match config.browser_debug_port {
            Some(port) => (connect_to_browser(port).await?, false),
            None => (
                launch_browser(config.headless, config.chrome_executable.as_deref()).await?,
                true,
            ),
        };

        let order_page = new_blank_page(&browser).await?;
        let print_page = new_blank_page(&browser).await?;
        debug!("已创建下单页与打印页");

        Ok(Self {
            browser,
            order_page,
            print_page,
            launched,
        })
    }

    pub fn order_page(&self) -> &Page {
        &self.order_page
    }

    pub fn print_page(&self) -> &Page {
        &self.print_page
    }

    /// 关闭会话
    ///
    /// 自行启动的浏览器会被关闭；连接的外部浏览器只关闭本次创建的页面。
    pub async fn shutdown(mut self) {
        if self.launched {
            match self.browser.close().await {
                Ok(_) => info!("✓ 浏览器已关闭"),
                Err(e) => warn!("⚠️ 关闭浏览器失败: {}", e),
            }
            let _ = self.browser.wait().await;
        } else {
            for page in [self.order_page, self.print_page] {
                if let Err(e) = page.close().await {
                    warn!("⚠️ 关闭页面失败: {}", e);
                }
            }
        }
    }
}

async fn new_blank_page(browser: &Browser) -> Result<Page> {
    browser
        .new_page("about:blank")
        .await
        .map_err(|e| AppError::browser("创建新页面", e))
}
