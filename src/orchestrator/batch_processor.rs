//! 批量订单处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源管理。
//!
//! 1. **应用初始化**：启动日志、启动或连接浏览器
//! 2. **会话构造**：把页面驱动、PDF 打印器和时钟组装为 `Session`
//! 3. **向下委托**：交给 `Pipeline` 执行整次运行
//! 4. **资源释放**：运行结束后关闭浏览器

use std::sync::Arc;

use tracing::info;

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::{ChromePdfPrinter, PageDriver, Session, TokioClock};
use crate::orchestrator::pipeline::{Pipeline, RunSummary};
use crate::utils::logging::{log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    browser: BrowserSession,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config.order_page_url, config.timings.max_retries);

        let browser = BrowserSession::open(&config).await?;

        Ok(Self { config, browser })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> Result<RunSummary> {
        let session = Session::new(
            Arc::new(PageDriver::new(self.browser.order_page().clone())),
            Arc::new(ChromePdfPrinter::new(self.browser.print_page().clone())),
            Arc::new(TokioClock::new()),
        );

        let pipeline = Pipeline::new(self.config.clone(), session);
        let result = pipeline.run().await;

        self.browser.shutdown().await;

        let summary = result?;
        print_final_stats(
            summary.orders.len(),
            summary.total_attempts(),
            summary.archive.as_ref().map(|a| a.path.as_path()),
        );
        if let Some(log_file) = &self.config.output_log_file {
            info!("\n日志已保存至: {}", log_file);
        }

        Ok(summary)
    }
}
