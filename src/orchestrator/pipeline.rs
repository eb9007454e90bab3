//! 订单流水线 - 编排层
//!
//! ## 职责
//!
//! 按固定顺序执行整次运行：
//!
//! 1. **准备目录**：截图、回执、暂存目录
//! 2. **打开页面**：导航并关闭首个弹窗
//! 3. **加载订单**：下载并解析 CSV
//! 4. **逐个处理**：委托 `OrderFlow`，任一订单失败即中止
//! 5. **打包回执**：默认只在全部成功后执行

use std::path::Path;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::infrastructure::Session;
use crate::models::{Order, OrderArtifacts};
use crate::services::{ArchiveSummary, Archiver, Navigator, OrderFeed};
use crate::utils::logging::log_orders_loaded;
use crate::workflow::{OrderCtx, OrderFlow};

/// 运行结果
#[derive(Debug, Default)]
pub struct RunSummary {
    pub orders: Vec<OrderArtifacts>,
    pub archive: Option<ArchiveSummary>,
}

impl RunSummary {
    /// 所有订单的提交总次数
    pub fn total_attempts(&self) -> usize {
        self.orders.iter().map(|o| o.attempts).sum()
    }
}

/// 订单流水线
pub struct Pipeline {
    config: Config,
    session: Session,
    feed: OrderFeed,
    archiver: Archiver,
}

impl Pipeline {
    pub fn new(config: Config, session: Session) -> Self {
        Self {
            config,
            session,
            feed: OrderFeed::new(),
            archiver: Archiver::new(),
        }
    }

    /// 执行整次运行
    pub async fn run(&self) -> Result<RunSummary> {
        self.prepare_directories().await?;

        let navigator = Navigator::new(&self.session, &self.config);
        navigator.open(&self.config.order_page_url).await?;
        navigator
            .dismiss_modal(self.config.timings.modal_timeout())
            .await?;

        info!("\n📁 正在下载订单数据...");
        let orders = self
            .feed
            .fetch(&self.config.orders_csv_url, &self.config.orders_csv_file)
            .await?;
        if orders.is_empty() {
            warn!("⚠️ 订单数据为空");
        }
        log_orders_loaded(orders.len());

        let mut completed = Vec::with_capacity(orders.len());
        match self.process_orders(&orders, &mut completed).await {
            Ok(()) => {
                let archive = self.archive().await?;
                Ok(RunSummary {
                    orders: completed,
                    archive: Some(archive),
                })
            }
            Err(e) => {
                error!(
                    "❌ 运行中止 (已完成 {}/{} 个订单): {}",
                    completed.len(),
                    orders.len(),
                    e
                );
                if self.config.archive_partial_on_failure {
                    match self.archive().await {
                        Ok(summary) => warn!(
                            "⚠️ 已打包部分回执 ({} 个): {}",
                            summary.entries.len(),
                            summary.path.display()
                        ),
                        Err(archive_err) => error!("打包部分回执失败: {}", archive_err),
                    }
                }
                Err(e)
            }
        }
    }

    /// 逐个处理订单，遇到错误立即返回
    async fn process_orders(
        &self,
        orders: &[Order],
        completed: &mut Vec<OrderArtifacts>,
    ) -> Result<()> {
        // 流程对象只创建一次，复用
        let flow = OrderFlow::new(&self.session, &self.config);
        let total = orders.len();

        for (index, order) in orders.iter().enumerate() {
            let ctx = OrderCtx::new(order.order_number.clone(), index + 1, total);
            info!("\n{} {}", ctx, "─".repeat(30));

            let artifacts = flow.run(order, &ctx).await?;
            info!("{} ✅ 订单处理完成 (提交 {} 次)", ctx, artifacts.attempts);
            completed.push(artifacts);
        }

        Ok(())
    }

    async fn archive(&self) -> Result<ArchiveSummary> {
        self.archiver
            .archive_folder(&self.config.receipts_dir, &self.config.archive_path)
            .await
    }

    async fn prepare_directories(&self) -> Result<()> {
        for dir in [
            &self.config.screenshots_dir,
            &self.config.receipts_dir,
            &self.config.staging_dir,
        ] {
            create_dir(dir).await?;
        }
        Ok(())
    }
}

async fn create_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::io(dir, e))
}
