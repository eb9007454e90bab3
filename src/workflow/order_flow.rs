//! 订单处理流程 - 流程层
//!
//! 核心职责：定义"一个订单"的完整处理流程
//!
//! 流程顺序：
//! 1. 填写表单
//! 2. 预览 → 截图
//! 3. 提交（带重试）
//! 4. 回执 → PDF
//! 5. 再下一单 → 关闭弹窗

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{Config, Selectors, Timings};
use crate::error::{AppError, Result};
use crate::infrastructure::{wait_for_visible, Clock, Session, Visibility, WebPage};
use crate::models::{Order, OrderArtifacts};
use crate::services::{Navigator, ReceiptRenderer};
use crate::utils::logging::truncate_text;
use crate::workflow::order_ctx::OrderCtx;
use crate::workflow::submit_retry::SubmitRetry;

/// 订单处理流程
///
/// - 编排单个订单的完整处理步骤
/// - 任何一步失败都直接返回错误，不跳过
/// - 只依赖会话中的能力，不持有浏览器
pub struct OrderFlow {
    page: Arc<dyn WebPage>,
    clock: Arc<dyn Clock>,
    navigator: Navigator,
    submit: SubmitRetry,
    renderer: ReceiptRenderer,
    selectors: Selectors,
    timings: Timings,
    screenshots_dir: PathBuf,
}

impl OrderFlow {
    /// 创建新的订单处理流程
    pub fn new(session: &Session, config: &Config) -> Self {
        Self {
            page: session.page.clone(),
            clock: session.clock.clone(),
            navigator: Navigator::new(session, config),
            submit: SubmitRetry::new(session, config),
            renderer: ReceiptRenderer::new(
                session,
                config.receipts_dir.clone(),
                config.staging_dir.clone(),
            ),
            selectors: config.selectors.clone(),
            timings: config.timings.clone(),
            screenshots_dir: config.screenshots_dir.clone(),
        }
    }

    pub async fn run(&self, order: &Order, ctx: &OrderCtx) -> Result<OrderArtifacts> {
        info!(
            "{} 头 {} / 身体 {} / 腿 {} / 地址: {}",
            ctx,
            order.head,
            order.body,
            order.legs,
            truncate_text(&order.address, 40)
        );

        // ========== 1. 填写表单 ==========
        self.fill_form(order).await?;
        debug!("{} 表单已填写", ctx);

        // ========== 2. 预览并截图 ==========
        let screenshot = self.preview_and_screenshot(order, ctx).await?;

        // ========== 3. 提交（带重试） ==========
        info!("{} 📤 正在提交订单...", ctx);
        let attempts = self.submit.submit(ctx).await?;

        // ========== 4. 生成回执 ==========
        let receipt_html = self.page.inner_html(&self.selectors.receipt).await?;
        let receipt = self
            .renderer
            .render(order, &receipt_html, &screenshot)
            .await?;

        // ========== 5. 准备下一单 ==========
        self.page.click(&self.selectors.order_another).await?;
        self.navigator
            .dismiss_modal(self.timings.modal_timeout())
            .await?;

        Ok(OrderArtifacts {
            order_number: order.order_number.clone(),
            screenshot,
            receipt,
            attempts,
        })
    }

    /// 填写表单
    async fn fill_form(&self, order: &Order) -> Result<()> {
        self.page
            .select_option(&self.selectors.head, &order.head)
            .await?;
        self.page
            .click(&self.selectors.body_radio_for(&order.body))
            .await?;
        self.page.fill(&self.selectors.legs, &order.legs).await?;
        self.page
            .fill(&self.selectors.address, &order.address)
            .await?;
        Ok(())
    }

    /// 点击预览，等待预览图出现后截图
    async fn preview_and_screenshot(&self, order: &Order, ctx: &OrderCtx) -> Result<PathBuf> {
        self.page.click(&self.selectors.preview).await?;

        let visibility = wait_for_visible(
            self.page.as_ref(),
            self.clock.as_ref(),
            &self.selectors.preview_image,
            self.timings.preview_timeout(),
            self.timings.poll_interval(),
        )
        .await;
        if visibility == Visibility::Absent {
            return Err(AppError::element_not_found(&self.selectors.preview_image));
        }

        let path = self.screenshots_dir.join(order.screenshot_file_name());
        self.page
            .screenshot_element(&self.selectors.preview_image, &path)
            .await?;
        info!("{} 📸 截图已保存: {}", ctx, path.display());
        Ok(path)
    }
}
