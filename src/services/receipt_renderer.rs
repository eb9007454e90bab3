//! 回执渲染服务 - 业务能力层
//!
//! 把回执区域的 HTML 与机器人截图组合成文档，再打印为 PDF

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::infrastructure::{file_url, PdfPrinter, Session};
use crate::models::Order;

/// 回执渲染服务
pub struct ReceiptRenderer {
    printer: Arc<dyn PdfPrinter>,
    receipts_dir: PathBuf,
    staging_dir: PathBuf,
}

impl ReceiptRenderer {
    pub fn new(session: &Session, receipts_dir: PathBuf, staging_dir: PathBuf) -> Self {
        Self {
            printer: session.printer.clone(),
            receipts_dir,
            staging_dir,
        }
    }

    /// 生成订单回执 PDF
    ///
    /// # 参数
    /// - `order`: 订单
    /// - `receipt_html`: 回执区域的内部 HTML
    /// - `screenshot`: 已保存的机器人截图
    ///
    /// # 返回
    /// 回执 PDF 路径
    pub async fn render(
        &self,
        order: &Order,
        receipt_html: &str,
        screenshot: &Path,
    ) -> Result<PathBuf> {
        let image_url = file_url(screenshot)
            .map_err(|e| AppError::receipt(&order.order_number, e.to_string()))?;
        let document = build_receipt_document(receipt_html, image_url.as_str());

        let html_path = self.staging_dir.join(order.receipt_html_file_name());
        let pdf_path = self.receipts_dir.join(order.receipt_file_name());

        tokio::fs::write(&html_path, document)
            .await
            .map_err(|e| AppError::io(&html_path, e))?;
        debug!("回执文档已写入: {}", html_path.display());

        let printed = self
            .printer
            .print_to_pdf(&html_path, &pdf_path)
            .await
            .map_err(|e| AppError::receipt(&order.order_number, e.to_string()));

        // 暂存文档无论成败都删除
        if let Err(e) = tokio::fs::remove_file(&html_path).await {
            debug!("删除暂存文档失败 {}: {}", html_path.display(), e);
        }
        printed?;

        info!("✓ 回执已保存: {}", pdf_path.display());
        Ok(pdf_path)
    }
}

/// 组装回执文档
///
/// 回执内容原样嵌入，截图通过 `<img>` 引用文件
pub fn build_receipt_document(receipt_html: &str, image_src: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
</head>
<body>
    <div>
        {receipt}
    </div>
    <div style="margin: 100px auto; display: flex; justify-content: center; width: 200px; height: auto;">
        <img src="{src}" alt="Robot Preview" style="max-width: 100%;">
    </div>
</body>
</html>
"#,
        receipt = receipt_html,
        src = escape_attribute(image_src)
    )
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
