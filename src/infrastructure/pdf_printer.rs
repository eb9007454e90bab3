use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use tracing::debug;
use url::Url;

use crate::error::{AppError, Result};

/// HTML 转 PDF 能力
#[async_trait]
pub trait PdfPrinter: Send + Sync {
    /// 把磁盘上的 HTML 文档打印为 PDF
    async fn print_to_pdf(&self, html_path: &Path, pdf_path: &Path) -> Result<()>;
}

/// 使用浏览器打印页的 PDF 打印器
///
/// 在独立标签页中打开 HTML 文件，下单页状态不受影响。
pub struct ChromePdfPrinter {
    page: Page,
}

impl ChromePdfPrinter {
    pub fn new(page: Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl PdfPrinter for ChromePdfPrinter {
    async fn print_to_pdf(&self, html_path: &Path, pdf_path: &Path) -> Result<()> {
        let url = file_url(html_path)?;
        debug!("打印 PDF: {} -> {}", url, pdf_path.display());

        self.page
            .goto(url.as_str())
            .await
            .map_err(|e| AppError::browser(format!("打开 {}", url), e))?;

        let params = PrintToPdfParams {
            print_background: Some(true),
            ..Default::default()
        };
        self.page
            .save_pdf(params, pdf_path)
            .await
            .map_err(|e| AppError::browser(format!("保存 PDF {}", pdf_path.display()), e))?;
        Ok(())
    }
}

/// 把本地路径转为 file:// URL
pub fn file_url(path: &Path) -> Result<Url> {
    let absolute = std::fs::canonicalize(path).map_err(|e| AppError::io(path, e))?;
    Url::from_file_path(&absolute)
        .map_err(|_| AppError::Script(format!("无法转换为文件 URL: {}", absolute.display())))
}
