use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

/// 页面能力
///
/// 只描述"能对页面做什么"，不认识订单。
/// 找不到元素时返回 `AppError::ElementNotFound`。
#[async_trait]
pub trait WebPage: Send + Sync {
    /// 导航到指定 URL
    async fn goto(&self, url: &str) -> Result<()>;

    /// 点击元素
    async fn click(&self, selector: &str) -> Result<()>;

    /// 填写文本输入框
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// 选择下拉框选项
    async fn select_option(&self, selector: &str, value: &str) -> Result<()>;

    /// 元素当前是否可见（不等待）
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// 读取元素内部 HTML
    async fn inner_html(&self, selector: &str) -> Result<String>;

    /// 对元素区域截图并保存为 PNG
    async fn screenshot_element(&self, selector: &str, path: &Path) -> Result<()>;
}
