//! 页面驱动 - 基础设施层
//!
//! 持有下单页的 Page 资源，通过执行 JS 实现 `WebPage` 能力

use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::infrastructure::WebPage;

/// 页面驱动
///
/// 职责：
/// - 持有唯一的下单页 Page
/// - 暴露 eval() 与元素操作能力
/// - 不认识 Order
/// - 不处理业务流程
pub struct PageDriver {
    page: Page,
}

impl PageDriver {
    /// 创建新的页面驱动
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let result = self
            .page
            .evaluate(js_code.into())
            .await
            .map_err(|e| AppError::browser("执行脚本", e))?;
        result
            .into_value::<T>()
            .map_err(|e| AppError::Script(e.to_string()))
    }

    /// 对元素执行脚本片段，元素不存在时返回 ElementNotFound
    ///
    /// `body` 中可以使用变量 `el`，需返回 true 表示成功
    async fn with_element(&self, selector: &str, body: &str) -> Result<()> {
        let js_code = format!(
            r#"
            (() => {{
                const el = {};
                if (!el) return false;
                {}
            }})()
            "#,
            locate_js(selector)?,
            body
        );
        if self.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(AppError::element_not_found(selector))
        }
    }
}

#[async_trait]
impl WebPage for PageDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| AppError::browser(format!("导航到 {}", url), e))?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        debug!("点击: {}", selector);
        self.with_element(
            selector,
            r#"
                el.scrollIntoView({ block: 'center' });
                el.click();
                return true;
            "#,
        )
        .await
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        debug!("填写 {}: {}", selector, value);
        // React 受控组件需要通过原型上的 setter 赋值并派发事件
        let body = format!(
            r#"
                const proto = el instanceof HTMLTextAreaElement
                    ? HTMLTextAreaElement.prototype
                    : HTMLInputElement.prototype;
                const setter = Object.getOwnPropertyDescriptor(proto, 'value').set;
                el.focus();
                setter.call(el, {});
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            "#,
            js_string(value)?
        );
        self.with_element(selector, &body).await
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        debug!("选择 {}: {}", selector, value);
        let body = format!(
            r#"
                const value = {};
                if (!Array.from(el.options).some(o => o.value === value)) return false;
                const setter = Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value').set;
                setter.call(el, value);
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            "#,
            js_string(value)?
        );
        self.with_element(selector, &body)
            .await
            .map_err(|e| match e {
                AppError::ElementNotFound { .. } => {
                    AppError::element_not_found(format!("{} option[value='{}']", selector, value))
                }
                other => other,
            })
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const el = {};
                if (!el) return false;
                const style = window.getComputedStyle(el);
                if (style.display === 'none' || style.visibility === 'hidden') return false;
                const rect = el.getBoundingClientRect();
                return rect.width > 0 && rect.height > 0;
            }})()
            "#,
            locate_js(selector)?
        );
        self.eval_as::<bool>(js_code).await
    }

    async fn inner_html(&self, selector: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct InnerHtml {
            found: bool,
            html: String,
        }

        let js_code = format!(
            r#"
            (() => {{
                const el = {};
                return el ? {{ found: true, html: el.innerHTML }} : {{ found: false, html: '' }};
            }})()
            "#,
            locate_js(selector)?
        );
        let result: InnerHtml = self.eval_as(js_code).await?;
        if result.found {
            Ok(result.html)
        } else {
            Err(AppError::element_not_found(selector))
        }
    }

    async fn screenshot_element(&self, selector: &str, path: &Path) -> Result<()> {
        if is_xpath(selector) {
            return Err(AppError::Script(format!("元素截图只支持 CSS 选择器: {}", selector)));
        }
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| AppError::element_not_found(selector))?;
        element
            .save_screenshot(CaptureScreenshotFormat::Png, path)
            .await
            .map_err(|e| AppError::browser(format!("截图 {}", selector), e))?;
        debug!("截图已保存: {}", path.display());
        Ok(())
    }
}

fn is_xpath(selector: &str) -> bool {
    selector.starts_with("//") || selector.starts_with("(//")
}

fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| AppError::Script(e.to_string()))
}

/// 生成定位元素的 JS 表达式
fn locate_js(selector: &str) -> Result<String> {
    let literal = js_string(selector)?;
    Ok(if is_xpath(selector) {
        format!(
            "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            literal
        )
    } else {
        format!("document.querySelector({})", literal)
    })
}
