//! 测试用的模拟下单站点

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use robot_order_submit::config::{Config, Selectors};
use robot_order_submit::infrastructure::{ManualClock, PdfPrinter, WebPage};
use robot_order_submit::{AppError, Result, Session};

/// 服务器对提交的响应方式
#[derive(Debug, Clone, Copy)]
pub enum ServerMode {
    /// 从不报错
    Healthy,
    /// 每个订单前 n 次提交报错
    FailFirst(usize),
    /// 总是报错
    AlwaysFail,
}

#[derive(Debug, Default)]
pub struct SiteState {
    pub modal_visible: bool,
    pub preview_visible: bool,
    pub alert_visible: bool,
    pub receipt_visible: bool,
    pub form: HashMap<String, String>,
    pub submits_for_current_order: usize,
    pub total_submits: usize,
    pub modal_dismissals: usize,
    pub visited: Vec<String>,
}

/// 模拟 RobotSpareBin 下单页
pub struct FakeOrderSite {
    selectors: Selectors,
    mode: ServerMode,
    modal_after_order: bool,
    preview_renders: bool,
    pub state: Mutex<SiteState>,
}

impl FakeOrderSite {
    pub fn new(mode: ServerMode) -> Arc<Self> {
        Arc::new(Self {
            selectors: Selectors::default(),
            mode,
            modal_after_order: true,
            preview_renders: true,
            state: Mutex::new(SiteState::default()),
        })
    }

    /// 点击预览后预览图始终不出现的站点
    pub fn without_preview(mode: ServerMode) -> Arc<Self> {
        Arc::new(Self {
            selectors: Selectors::default(),
            mode,
            modal_after_order: true,
            preview_renders: false,
            state: Mutex::new(SiteState::default()),
        })
    }

    pub fn total_submits(&self) -> usize {
        self.state.lock().unwrap().total_submits
    }

    pub fn modal_dismissals(&self) -> usize {
        self.state.lock().unwrap().modal_dismissals
    }

    fn submit_fails(&self, attempt: usize) -> bool {
        match self.mode {
            ServerMode::Healthy => false,
            ServerMode::FailFirst(n) => attempt <= n,
            ServerMode::AlwaysFail => true,
        }
    }

    fn is_body_radio(&self, selector: &str) -> Option<String> {
        let prefix = self.selectors.body_radio.split("{}").next()?;
        let rest = selector.strip_prefix(prefix)?;
        rest.strip_suffix("']").map(str::to_string)
    }
}

#[async_trait]
impl WebPage for FakeOrderSite {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.visited.push(url.to_string());
        state.modal_visible = true;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let s = &self.selectors;
        let mut state = self.state.lock().unwrap();

        if selector == s.modal_confirm && state.modal_visible {
            state.modal_visible = false;
            state.modal_dismissals += 1;
        } else if state.modal_visible {
            // 弹窗遮挡时页面不可操作
            return Err(AppError::element_not_found(selector));
        } else if selector == s.preview {
            state.preview_visible = self.preview_renders;
        } else if selector == s.order {
            state.submits_for_current_order += 1;
            state.total_submits += 1;
            let fails = self.submit_fails(state.submits_for_current_order);
            state.alert_visible = fails;
            state.receipt_visible = !fails;
        } else if selector == s.order_another && state.receipt_visible {
            state.form.clear();
            state.preview_visible = false;
            state.receipt_visible = false;
            state.alert_visible = false;
            state.submits_for_current_order = 0;
            state.modal_visible = self.modal_after_order;
        } else if let Some(body) = self.is_body_radio(selector) {
            state.form.insert("body".to_string(), body);
        } else {
            return Err(AppError::element_not_found(selector));
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let s = &self.selectors;
        if selector != s.legs && selector != s.address {
            return Err(AppError::element_not_found(selector));
        }
        let mut state = self.state.lock().unwrap();
        state.form.insert(selector.to_string(), value.to_string());
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        if selector != self.selectors.head {
            return Err(AppError::element_not_found(selector));
        }
        let mut state = self.state.lock().unwrap();
        state.form.insert("head".to_string(), value.to_string());
        Ok(())
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        let s = &self.selectors;
        let state = self.state.lock().unwrap();
        Ok(if selector == s.modal {
            state.modal_visible
        } else if selector == s.error_alert {
            state.alert_visible
        } else if selector == s.preview_image {
            state.preview_visible
        } else if selector == s.receipt {
            state.receipt_visible
        } else {
            false
        })
    }

    async fn inner_html(&self, selector: &str) -> Result<String> {
        let state = self.state.lock().unwrap();
        if selector != self.selectors.receipt || !state.receipt_visible {
            return Err(AppError::element_not_found(selector));
        }
        Ok(format!(
            "<h3>Receipt</h3><p class=\"badge\">RSB-ROBO-ORDER</p><div id=\"parts\">Head: {}</div><p>{}</p>",
            state.form.get("head").cloned().unwrap_or_default(),
            state
                .form
                .get(&self.selectors.address)
                .cloned()
                .unwrap_or_default()
        ))
    }

    async fn screenshot_element(&self, selector: &str, path: &Path) -> Result<()> {
        let visible = {
            let state = self.state.lock().unwrap();
            selector == self.selectors.preview_image && state.preview_visible
        };
        if !visible {
            return Err(AppError::element_not_found(selector));
        }
        std::fs::write(path, b"\x89PNG\r\n\x1a\n").map_err(|e| AppError::io(path, e))
    }
}

/// 把 HTML 文档原样写成"PDF"的打印器
#[derive(Default)]
pub struct FakePrinter {
    pub printed: Mutex<Vec<String>>,
}

#[async_trait]
impl PdfPrinter for FakePrinter {
    async fn print_to_pdf(&self, html_path: &Path, pdf_path: &Path) -> Result<()> {
        let html = std::fs::read_to_string(html_path).map_err(|e| AppError::io(html_path, e))?;
        std::fs::write(pdf_path, format!("%PDF-1.4\n{}", html))
            .map_err(|e| AppError::io(pdf_path, e))?;
        self.printed.lock().unwrap().push(html);
        Ok(())
    }
}

pub fn session(site: Arc<FakeOrderSite>, printer: Arc<FakePrinter>) -> Session {
    Session::new(site, printer, Arc::new(ManualClock::new()))
}

/// 所有输出都指向临时目录的配置
pub fn config_in(dir: &Path, csv_url: String) -> Config {
    let output = dir.join("output");
    Config {
        order_page_url: "https://robotsparebinindustries.test/#/robot-order".to_string(),
        orders_csv_url: csv_url,
        orders_csv_file: dir.join("orders.csv"),
        screenshots_dir: output.join("orders_screenshots"),
        receipts_dir: output.join("receipt_pdf"),
        staging_dir: output.join("receipt_html"),
        archive_path: output.join("receipts_zip.zip"),
        output_log_file: None,
        ..Config::default()
    }
}

pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
