use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// 一条订单（CSV 中的一行）
///
/// 字段名与目标站点 CSV 表头一一对应，内容原样填入表单。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "Order number")]
    pub order_number: String,
    #[serde(rename = "Head")]
    pub head: String,
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "Legs")]
    pub legs: String,
    #[serde(rename = "Address")]
    pub address: String,
}

impl Order {
    /// 用于文件名的订单号，非 `[A-Za-z0-9_-]` 字符替换为 `_`
    pub fn file_key(&self) -> String {
        self.order_number
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    pub fn screenshot_file_name(&self) -> String {
        format!("screenshot_{}.png", self.file_key())
    }

    pub fn receipt_file_name(&self) -> String {
        format!("receipt_{}.pdf", self.file_key())
    }

    /// 回执 HTML 暂存文件名
    pub fn receipt_html_file_name(&self) -> String {
        format!("receipt_{}.html", self.file_key())
    }
}

/// 单个订单处理产物
#[derive(Debug, Clone)]
pub struct OrderArtifacts {
    pub order_number: String,
    pub screenshot: PathBuf,
    pub receipt: PathBuf,
    /// 实际提交次数
    pub attempts: usize,
}
