//! 订单数据服务 - 业务能力层
//!
//! 下载订单 CSV 并解析为订单列表

use std::path::Path;

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::{load_orders_from_csv, Order};

/// 订单数据服务
pub struct OrderFeed {
    client: Client,
}

impl OrderFeed {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// 下载订单 CSV，覆盖已存在的文件
    ///
    /// # 返回
    /// 写入的字节数
    pub async fn download(&self, url: &str, dest: &Path) -> Result<usize> {
        debug!("下载订单数据: {}", url);

        let to_error = |e: reqwest::Error| AppError::FeedDownload {
            url: url.to_string(),
            source: e,
        };
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .map_err(to_error)?
            .error_for_status()
            .map_err(to_error)?
            .bytes()
            .await
            .map_err(to_error)?;

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::io(parent, e))?;
            }
        }
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| AppError::io(dest, e))?;

        info!("✓ 订单数据已下载: {} ({} 字节)", dest.display(), bytes.len());
        Ok(bytes.len())
    }

    /// 下载并解析订单
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<Vec<Order>> {
        self.download(url, dest).await?;
        load_orders_from_csv(dest)
    }
}

impl Default for OrderFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const CSV: &str = "Order number,Head,Body,Legs,Address\n1,1,2,3,Address 123\n";

    #[tokio::test]
    async fn repeated_download_overwrites_file() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/orders.csv");
                then.status(200).body(CSV);
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("orders.csv");
        let feed = OrderFeed::new();

        feed.download(&server.url("/orders.csv"), &dest).await.unwrap();
        feed.download(&server.url("/orders.csv"), &dest).await.unwrap();

        mock.assert_hits_async(2).await;
        let content = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(content, CSV, "重复下载应覆盖而不是追加");
    }

    #[tokio::test]
    async fn fetch_returns_parsed_orders() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/orders.csv");
                then.status(200).body(CSV);
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("data").join("orders.csv");

        let orders = OrderFeed::new()
            .fetch(&server.url("/orders.csv"), &dest)
            .await
            .unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].address, "Address 123");
    }

    #[tokio::test]
    async fn http_error_is_fatal() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/orders.csv");
                then.status(500);
            })
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("orders.csv");

        let result = OrderFeed::new()
            .fetch(&server.url("/orders.csv"), &dest)
            .await;

        assert!(matches!(result, Err(AppError::FeedDownload { .. })));
        assert!(!dest.exists());
    }
}
