use thiserror::Error;

/// 应用程序错误类型
///
/// 所有变体都是致命错误：向上传播并终止整个运行。
/// 弹窗不存在、错误提示不存在属于正常结果，不在此处表示。
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器启动失败
    #[error("浏览器启动失败: {0}")]
    Launch(String),

    /// 浏览器协议调用失败
    #[error("浏览器错误 ({context}): {source}")]
    Browser {
        context: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    /// 页面结构不匹配：找不到元素
    #[error("页面元素不存在: {selector}")]
    ElementNotFound { selector: String },

    /// 页面脚本返回值无法解析
    #[error("脚本执行失败: {0}")]
    Script(String),

    /// 订单 CSV 下载失败
    #[error("订单数据下载失败 ({url}): {source}")]
    FeedDownload {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 订单 CSV 解析失败
    #[error("订单数据解析失败 ({path}): {source}")]
    FeedParse {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// 订单数据内容非法
    #[error("订单数据非法 (第 {row} 行): {reason}")]
    InvalidOrder { row: usize, reason: String },

    /// 提交重试次数耗尽
    #[error("订单 {order_number} 提交失败，已重试 {attempts} 次")]
    RetryExhausted { order_number: String, attempts: usize },

    /// 回执渲染失败
    #[error("订单 {order_number} 回执渲染失败: {message}")]
    Receipt {
        order_number: String,
        message: String,
    },

    /// 压缩归档失败
    #[error("归档失败 ({path}): {source}")]
    Archive {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// 文件操作失败
    #[error("文件操作失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 包装浏览器协议错误
    pub fn browser(context: impl Into<String>, source: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser {
            context: context.into(),
            source,
        }
    }

    /// 元素不存在
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        AppError::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// 包装文件错误
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// 回执渲染错误
    pub fn receipt(order_number: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Receipt {
            order_number: order_number.into(),
            message: message.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_exhausted_names_attempt_count() {
        let err = AppError::RetryExhausted {
            order_number: "7".to_string(),
            attempts: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("10"), "错误信息应包含重试次数: {}", msg);
        assert!(msg.contains('7'));
    }

    #[test]
    fn io_error_keeps_path() {
        let err = AppError::io(
            "output/receipt_pdf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("output/receipt_pdf"));
    }
}
