use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, Result};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "ROBOT_ORDER_CONFIG";
/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "robot_order.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 下单页面 URL
    pub order_page_url: String,
    /// 订单 CSV URL
    pub orders_csv_url: String,
    /// 订单 CSV 本地保存路径
    pub orders_csv_file: PathBuf,
    /// 截图目录
    pub screenshots_dir: PathBuf,
    /// 回执 PDF 目录
    pub receipts_dir: PathBuf,
    /// 回执 HTML 暂存目录
    pub staging_dir: PathBuf,
    /// 压缩包输出路径
    pub archive_path: PathBuf,
    /// 运行中止时是否仍然打包已生成的回执
    pub archive_partial_on_failure: bool,
    /// 浏览器调试端口（设置后连接已有浏览器，否则启动新浏览器）
    pub browser_debug_port: Option<u16>,
    /// 是否无头模式
    pub headless: bool,
    /// 浏览器可执行文件
    pub chrome_executable: Option<PathBuf>,
    /// 输出日志文件
    pub output_log_file: Option<String>,
    pub timings: Timings,
    pub selectors: Selectors,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order_page_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            orders_csv_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            orders_csv_file: PathBuf::from("orders.csv"),
            screenshots_dir: PathBuf::from("output/orders_screenshots"),
            receipts_dir: PathBuf::from("output/receipt_pdf"),
            staging_dir: PathBuf::from("output/receipt_html"),
            archive_path: PathBuf::from("output/receipts_zip.zip"),
            archive_partial_on_failure: false,
            browser_debug_port: None,
            headless: true,
            chrome_executable: None,
            output_log_file: Some("output/run.log".to_string()),
            timings: Timings::default(),
            selectors: Selectors::default(),
        }
    }
}

/// 等待与重试参数
///
/// 数值针对目标站点的延迟调校，单位毫秒。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// 最大提交次数
    pub max_retries: usize,
    /// 点击提交后的固定等待
    pub settle_delay_ms: u64,
    /// 错误提示检测窗口
    pub error_timeout_ms: u64,
    /// 弹窗检测窗口
    pub modal_timeout_ms: u64,
    /// 预览图出现的等待上限
    pub preview_timeout_ms: u64,
    /// 可见性轮询间隔
    pub poll_interval_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            max_retries: 10,
            settle_delay_ms: 300,
            error_timeout_ms: 2000,
            modal_timeout_ms: 1000,
            preview_timeout_ms: 5000,
            poll_interval_ms: 100,
        }
    }
}

impl Timings {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn error_timeout(&self) -> Duration {
        Duration::from_millis(self.error_timeout_ms)
    }

    pub fn modal_timeout(&self) -> Duration {
        Duration::from_millis(self.modal_timeout_ms)
    }

    pub fn preview_timeout(&self) -> Duration {
        Duration::from_millis(self.preview_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// 目标站点的页面选择器
///
/// 以 `//` 开头的选择器按 XPath 处理，其余按 CSS 处理。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub head: String,
    /// `{}` 会被替换为 Body 字段的值
    pub body_radio: String,
    pub legs: String,
    pub address: String,
    pub preview: String,
    pub order: String,
    pub order_another: String,
    pub receipt: String,
    pub preview_image: String,
    pub modal: String,
    pub modal_confirm: String,
    pub error_alert: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            head: "#head".to_string(),
            body_radio: "input[type='radio'][value='{}']".to_string(),
            legs: "input[placeholder='Enter the part number for the legs']".to_string(),
            address: "input[placeholder='Shipping address']".to_string(),
            preview: "#preview".to_string(),
            order: "#order".to_string(),
            order_another: "#order-another".to_string(),
            receipt: "#receipt".to_string(),
            preview_image: "#robot-preview-image".to_string(),
            modal: ".modal-dialog".to_string(),
            modal_confirm: "//button[text()='OK']".to_string(),
            error_alert: ".alert.alert-danger".to_string(),
        }
    }
}

impl Selectors {
    /// 生成指定 Body 值的单选框选择器
    pub fn body_radio_for(&self, value: &str) -> String {
        self.body_radio.replace("{}", value)
    }
}

impl Config {
    /// 加载配置：默认值 → 配置文件（如存在）→ 环境变量
    pub fn load() -> Result<Self> {
        let file = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            });

        let base = match file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        Self::from_toml_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 使用环境变量覆盖各字段
    pub fn with_env_overrides(self) -> Self {
        let default = self;
        let timings = Timings {
            max_retries: env_parse("MAX_RETRIES").unwrap_or(default.timings.max_retries),
            settle_delay_ms: env_parse("SETTLE_DELAY_MS").unwrap_or(default.timings.settle_delay_ms),
            error_timeout_ms: env_parse("ERROR_TIMEOUT_MS").unwrap_or(default.timings.error_timeout_ms),
            modal_timeout_ms: env_parse("MODAL_TIMEOUT_MS").unwrap_or(default.timings.modal_timeout_ms),
            ..default.timings
        };
        Self {
            order_page_url: std::env::var("ORDER_PAGE_URL").unwrap_or(default.order_page_url),
            orders_csv_url: std::env::var("ORDERS_CSV_URL").unwrap_or(default.orders_csv_url),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT").or(default.browser_debug_port),
            headless: env_parse("HEADLESS").unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE")
                .ok()
                .map(PathBuf::from)
                .or(default.chrome_executable),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").ok().or(default.output_log_file),
            archive_partial_on_failure: env_parse("ARCHIVE_PARTIAL_ON_FAILURE")
                .unwrap_or(default.archive_partial_on_failure),
            timings,
            ..default
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.timings.max_retries == 0 {
            return Err(AppError::Config("max_retries 必须大于 0".to_string()));
        }
        if self.timings.poll_interval_ms == 0 {
            return Err(AppError::Config("poll_interval_ms 必须大于 0".to_string()));
        }
        if !self.selectors.body_radio.contains("{}") {
            return Err(AppError::Config(
                "selectors.body_radio 必须包含 {} 占位符".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
