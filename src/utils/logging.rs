/// 日志工具模块
///
/// 提供日志订阅器初始化以及格式化输出的辅助函数
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, Result};

/// 初始化日志订阅器
///
/// 输出到标准输出；若给出 `log_file_path`，同时追加写入该文件。
/// 重复调用时静默忽略（测试中会多次初始化）。
pub fn init(log_file_path: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("robot_order_submit=info"));

    let file_layer = log_file_path.and_then(open_log_file).map(|file| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .with(file_layer)
        .try_init();
}

/// 以追加方式打开日志文件，失败时提示到 stderr（此时订阅器尚未就绪）
fn open_log_file(path: &str) -> Option<File> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("⚠️ 无法打开日志文件 {}，仅输出到控制台: {}", path, e);
            None
        }
    }
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径，会被覆盖写入文件头
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(log_file_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }
    }
    let log_header = format!(
        "{}\n机器人订单处理日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|e| AppError::io(log_file_path, e))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(order_page_url: &str, max_retries: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 机器人订单自动提交");
    info!("🌐 下单页面: {}", order_page_url);
    info!("🔁 最大提交次数: {}", max_retries);
    info!("{}", "=".repeat(60));
}

/// 记录订单加载信息
pub fn log_orders_loaded(total: usize) {
    info!("✓ 找到 {} 个待处理的订单", total);
    info!("💡 订单将逐个顺序处理\n");
}

/// 打印最终统计信息
///
/// # 参数
/// - `orders`: 完成的订单数
/// - `attempts`: 提交总次数
/// - `archive_path`: 压缩包路径（未生成时为 None）
pub fn print_final_stats(orders: usize, attempts: usize, archive_path: Option<&Path>) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 完成订单: {}", orders);
    info!("📤 提交总次数: {}", attempts);
    match archive_path {
        Some(path) => info!("📦 回执压缩包: {}", path.display()),
        None => info!("📦 未生成回执压缩包"),
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
