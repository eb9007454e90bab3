//! # Robot Order Submit
//!
//! 自动化机器人下单：下载订单 CSV，逐个填写并提交下单表单，
//! 截取机器人预览图、生成 PDF 回执，最后把所有回执打包为 zip。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `WebPage` / `PageDriver` - 页面操作能力
//! - `PdfPrinter` / `ChromePdfPrinter` - HTML 转 PDF 能力
//! - `Clock` - 等待与轮询的时间来源，测试中可替换
//! - `Session` - 启动时构造一次，显式传给各阶段
//!
//! ### ② 业务能力层（Services）
//! - `Navigator` - 打开页面、关闭弹窗
//! - `OrderFeed` - 下载并解析订单 CSV
//! - `ReceiptRenderer` - 回执 HTML + 截图 → PDF
//! - `Archiver` - 回执打包
//!
//! ### ③ 流程层（Workflow）
//! - `OrderCtx` - 上下文封装（订单号 + 序号）
//! - `SubmitRetry` - 提交重试状态机
//! - `OrderFlow` - 单个订单的完整流程
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/pipeline` - 订单流水线
//! - `orchestrator/batch_processor` - 应用入口，管理浏览器

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, Result};
pub use infrastructure::Session;
pub use models::Order;
pub use orchestrator::{App, Pipeline, RunSummary};
pub use workflow::{OrderCtx, OrderFlow};
