//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 应用入口
//! - 管理浏览器生命周期
//! - 组装 `Session` 并交给流水线
//! - 输出全局统计信息
//!
//! ### `pipeline` - 订单流水线
//! - 打开页面、加载订单、逐个处理、打包回执
//! - 决定失败时是否打包
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (浏览器 + Session)
//!     ↓
//! pipeline (处理 Vec<Order>)
//!     ↓
//! workflow::OrderFlow (处理单个 Order)
//!     ↓
//! services (能力层：navigator / feed / receipt / archive)
//!     ↓
//! infrastructure (基础设施：WebPage / PdfPrinter / Clock)
//! ```

pub mod batch_processor;
pub mod pipeline;

pub use batch_processor::App;
pub use pipeline::{Pipeline, RunSummary};
