use std::sync::Arc;

use crate::infrastructure::{Clock, PdfPrinter, WebPage};

/// 运行会话
///
/// 启动时构造一次，显式传给各个阶段；不存在全局共享句柄。
#[derive(Clone)]
pub struct Session {
    pub page: Arc<dyn WebPage>,
    pub printer: Arc<dyn PdfPrinter>,
    pub clock: Arc<dyn Clock>,
}

impl Session {
    pub fn new(
        page: Arc<dyn WebPage>,
        printer: Arc<dyn PdfPrinter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            page,
            printer,
            clock,
        }
    }
}
