//! 基础设施层
//!
//! 持有稀缺资源（页面、打印页、时钟），只暴露能力

pub mod clock;
pub mod page_driver;
pub mod pdf_printer;
pub mod session;
pub mod visibility;
pub mod web_page;

pub use clock::{Clock, ManualClock, TokioClock};
pub use page_driver::PageDriver;
pub use pdf_printer::{file_url, ChromePdfPrinter, PdfPrinter};
pub use session::Session;
pub use visibility::{wait_for_visible, Visibility};
pub use web_page::WebPage;
