pub mod archiver;
pub mod navigator;
pub mod order_feed;
pub mod receipt_renderer;

pub use archiver::{ArchiveSummary, Archiver};
pub use navigator::{ModalOutcome, Navigator};
pub use order_feed::OrderFeed;
pub use receipt_renderer::{build_receipt_document, ReceiptRenderer};
