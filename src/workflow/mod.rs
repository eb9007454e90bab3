pub mod order_ctx;
pub mod order_flow;
pub mod submit_retry;

pub use order_ctx::OrderCtx;
pub use order_flow::OrderFlow;
pub use submit_retry::{RetryPolicy, SubmitRetry, SubmitState};
