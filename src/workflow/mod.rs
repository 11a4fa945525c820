pub mod report_ctx;
pub mod session;

pub use report_ctx::ReportCtx;
pub use session::ReportSession;
