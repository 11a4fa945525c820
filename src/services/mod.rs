pub mod aggregator;
pub mod exporter;
pub mod presenter;
pub mod warn_writer;

pub use aggregator::{aggregate, recompute};
pub use exporter::{ExportOutcome, Exporter};
pub use presenter::{render_html, Branding, ReportView};
pub use warn_writer::WarnWriter;
