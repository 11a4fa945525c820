pub mod category;
pub mod course;
pub mod form;
pub mod loaders;
pub mod month;
pub mod photo;
pub mod record;

pub use category::{ActiveFieldSet, Category};
pub use course::{Course, Timing};
pub use form::ReportForm;
pub use loaders::{load_all_forms, load_form};
pub use month::ReportMonth;
pub use photo::{PhotoState, StudentPhoto};
pub use record::{Derived, FieldEdit, Grade, ReportField, ReportRecord, ScoreSheet};
