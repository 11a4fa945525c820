pub mod headless;

pub use headless::{launch_headless_browser, new_blank_page};
