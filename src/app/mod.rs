pub mod common;
pub mod display;
pub mod error;
pub mod logs;
pub mod remove;
pub mod scale;
pub mod start;
pub mod status;
pub mod target;

pub use logs::{LogFormatter, handle_logs};
pub use remove::handle_remove;
pub use scale::handle_scale;
pub use start::{WaitPolicy, handle_start};
pub use status::handle_status;
pub use target::handle_target;
