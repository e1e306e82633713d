pub mod panel;

pub use panel::{Status, Task, divider, progress_bar, role_tag, status_line, task_panel};
