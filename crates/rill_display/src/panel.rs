//! Status panels, dividers, role tags, and progress bars.

use colored::Colorize;

const DIVIDER_WIDTH: usize = 56;
const BAR_WIDTH: usize = 40;

/// Lifecycle state shown next to a task or status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Done,
    Error,
    Waiting,
}

impl Status {
    fn icon(self) -> String {
        match self {
            Status::Running => "⟳".yellow().to_string(),
            Status::Done => "✓".green().to_string(),
            Status::Error => "✗".red().to_string(),
            Status::Waiting => "◌".bright_black().to_string(),
        }
    }
}

/// One row of a task panel.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: usize,
    pub title: String,
    pub role: Option<String>,
    pub status: Status,
}

/// A dim horizontal separator line.
pub fn divider(width: usize) -> String {
    format!("{}", "─".repeat(width).bright_black())
}

/// Bright colored `[<icon> <Role>]` tag; unknown roles render white without
/// an icon.
pub fn role_tag(role: &str) -> String {
    let tagged = match role {
        "Leader" => format!("[👑 {role}]").bright_yellow(),
        "Coder" => format!("[⌨ {role}]").bright_green(),
        "Tester" => format!("[🔍 {role}]").bright_cyan(),
        "Chatter" => format!("[💬 {role}]").bright_magenta(),
        _ => format!("[{role}]").white(),
    };
    tagged.bold().to_string()
}

/// Textual progress bar with a percentage. A zero total counts as complete.
pub fn progress_bar(current: usize, total: usize, label: &str) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        (current as f64 / total as f64).min(1.0)
    };
    let filled = (BAR_WIDTH as f64 * ratio) as usize;
    let bar = format!(
        "{}{}",
        "█".repeat(filled).bright_green(),
        "░".repeat(BAR_WIDTH - filled)
    );
    let pct = (ratio * 100.0) as usize;
    let prefix = if label.is_empty() { String::new() } else { format!("{label} ") };
    format!("{prefix}{bar} {pct}%")
}

/// One status line: icon, role tag, message.
pub fn status_line(role: &str, message: &str, status: Status) -> String {
    format!("  {} {} {}", status.icon(), role_tag(role), message)
}

/// A titled task list bounded by dividers.
pub fn task_panel(title: &str, tasks: &[Task]) -> String {
    let mut out = String::from("\n");
    out.push_str(&format!(
        "  {} {}\n",
        "ᓚᘏᗢ".bright_yellow().bold(),
        title.bright_yellow().bold()
    ));
    out.push_str(&divider(DIVIDER_WIDTH));
    out.push('\n');
    for task in tasks {
        let tag = match &task.role {
            Some(role) => role_tag(role),
            None => String::new(),
        };
        out.push_str(&format!("  {} #{} {} {}\n", task.status.icon(), task.id, tag, task.title));
    }
    out.push_str(&divider(DIVIDER_WIDTH));
    out.push('\n');
    out
}
