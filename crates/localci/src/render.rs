//! Boxed, colorized progress view of a pipeline.
//!
//! Rendering is pure: the same inputs always give the same text. Each stage is
//! drawn as its own box; stages that are done, waiting or skipped collapse to
//! a header.

use colored::{Color, Colorize};

use crate::model::{Pipeline, SkipSet};

/// Longest command shown in a step row, ellipsis included.
pub const MAX_COMMAND_LENGTH: usize = 50;

/// Interior width of every box.
pub const TOTAL_WIDTH: usize = 60;

const TITLE_WIDTH: usize = TOTAL_WIDTH - 6;
const ELLIPSIS: &str = "...";

/// Moves the cursor home and clears the screen.
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// Semantic status of a stage or step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Pending,
    Success,
    Failed,
    Waiting,
    Skipped,
}

impl Status {
    /// Terminal color for this status; `None` keeps the default color.
    pub fn color(self) -> Option<Color> {
        match self {
            Status::Pending => Some(Color::Yellow),
            Status::Success => Some(Color::Green),
            Status::Failed => Some(Color::Red),
            Status::Waiting => Some(Color::Cyan),
            Status::Skipped => None,
        }
    }

    /// Fixed-width label used in step rows.
    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Success => "Success",
            Status::Failed => "Failed ",
            Status::Waiting => "Waiting",
            Status::Skipped => "Skipped",
        }
    }

    /// Suffix appended to a stage title.
    fn title_suffix(self) -> &'static str {
        match self {
            Status::Pending => "",
            Status::Success => " (Success)",
            Status::Failed => " (Failed)",
            Status::Waiting => " (Waiting)",
            Status::Skipped => " (Skipped)",
        }
    }

    /// Stages in these states show only their header.
    fn collapses(self) -> bool {
        matches!(self, Status::Success | Status::Waiting | Status::Skipped)
    }

    /// Apply this status' color to `text`.
    pub fn paint(self, text: &str) -> String {
        match self.color() {
            Some(color) => text.color(color).to_string(),
            None => text.to_string(),
        }
    }
}

/// Shorten a command to [`MAX_COMMAND_LENGTH`] characters, ending in `...`
/// when cut. Shorter commands are returned unchanged.
pub fn format_command(command: &str) -> String {
    if command.chars().count() > MAX_COMMAND_LENGTH {
        let kept: String = command
            .chars()
            .take(MAX_COMMAND_LENGTH - ELLIPSIS.len())
            .collect();
        format!("{kept}{ELLIPSIS}")
    } else {
        command.to_string()
    }
}

/// Header status of stage `index`; `None` while it is the running stage.
pub fn stage_status(
    index: usize,
    name: &str,
    current_stage: usize,
    error_occurred: bool,
    skip: &SkipSet,
) -> Option<Status> {
    if skip.contains(name) {
        Some(Status::Skipped)
    } else if index < current_stage {
        Some(Status::Success)
    } else if index > current_stage {
        Some(Status::Waiting)
    } else if error_occurred {
        Some(Status::Failed)
    } else {
        None
    }
}

/// Status of step `step` in stage `stage`.
pub fn step_status(
    stage: usize,
    step: usize,
    current_stage: usize,
    current_step: usize,
    error_occurred: bool,
) -> Status {
    if stage < current_stage || (stage == current_stage && step < current_step) {
        Status::Success
    } else if error_occurred && stage == current_stage && step == current_step {
        Status::Failed
    } else {
        Status::Pending
    }
}

/// Render every stage of `pipeline` as a stack of boxes.
pub fn render(
    pipeline: &Pipeline,
    current_stage: usize,
    current_step: usize,
    error_occurred: bool,
    skip: &SkipSet,
) -> String {
    let border = "═".repeat(TOTAL_WIDTH);
    let mut out = String::new();

    for (i, stage) in pipeline.stages.iter().enumerate() {
        let status = stage_status(i, &stage.name, current_stage, error_occurred, skip);
        let collapsed = status.is_some_and(Status::collapses);

        let title = match status {
            Some(s) => format!("{}{}", stage.name, s.title_suffix()),
            None => stage.name.clone(),
        };
        let title = title_case(&title);
        let padding = TITLE_WIDTH.saturating_sub(title.chars().count());
        let title = match status {
            Some(s) => s.paint(&title),
            None => title,
        };

        out.push_str(&format!("╔{border}╗\n"));
        out.push_str(&format!("║   {title}{}   ║\n", " ".repeat(padding)));

        if collapsed {
            out.push_str(&format!("╚{border}╝\n\n"));
            continue;
        }

        out.push_str(&format!("╠{border}╣\n"));
        for (j, step) in stage.steps.iter().enumerate() {
            let status = step_status(i, j, current_stage, current_step, error_occurred);
            out.push_str(&format!(
                "║ {:<width$} {} ║\n",
                format_command(&step.command),
                status.paint(status.label()),
                width = MAX_COMMAND_LENGTH,
            ));
        }
        out.push_str(&format!("╚{border}╝\n\n"));
    }

    out
}

/// A full screen update: clear, then [`render`].
pub fn frame(
    pipeline: &Pipeline,
    current_stage: usize,
    current_step: usize,
    error_occurred: bool,
    skip: &SkipSet,
) -> String {
    format!(
        "{CLEAR_SCREEN}{}",
        render(pipeline, current_stage, current_step, error_occurred, skip)
    )
}

/// Uppercase the first letter of every word, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = !matches!(c, '\'' | '_');
        }
    }
    out
}
