// ===================================
// ENUMS
// ===================================

// The blocking jobs. Each runs to completion on the frame after its working
// screen is presented; input is not polled again until it finishes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Job {
    Generate,
    Delete,
    Reload,
}

// SCREENS
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Browser,
    Working(Job),
    Summary(BatchSummary),
    Notice(Notice),
    Fatal(String),
}

// ===================================
// STRUCTS
// ===================================

/// Outcome of one generate/delete pass over the selected entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchSummary {
    pub title: &'static str,
    pub processed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub lines: Vec<String>,
}

impl BatchSummary {
    pub fn new(title: &'static str) -> Self {
        BatchSummary {
            title,
            ..Default::default()
        }
    }

    pub fn completed_line(&self) -> String {
        format!(
            "Completed: {} succeeded, {} skipped, {} failed.",
            self.succeeded, self.skipped, self.failed
        )
    }
}

/// Short status text shown for a fixed time before browsing resumes.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub message: String,
    pub remaining: f32,
    pub show_countdown: bool,
}

impl Notice {
    /// A brief informational flash, e.g. "No amiibos selected."
    pub fn brief(message: &str, seconds: f32) -> Self {
        Notice {
            message: message.to_string(),
            remaining: seconds,
            show_countdown: false,
        }
    }

    /// A settling pause with a visible "Back in N seconds..." countdown.
    pub fn countdown(message: &str, seconds: f32) -> Self {
        Notice {
            message: message.to_string(),
            remaining: seconds,
            show_countdown: true,
        }
    }
}
