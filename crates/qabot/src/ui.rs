//! Terminal presentation
//!
//! Every line the bot prints goes through here so colored and plain output
//! carry the same text.

use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ui {
    use_color: bool,
}

impl Ui {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// No colors; used for tests and piped output
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// A line spoken by the bot
    pub fn bot(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "Bot:".bright_cyan().bold(), message)
        } else {
            format!("Bot: {}", message)
        }
    }

    pub fn you_prompt(&self) -> String {
        if self.use_color {
            format!("{} ", "You:".bright_green().bold())
        } else {
            "You: ".to_string()
        }
    }

    pub fn teach_prompt(&self) -> String {
        let text = "Type the answer or \"skip\" to skip:";
        if self.use_color {
            format!("{} ", text.bright_magenta())
        } else {
            format!("{} ", text)
        }
    }

    pub fn error(&self, message: &str) -> String {
        if self.use_color {
            format!("{} {}", "Error:".red().bold(), message)
        } else {
            format!("Error: {}", message)
        }
    }

    pub fn question(&self, text: &str) -> String {
        if self.use_color {
            text.bright_white().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.use_color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}
