//! Render functions. Each takes a view model and returns the text to print.

mod chat;
mod menu;
mod progress;
mod question;
mod results;
mod reveal;

pub use chat::{render_chat_reply, render_chat_welcome};
pub use menu::{MenuEntry, menu_entries, render_menu};
pub use progress::render_progress;
pub use question::render_question;
pub use results::render_results;
pub use reveal::render_reveal;

const RULE: &str = "────────────────────────────────────────";
