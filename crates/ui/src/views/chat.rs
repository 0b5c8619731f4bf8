use services::Principle;

#[must_use]
pub fn render_chat_welcome(principle: Option<&Principle>) -> String {
    match principle {
        Some(principle) => services::welcome_message(principle),
        None => "Ask the study assistant anything about the PMP exam. \
                 Type /principle to focus on one PMBOK principle, /clear to start \
                 over, or /back to return to the menu."
            .to_string(),
    }
}

#[must_use]
pub fn render_chat_reply(reply: &str) -> String {
    format!("Assistant: {reply}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principle_welcome_names_it() {
        let principle = Principle::new(6, "Leadership", "Demonstrate leadership behaviors.");
        let text = render_chat_welcome(Some(&principle));
        assert!(text.starts_with("Welcome to the chat about Principle 6!"));
        assert!(text.contains("Demonstrate leadership behaviors."));
    }

    #[test]
    fn general_welcome_lists_commands() {
        let text = render_chat_welcome(None);
        assert!(text.contains("/principle"));
        assert!(text.contains("/back"));
    }
}
