use services::QuizState;

/// One selectable line of a menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub key: char,
    pub label: &'static str,
}

const fn entry(key: char, label: &'static str) -> MenuEntry {
    MenuEntry { key, label }
}

/// Entries offered in `state`.
#[must_use]
pub fn menu_entries(state: QuizState) -> &'static [MenuEntry] {
    const LOGGED_OUT: &[MenuEntry] = &[entry('l', "Log in"), entry('s', "Sign up"), entry('q', "Quit")];
    const MAIN: &[MenuEntry] = &[
        entry('p', "Practice questions"),
        entry('c', "Chat with the study assistant"),
        entry('g', "View progress"),
        entry('o', "Log out"),
        entry('q', "Quit"),
    ];
    const AWAITING: &[MenuEntry] = &[entry('m', "Back to menu (discard session)")];
    const REVEALED: &[MenuEntry] = &[
        entry('n', "Next question"),
        entry('f', "Finish practice"),
        entry('m', "Back to menu (discard session)"),
    ];
    match state {
        QuizState::Unauthenticated => LOGGED_OUT,
        QuizState::Idle | QuizState::Finished => MAIN,
        QuizState::AwaitingAnswer => AWAITING,
        QuizState::AnswerRevealed => REVEALED,
    }
}

#[must_use]
pub fn render_menu(state: QuizState, email: Option<&str>) -> String {
    let mut lines = Vec::new();
    if let Some(email) = email {
        lines.push(format!("Logged in as {email}"));
    }
    lines.extend(
        menu_entries(state)
            .iter()
            .map(|entry| format!("  [{}] {}", entry.key, entry.label)),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_is_offered_only_after_an_answer() {
        let has_finish = |state| menu_entries(state).iter().any(|e| e.key == 'f');
        assert!(has_finish(QuizState::AnswerRevealed));
        assert!(!has_finish(QuizState::AwaitingAnswer));
        assert!(!has_finish(QuizState::Idle));
    }

    #[test]
    fn logged_out_menu_has_no_practice() {
        let text = render_menu(QuizState::Unauthenticated, None);
        assert!(text.contains("[l] Log in"));
        assert!(!text.contains("Practice"));
    }
}
