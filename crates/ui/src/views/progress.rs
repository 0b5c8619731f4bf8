use crate::vm::ProgressVm;

#[must_use]
pub fn render_progress(vm: &ProgressVm) -> String {
    if vm.is_empty() {
        return "No practice sessions yet. Finish a practice to see your progress.".to_string();
    }
    let mut lines = vec![
        "Your progress".to_string(),
        super::RULE.to_string(),
        format!("Sessions:  {}", vm.total_sessions),
        format!("Questions: {}", vm.total_questions),
        format!("Correct:   {}", vm.total_correct),
        format!("Average:   {}", vm.average_str),
    ];
    if let Some(last) = &vm.last_session_str {
        lines.push(format!("Last:      {last}"));
    }
    lines.push(String::new());
    for row in &vm.domains {
        lines.push(format!(
            "  {:<22} {:>3}/{:<3} {}",
            row.label, row.correct, row.total, row.percentage_str
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmp_core::ProgressReport;

    #[test]
    fn empty_history_gets_a_hint() {
        let text = render_progress(&ProgressVm::from(&ProgressReport::empty()));
        assert!(text.starts_with("No practice sessions yet"));
    }
}
