use crate::vm::ResultsVm;

#[must_use]
pub fn render_results(vm: &ResultsVm) -> String {
    let mut lines = vec![
        "Practice results".to_string(),
        super::RULE.to_string(),
        format!(
            "Overall: {}/{} ({})",
            vm.correct, vm.answered, vm.overall_str
        ),
        String::new(),
    ];
    for card in &vm.domains {
        lines.push(format!(
            "  {:<22} {:>3}/{:<3} {}",
            card.label, card.correct, card.total, card.percentage_str
        ));
    }
    lines.push(String::new());
    for row in &vm.answers {
        let mark = if row.is_correct { "✓" } else { "✗" };
        lines.push(format!(
            "  {mark} {}. {} (you: {}, answer: {})",
            row.number, row.question, row.selected, row.correct
        ));
    }
    if let Some(warning) = &vm.warning {
        lines.push(String::new());
        lines.push(format!("Warning: {warning}"));
    }
    lines.join("\n")
}
