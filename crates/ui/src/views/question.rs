use crate::vm::QuestionVm;

#[must_use]
pub fn render_question(vm: &QuestionVm) -> String {
    let mut lines = vec![
        format!("Question {} · {}", vm.number, vm.domain_label),
        super::RULE.to_string(),
        vm.text.clone(),
        String::new(),
    ];
    lines.extend(
        vm.options
            .iter()
            .map(|option| format!("  {}) {}", option.letter, option.text)),
    );
    lines.join("\n")
}
