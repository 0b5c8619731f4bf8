use crate::vm::RevealVm;

#[must_use]
pub fn render_reveal(vm: &RevealVm) -> String {
    let verdict = if vm.is_correct {
        format!("Correct! You chose {}.", vm.selected)
    } else {
        format!(
            "Incorrect. You chose {}; the answer is {}) {}.",
            vm.selected, vm.correct, vm.correct_text
        )
    };
    let mut lines = vec![verdict];
    if !vm.explanation.trim().is_empty() {
        lines.push(String::new());
        lines.push(format!("Explanation: {}", vm.explanation));
    }
    lines.push(String::new());
    lines.push(format!("Answered so far: {}", vm.answered));
    lines.join("\n")
}
