use pmp_core::model::Question;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub letter: char,
    pub text: String,
}

/// A question waiting for an answer. Correctness is not exposed here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    /// One-based position within the session.
    pub number: usize,
    pub domain_label: &'static str,
    pub text: String,
    pub options: Vec<OptionVm>,
}

impl QuestionVm {
    #[must_use]
    pub fn new(question: &Question, number: usize) -> Self {
        let options = question
            .options()
            .iter()
            .enumerate()
            .filter_map(|(index, option)| {
                let letter = question.letter_for(index).ok()?;
                Some(OptionVm {
                    letter: letter.as_char(),
                    text: option.text.clone(),
                })
            })
            .collect();
        Self {
            number,
            domain_label: question.domain().label(),
            text: question.question_text().to_string(),
            options,
        }
    }

    /// Map a typed letter back to an option index.
    #[must_use]
    pub fn index_for(&self, input: &str) -> Option<usize> {
        let mut chars = input.trim().chars();
        let c = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() {
            return None;
        }
        self.options.iter().position(|option| option.letter == c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmp_core::model::{DomainTag, QuestionOption};

    fn question() -> Question {
        Question::new(
            "Who approves the charter?",
            vec![
                QuestionOption::new("The team", false),
                QuestionOption::new("The sponsor", true),
                QuestionOption::new("The vendor", false),
            ],
            "The sponsor authorizes the project.",
            DomainTag::Entorno,
        )
        .unwrap()
    }

    #[test]
    fn letters_follow_option_order() {
        let vm = QuestionVm::new(&question(), 3);
        let letters: Vec<char> = vm.options.iter().map(|o| o.letter).collect();
        assert_eq!(letters, vec!['A', 'B', 'C']);
        assert_eq!(vm.domain_label, "Business Environment");
        assert_eq!(vm.number, 3);
    }

    #[test]
    fn typed_letter_maps_to_index() {
        let vm = QuestionVm::new(&question(), 1);
        assert_eq!(vm.index_for("b"), Some(1));
        assert_eq!(vm.index_for(" C "), Some(2));
        assert_eq!(vm.index_for("D"), None);
        assert_eq!(vm.index_for("AB"), None);
        assert_eq!(vm.index_for(""), None);
    }
}
