mod progress_vm;
mod question_vm;
mod results_vm;
mod reveal_vm;
mod time_fmt;

pub use progress_vm::{ProgressDomainVm, ProgressVm};
pub use question_vm::{OptionVm, QuestionVm};
pub use results_vm::{AnswerRowVm, DomainCardVm, ResultsVm};
pub use reveal_vm::RevealVm;
pub use time_fmt::{format_datetime, format_percentage};
