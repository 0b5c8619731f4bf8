//! Interactive terminal loop. Routing happens here by switching on `QuizState`;
//! the views themselves only render.

use std::io::Write as _;

use pmp_core::model::DomainSelection;
use services::{AppServices, ChatError, Principle, QuizError, QuizState};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, error};
use ui::views::{
    render_chat_reply, render_chat_welcome, render_menu, render_progress, render_question,
    render_results, render_reveal,
};
use ui::vm::{ProgressVm, QuestionVm, ResultsVm, RevealVm};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

enum Flow {
    Continue,
    Quit,
}

pub struct Console {
    services: AppServices,
    input: Lines<BufReader<Stdin>>,
    selection: DomainSelection,
    question: Option<QuestionVm>,
}

impl Console {
    #[must_use]
    pub fn new(services: AppServices) -> Self {
        Self {
            services,
            input: BufReader::new(tokio::io::stdin()).lines(),
            selection: DomainSelection::Random,
            question: None,
        }
    }

    /// Run until the user quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Io` when the terminal cannot be read or written.
    pub async fn run(mut self) -> Result<(), ConsoleError> {
        println!("PMP exam practice");
        loop {
            let state = self.services.quiz().state().await;
            debug!(%state, "console step");
            let flow = match state {
                QuizState::Unauthenticated => self.logged_out().await?,
                QuizState::Idle | QuizState::Finished => self.main_menu().await?,
                QuizState::AwaitingAnswer => self.awaiting_answer().await?,
                QuizState::AnswerRevealed => self.answer_revealed().await?,
            };
            if matches!(flow, Flow::Quit) {
                return Ok(());
            }
        }
    }

    async fn prompt(&mut self, label: &str) -> Result<Option<String>, ConsoleError> {
        print!("{label}> ");
        std::io::stdout().flush()?;
        Ok(self
            .input
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    async fn choice(&mut self, state: QuizState) -> Result<Option<char>, ConsoleError> {
        let email = self.services.quiz().current_user().await.map(|u| u.email);
        println!();
        println!("{}", render_menu(state, email.as_deref()));
        Ok(self
            .prompt("")
            .await?
            .and_then(|line| line.chars().next())
            .map(|c| c.to_ascii_lowercase()))
    }

    // ─── screens ───────────────────────────────────────────────────────────────

    async fn logged_out(&mut self) -> Result<Flow, ConsoleError> {
        let Some(key) = self.choice(QuizState::Unauthenticated).await? else {
            return Ok(Flow::Quit);
        };
        let signup = match key {
            'l' => false,
            's' => true,
            'q' => return Ok(Flow::Quit),
            _ => return Ok(Flow::Continue),
        };
        let Some(email) = self.prompt("email").await? else {
            return Ok(Flow::Quit);
        };
        let Some(password) = self.prompt("password").await? else {
            return Ok(Flow::Quit);
        };
        let quiz = self.services.quiz();
        let result = if signup {
            quiz.signup(&email, &password).await
        } else {
            quiz.login(&email, &password).await
        };
        match result {
            Ok(user) => println!("Welcome, {}!", user.email),
            Err(err) => report(&err),
        }
        Ok(Flow::Continue)
    }

    async fn main_menu(&mut self) -> Result<Flow, ConsoleError> {
        let Some(key) = self.choice(QuizState::Idle).await? else {
            return Ok(Flow::Quit);
        };
        match key {
            'p' => self.start_practice().await?,
            'c' => self.chat().await?,
            'g' => self.progress().await,
            'o' => {
                self.services.logout().await;
                println!("Logged out.");
            }
            'q' => return Ok(Flow::Quit),
            _ => {}
        }
        Ok(Flow::Continue)
    }

    async fn start_practice(&mut self) -> Result<(), ConsoleError> {
        let Some(raw) = self
            .prompt("domain [personas/proceso/entorno/aleatorio]")
            .await?
        else {
            return Ok(());
        };
        let raw = if raw.is_empty() { "aleatorio" } else { raw.as_str() };
        let selection = match raw.parse::<DomainSelection>() {
            Ok(selection) => selection,
            Err(err) => {
                println!("{err}");
                return Ok(());
            }
        };
        self.selection = selection;
        match self.services.quiz().start_practice(selection).await {
            Ok(question) => self.show_question(&question, 1),
            Err(err) => report(&err),
        }
        Ok(())
    }

    async fn awaiting_answer(&mut self) -> Result<Flow, ConsoleError> {
        let Some(vm) = self.question.clone() else {
            // No rendered question to answer; leave the practice.
            self.services.quiz().return_to_menu().await;
            return Ok(Flow::Continue);
        };
        let last = vm.options.last().map_or('A', |o| o.letter);
        let Some(line) = self.prompt(&format!("answer A-{last}, or m for menu")).await? else {
            return Ok(Flow::Quit);
        };
        if line.eq_ignore_ascii_case("m") {
            self.leave_practice().await;
            return Ok(Flow::Continue);
        }
        let Some(index) = vm.index_for(&line) else {
            println!("Pick one of the listed letters.");
            return Ok(Flow::Continue);
        };
        match self.services.quiz().submit_answer(index) {
            Ok(outcome) => println!("{}", render_reveal(&RevealVm::from(&outcome))),
            Err(err) => report(&err),
        }
        Ok(Flow::Continue)
    }

    async fn answer_revealed(&mut self) -> Result<Flow, ConsoleError> {
        let Some(key) = self.choice(QuizState::AnswerRevealed).await? else {
            return Ok(Flow::Quit);
        };
        let quiz = self.services.quiz();
        match key {
            'n' => match quiz.next_question(self.selection).await {
                Ok(question) => {
                    let number = self.question.as_ref().map_or(1, |vm| vm.number + 1);
                    self.show_question(&question, number);
                }
                Err(err) => report(&err),
            },
            'f' => match quiz.finish_practice().await {
                Ok(outcome) => {
                    self.question = None;
                    println!("{}", render_results(&ResultsVm::from(&outcome)));
                }
                Err(err) => report(&err),
            },
            'm' => self.leave_practice().await,
            _ => {}
        }
        Ok(Flow::Continue)
    }

    async fn progress(&mut self) {
        match self.services.progress().load().await {
            Ok(report) => println!("{}", render_progress(&ProgressVm::from(&report))),
            Err(err) => report(&err),
        }
    }

    async fn chat(&mut self) -> Result<(), ConsoleError> {
        let chat = self.services.chat();
        let mut principle: Option<Principle> = None;
        println!("{}", render_chat_welcome(None));
        while let Some(line) = self.prompt("you").await? {
            match line.as_str() {
                "/back" => break,
                "/clear" => {
                    chat.clear_history();
                    continue;
                }
                "/principle" => {
                    let Some(picked) = self.read_principle().await? else {
                        continue;
                    };
                    chat.clear_history();
                    println!("{}", render_chat_welcome(Some(&picked)));
                    principle = Some(picked);
                    continue;
                }
                "/general" => {
                    chat.clear_history();
                    principle = None;
                    println!("{}", render_chat_welcome(None));
                    continue;
                }
                _ => {}
            }
            let reply = match &principle {
                Some(principle) => chat.ask_about_principle(principle, &line).await,
                None => chat.send_message(&line).await,
            };
            match reply {
                Ok(reply) => println!("{}", render_chat_reply(&reply)),
                Err(ChatError::EmptyMessage) => {}
                Err(ChatError::AuthRequired) => {
                    println!("Your session expired. Please log in again.");
                    self.services.logout().await;
                    break;
                }
                Err(err) => println!("{err}"),
            }
        }
        Ok(())
    }

    /// Ask for the principle a chat should focus on.
    async fn read_principle(&mut self) -> Result<Option<Principle>, ConsoleError> {
        let Some(raw) = self.prompt("principle number (1-12)").await? else {
            return Ok(None);
        };
        let Some(number) = parse_principle_number(&raw) else {
            println!("Principles are numbered 1 to 12.");
            return Ok(None);
        };
        let Some(title) = self.prompt("title").await?.filter(|t| !t.is_empty()) else {
            println!("A principle needs a title.");
            return Ok(None);
        };
        let description = self.prompt("description").await?.unwrap_or_default();
        Ok(Some(Principle::new(number, title, description)))
    }

    // ─── helpers ───────────────────────────────────────────────────────────────

    fn show_question(&mut self, question: &pmp_core::model::Question, number: usize) {
        let vm = QuestionVm::new(question, number);
        println!();
        println!("{}", render_question(&vm));
        self.question = Some(vm);
    }

    async fn leave_practice(&mut self) {
        self.question = None;
        self.services.quiz().return_to_menu().await;
    }
}

/// PMBOK 7 lists twelve principles.
fn parse_principle_number(raw: &str) -> Option<u8> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|n| (1..=12).contains(n))
}

fn report(err: &QuizError) {
    match err {
        QuizError::AuthRequired => println!("Your session expired. Please log in again."),
        QuizError::Busy => {}
        QuizError::Unexpected(_) => {
            error!(error = %err, "unexpected quiz error");
            println!("Something went wrong. Please try again.");
        }
        other => println!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principle_numbers_are_one_to_twelve() {
        assert_eq!(parse_principle_number(" 3 "), Some(3));
        assert_eq!(parse_principle_number("12"), Some(12));
        assert_eq!(parse_principle_number("0"), None);
        assert_eq!(parse_principle_number("13"), None);
        assert_eq!(parse_principle_number("three"), None);
    }
}
