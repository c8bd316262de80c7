//! The `coniuga quiz` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Cell, Table};

use coniuga_core::reference::ReferenceData;
use coniuga_core::traits::{LlmProvider, QuestionGenerator};
use coniuga_core::{
    AnswerFeedback, QuizFilters, Resolution, SessionController, SessionError, SessionPhase,
    SpecificTarget,
};
use coniuga_providers::config::load_config_from;
use coniuga_providers::LlmGenerator;

pub async fn execute(
    category: Option<String>,
    mood: Option<String>,
    tense: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let reference = config.reference_data()?;

    if let Some(name) = &category {
        anyhow::ensure!(
            reference.category(name).is_some(),
            "unknown category '{name}'. Run `coniuga verbs` to list them"
        );
    }

    let provider: Arc<dyn LlmProvider> = Arc::from(config.default_llm()?);
    let generator = LlmGenerator::new(provider, config.generator_config())
        .with_reference(reference.clone());

    let filters = QuizFilters {
        category,
        mood,
        tense,
    }
    .reconcile(&reference);

    let stdin = io::stdin();
    let mut console = QuizConsole::new(
        &generator,
        &reference,
        filters,
        stdin.lock(),
        io::stdout(),
    );
    console.run().await?;

    let session = console.session();
    println!(
        "\nFinal score: {} / {}",
        session.score(),
        session.attempted()
    );
    Ok(())
}

/// Line-oriented quiz loop over any reader and writer.
pub struct QuizConsole<'a, R, W> {
    generator: &'a dyn QuestionGenerator,
    reference: &'a ReferenceData,
    filters: QuizFilters,
    input: R,
    output: W,
    session: SessionController,
}

enum Choice {
    Next,
    Review,
    Specific,
    Quit,
}

impl<'a, R: BufRead, W: Write> QuizConsole<'a, R, W> {
    pub fn new(
        generator: &'a dyn QuestionGenerator,
        reference: &'a ReferenceData,
        filters: QuizFilters,
        input: R,
        output: W,
    ) -> Self {
        Self {
            generator,
            reference,
            filters,
            input,
            output,
            session: SessionController::new(),
        }
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Run until the user quits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        let outcome = self
            .session
            .request_question(self.generator, &self.filters)
            .await;
        self.report(outcome)?;

        loop {
            match self.session.phase() {
                SessionPhase::Ready => {
                    if !self.ask_answers()? {
                        return Ok(());
                    }
                    self.grade()?;
                }
                SessionPhase::Submitted | SessionPhase::Error | SessionPhase::Loading => {
                    let Some(choice) = self.menu()? else {
                        return Ok(());
                    };
                    match choice {
                        Choice::Next => self.next().await?,
                        Choice::Review => match self.session.start_review() {
                            Ok(()) => {}
                            Err(SessionError::NothingToReview) => {
                                writeln!(self.output, "Nothing to review yet.")?;
                            }
                            Err(e) => writeln!(self.output, "{e}")?,
                        },
                        Choice::Specific => {
                            let Some(target) = self.read_target()? else {
                                return Ok(());
                            };
                            let outcome =
                                self.session.request_specific(self.generator, &target).await;
                            self.report(outcome)?;
                        }
                        Choice::Quit => return Ok(()),
                    }
                }
            }
        }
    }

    async fn next(&mut self) -> Result<()> {
        let outcome = if self.session.phase() == SessionPhase::Submitted {
            self.session
                .advance_with(self.generator, &self.filters)
                .await
        } else {
            self.session
                .request_question(self.generator, &self.filters)
                .await
        };
        self.report(outcome)
    }

    fn report(&mut self, outcome: Result<Resolution, SessionError>) -> Result<()> {
        match outcome {
            Ok(Resolution::Installed) => Ok(()),
            Ok(Resolution::Discarded) => {
                tracing::debug!("response arrived for a superseded request");
                Ok(())
            }
            Err(e) => {
                writeln!(self.output, "\n{e}")?;
                Ok(())
            }
        }
    }

    /// Prompt for every person of the current question. `false` on EOF.
    fn ask_answers(&mut self) -> Result<bool> {
        let Some(question) = self.session.current_question().cloned() else {
            return Ok(true);
        };

        writeln!(
            self.output,
            "\nScore: {} / {}",
            self.session.score(),
            self.session.attempted()
        )?;
        if self.session.is_review_mode() {
            writeln!(
                self.output,
                "Review mode: {} more queued after this one",
                self.session.pending_retries()
            )?;
        }
        writeln!(
            self.output,
            "{} ({}) - {} {}  [{}]",
            question.verb, question.translation, question.mood, question.tense, question.icon_hint
        )?;

        for pair in &question.conjugations {
            write!(self.output, "  {}: ", pair.person)?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(false);
            };
            self.session.update_answer(&pair.person, &line);
        }
        Ok(true)
    }

    fn grade(&mut self) -> Result<()> {
        let submission = self.session.submit()?;
        writeln!(self.output, "{}", feedback_table(&submission.feedback))?;

        if submission.all_correct {
            writeln!(self.output, "All correct!")?;
        } else if submission.requeued {
            writeln!(self.output, "Some answers were wrong. Queued for review.")?;
        } else {
            writeln!(self.output, "Some answers were wrong.")?;
        }

        if self.session.review_finished() {
            writeln!(
                self.output,
                "Review finished: every failed question has been replayed."
            )?;
        }
        Ok(())
    }

    fn menu(&mut self) -> Result<Option<Choice>> {
        loop {
            let pending = self.session.pending_retries();
            if pending > 0 {
                write!(
                    self.output,
                    "\n[n] next  [r] review ({pending} pending)  [s] specific verb  [q] quit > "
                )?;
            } else {
                write!(self.output, "\n[n] next  [s] specific verb  [q] quit > ")?;
            }
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let choice = match line.trim().to_lowercase().as_str() {
                "" | "n" | "next" => Choice::Next,
                "r" | "review" => Choice::Review,
                "s" | "specific" => Choice::Specific,
                "q" | "quit" => Choice::Quit,
                other => {
                    writeln!(self.output, "Unknown choice '{other}'")?;
                    continue;
                }
            };
            return Ok(Some(choice));
        }
    }

    fn read_target(&mut self) -> Result<Option<SpecificTarget>> {
        let default_mood = self.reference.mood_names().next().unwrap_or_default().to_string();

        write!(self.output, "Verb: ")?;
        self.output.flush()?;
        let Some(verb) = self.read_line()? else {
            return Ok(None);
        };

        write!(self.output, "Mood [{default_mood}]: ")?;
        self.output.flush()?;
        let Some(mood) = self.read_line()? else {
            return Ok(None);
        };
        let mood = if mood.trim().is_empty() {
            default_mood
        } else {
            mood.trim().to_string()
        };

        let default_tense = self
            .reference
            .tenses_for(Some(&mood))
            .first()
            .map(|t| t.to_string())
            .unwrap_or_default();
        write!(self.output, "Tense [{default_tense}]: ")?;
        self.output.flush()?;
        let Some(tense) = self.read_line()? else {
            return Ok(None);
        };

        Ok(Some(
            SpecificTarget::new(verb.trim(), mood, tense.trim()).reconcile(self.reference),
        ))
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn feedback_table(feedback: &[AnswerFeedback]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Person", "Your answer", "Correct answer", ""]);
    for item in feedback {
        table.add_row(vec![
            Cell::new(&item.person),
            Cell::new(&item.user_answer),
            Cell::new(&item.correct_answer),
            Cell::new(if item.is_correct { "ok" } else { "wrong" }),
        ]);
    }
    table
}
