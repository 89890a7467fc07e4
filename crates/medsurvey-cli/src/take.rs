//! Line-based survey taking on the terminal.

use medsurvey_client::ApiClient;
use medsurvey_core::models::question::{Question, QuestionType, RATING_MAX, RATING_MIN};
use medsurvey_session::{SessionController, SessionSnapshot};
use uuid::Uuid;

use crate::prompt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Next,
    Previous,
    Submit,
    Quit,
    Answer(String),
}

pub fn parse_input(line: &str) -> Input {
    match line.trim() {
        ":next" | ":n" => Input::Next,
        ":prev" | ":p" => Input::Previous,
        ":submit" | ":s" => Input::Submit,
        ":quit" | ":q" => Input::Quit,
        _ => Input::Answer(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

/// Turn raw input into the stored answer text for `question`. Option
/// questions also take the 1-based option number.
pub fn normalize_answer(question: &Question, raw: &str) -> Result<String, String> {
    let candidate = match question.question_type {
        QuestionType::OptionSelection => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| question.options.get(i))
            .cloned()
            .unwrap_or_else(|| raw.trim().to_string()),
        QuestionType::Rating => raw.trim().to_string(),
        QuestionType::FreeText => raw.to_string(),
    };

    if question.accepts(&candidate) {
        Ok(candidate)
    } else {
        Err(match question.question_type {
            QuestionType::FreeText => "Please type an answer.".to_string(),
            QuestionType::Rating => format!("Enter a number from {RATING_MIN} to {RATING_MAX}."),
            QuestionType::OptionSelection => {
                format!("Choose one of 1-{}.", question.options.len())
            }
        })
    }
}

fn render(snapshot: &SessionSnapshot) {
    let Some(question) = &snapshot.question else {
        return;
    };
    println!();
    println!(
        "[{}/{}] {:.0}% complete",
        snapshot.index + 1,
        snapshot.len,
        snapshot.progress * 100.0
    );
    println!("{}", question.prompt);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    if let Some(answer) = &snapshot.answer {
        println!("  current answer: {answer}");
    }
    let action = if snapshot.can_submit {
        ":submit"
    } else {
        ":next"
    };
    println!("(type an answer, {action}, :prev or :quit)");
}

pub async fn run(client: &ApiClient, survey_id: Uuid) -> eyre::Result<()> {
    let mut session = SessionController::open(client, survey_id)
        .await
        .map_err(|e| eyre::eyre!(e.user_message()))?;

    if session.cursor().is_empty() {
        println!("This survey has no questions.");
        return Ok(());
    }

    loop {
        render(&session.snapshot());

        let line = prompt::line(">").await?;
        match parse_input(&line) {
            Input::Next => {
                if !session.on_next() {
                    if session.can_submit() {
                        println!("This is the last question. Use :submit.");
                    } else {
                        println!("Answer this question first.");
                    }
                }
            }
            Input::Previous => {
                session.on_previous();
            }
            Input::Submit => match session.on_submit(client).await {
                Ok(receipt) => {
                    println!("Thank you! Submitted as attempt {}.", receipt.attempt_id);
                    break;
                }
                Err(e) => println!("{}", e.user_message()),
            },
            Input::Quit => {
                println!("Leaving without submitting.");
                return Ok(());
            }
            Input::Answer(raw) => {
                let Some(question) = session.current_question() else {
                    continue;
                };
                match normalize_answer(question, &raw) {
                    Ok(answer) => session.on_answer_entered(answer),
                    Err(hint) => println!("{hint}"),
                }
            }
        }
    }

    Ok(())
}
