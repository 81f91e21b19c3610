//! Interactive weather form: the terminal version of the location window.

use anyhow::Context;
use inquire::{InquireError, Select, Text};
use weatherapp_core::{DisplayFields, LocationQuery, UnitPreference, WeatherError, WeatherSession};

use crate::cli::{print_outcome, unit_from_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Fetch,
    Refresh,
    Units,
    History,
    Quit,
}

impl Action {
    const ALL: [Action; 5] =
        [Action::Fetch, Action::Refresh, Action::Units, Action::History, Action::Quit];

    fn label(self) -> &'static str {
        match self {
            Action::Fetch => "Fetch weather",
            Action::Refresh => "Refresh data",
            Action::Units => "Change temperature unit",
            Action::History => "Show history",
            Action::Quit => "Quit",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How a single prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer<T> {
    Value(T),
    /// Esc: leave this prompt and go back to the menu.
    Back,
    /// Ctrl-C: leave the form.
    Quit,
}

/// Map a prompt result so every prompt treats Esc and Ctrl-C alike.
fn answer<T>(result: Result<T, InquireError>) -> Result<Answer<T>, InquireError> {
    match result {
        Ok(value) => Ok(Answer::Value(value)),
        Err(InquireError::OperationCanceled) => Ok(Answer::Back),
        Err(InquireError::OperationInterrupted) => Ok(Answer::Quit),
        Err(err) => Err(err),
    }
}

pub async fn run(session: &WeatherSession, mut unit: UnitPreference) -> anyhow::Result<()> {
    for line in DisplayFields::empty().lines() {
        println!("{line}");
    }

    loop {
        println!();
        let message = format!("[{}] What next?", unit.label());
        let menu = Select::new(&message, Action::ALL.to_vec());
        let action = match answer(menu.prompt()).context("Failed to read action")? {
            Answer::Value(action) => action,
            Answer::Back | Answer::Quit => return Ok(()),
        };

        let result = match action {
            Action::Fetch => match read_query()? {
                Answer::Value(query) => session.fetch(query, unit).await,
                Answer::Back => continue,
                Answer::Quit => return Ok(()),
            },
            Action::Refresh => session.refresh(unit).await,
            Action::Units => {
                match read_unit(unit)? {
                    Answer::Value(selected) => unit = selected,
                    Answer::Back => {}
                    Answer::Quit => return Ok(()),
                }
                continue;
            }
            Action::History => {
                print_history(&session.history());
                continue;
            }
            Action::Quit => return Ok(()),
        };

        match result {
            Ok(outcome) => {
                println!();
                print_outcome(&outcome);
            }
            Err(err) => show_error(&err),
        }
    }
}

/// Prompt for city, country and ZIP.
fn read_query() -> anyhow::Result<Answer<LocationQuery>> {
    let mut fields = Vec::with_capacity(3);
    for label in ["City name:", "Country code (optional):", "ZIP code (optional):"] {
        match answer(Text::new(label).prompt()).context("Failed to read location")? {
            Answer::Value(value) => fields.push(value),
            Answer::Back => return Ok(Answer::Back),
            Answer::Quit => return Ok(Answer::Quit),
        }
    }

    let mut fields = fields.into_iter();
    Ok(Answer::Value(LocationQuery::new(fields.next(), fields.next(), fields.next())))
}

fn read_unit(current: UnitPreference) -> anyhow::Result<Answer<UnitPreference>> {
    let labels: Vec<&str> = UnitPreference::all().iter().map(UnitPreference::label).collect();
    let start = UnitPreference::all().iter().position(|u| *u == current).unwrap_or(0);
    let picker = Select::new("Temperature unit:", labels).with_starting_cursor(start);

    let selected = answer(picker.prompt()).context("Failed to read unit selection")?;
    Ok(match selected {
        Answer::Value(label) => Answer::Value(unit_from_label(label)),
        Answer::Back => Answer::Back,
        Answer::Quit => Answer::Quit,
    })
}

fn print_history(lines: &[String]) {
    if lines.is_empty() {
        println!("No weather fetched yet.");
        return;
    }
    for line in lines {
        println!("{line}");
    }
}

fn show_error(err: &WeatherError) {
    tracing::debug!(error = %err, "fetch failed");
    eprintln!("{}: {}", err.title(), err.user_message());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_goes_back_and_interrupt_quits() {
        assert_eq!(answer(Ok::<_, InquireError>("Paris")).unwrap(), Answer::Value("Paris"));
        assert_eq!(answer::<String>(Err(InquireError::OperationCanceled)).unwrap(), Answer::Back);
        assert_eq!(
            answer::<String>(Err(InquireError::OperationInterrupted)).unwrap(),
            Answer::Quit
        );
    }

    #[test]
    fn other_prompt_failures_propagate() {
        let err = answer::<String>(Err(InquireError::NotTTY)).unwrap_err();
        assert!(matches!(err, InquireError::NotTTY));
    }
}
