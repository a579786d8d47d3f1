//! Wizard command implementation
//!
//! Line-based rendition of the four-step wizard. Each stage prompts for its
//! fields; an empty answer keeps the current value, so going back or retrying
//! after a failed generation only needs Enter.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Result, anyhow};
use chrono::Local;
use tokio::time::{Instant, interval_at};

use super::common::write_image;
use crate::progress::{GENERATION_MESSAGE_INTERVAL, generation_message};
use crate::render;
use crate::{AdGenerator, AdcraftError, FormField, Stage, StepProgress, WizardSession};

/// Answer that returns from the audience stage to the product stage.
pub const BACK_COMMAND: &str = ":back";

const REVIEW_PROMPT: &str = "[n] new ad  [s <path>] save image  [q] quit > ";

enum Answer {
    Value(String),
    Keep,
    Back,
    EndOfInput,
}

enum ReviewChoice<'a> {
    NewAd,
    Save(&'a str),
    Quit,
    Unknown(&'a str),
}

impl<'a> ReviewChoice<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line.split_once(char::is_whitespace) {
            Some(("s", path)) if !path.trim().is_empty() => Self::Save(path.trim()),
            _ => match line {
                "n" => Self::NewAd,
                "q" => Self::Quit,
                other => Self::Unknown(other),
            },
        }
    }
}

/// Execute the wizard command on the process's stdin and stdout.
pub async fn execute_wizard_command<G: AdGenerator>(generator: G) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = WizardSession::new(generator);
    run_wizard(&mut session, &mut stdin.lock(), &mut stdout.lock()).await
}

/// Drive `session` from line input until the user quits or input ends.
pub async fn run_wizard<G, R, W>(
    session: &mut WizardSession<G>,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    G: AdGenerator,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{}", render::TITLE)?;

    loop {
        let stage = session.stage();
        {
            let view = session.view();
            writeln!(out)?;
            writeln!(out, "{}", render::stepper(&view.progress))?;
            if let Some(message) = view.error {
                writeln!(out, "{}", render::error_banner(message))?;
            }
        }

        match stage {
            Stage::CollectingProduct | Stage::CollectingAudience => {
                if !collect_fields(session, stage, input, out)? {
                    return Ok(());
                }
                if session.stage() != stage {
                    continue;
                }
                if !session.controller().can_advance() {
                    writeln!(out, "{}", render::guard_hint(stage))?;
                    continue;
                }
                if stage == Stage::CollectingAudience {
                    generate_with_progress(session, out).await?;
                } else {
                    session.advance().await.map_err(AdcraftError::from)?;
                }
            }
            Stage::Reviewing => {
                if !review(session, input, out)? {
                    return Ok(());
                }
            }
            Stage::Generating => return Err(anyhow!("wizard is still generating")),
        }
    }
}

/// Prompt for each field of `stage`. Returns false when input has ended.
fn collect_fields<G, R, W>(
    session: &mut WizardSession<G>,
    stage: Stage,
    input: &mut R,
    out: &mut W,
) -> Result<bool>
where
    G: AdGenerator,
    R: BufRead,
    W: Write,
{
    for &field in stage.fields() {
        let current = session.controller().form().get(field).to_string();
        match prompt(field, &current, input, out)? {
            Answer::Value(value) => session
                .set_field(field, value)
                .map_err(AdcraftError::from)?,
            Answer::Keep => {}
            Answer::Back if stage == Stage::CollectingAudience => {
                session.back().map_err(AdcraftError::from)?;
                return Ok(true);
            }
            Answer::Back => writeln!(out, "  Already on the first step.")?,
            Answer::EndOfInput => return Ok(false),
        }
    }
    Ok(true)
}

fn prompt<R: BufRead, W: Write>(
    field: FormField,
    current: &str,
    input: &mut R,
    out: &mut W,
) -> Result<Answer> {
    if current.trim().is_empty() {
        write!(out, "{}: ", field.label())?;
    } else {
        write!(out, "{} [{current}]: ", field.label())?;
    }
    out.flush()?;

    let Some(line) = read_line(input)? else {
        writeln!(out)?;
        return Ok(Answer::EndOfInput);
    };
    let answer = match line.trim() {
        BACK_COMMAND => Answer::Back,
        "" => Answer::Keep,
        _ => Answer::Value(line),
    };
    Ok(answer)
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Run the generating stage, printing a rotating status line until it resolves.
async fn generate_with_progress<G, W>(session: &mut WizardSession<G>, out: &mut W) -> Result<Stage>
where
    G: AdGenerator,
    W: Write,
{
    let generating = StepProgress {
        current: Stage::Generating.index(),
        ..session.controller().progress()
    };
    writeln!(out)?;
    writeln!(out, "{}", render::stepper(&generating))?;
    writeln!(out, "  {}", generation_message(0))?;
    out.flush()?;

    let mut ticker = interval_at(
        Instant::now() + GENERATION_MESSAGE_INTERVAL,
        GENERATION_MESSAGE_INTERVAL,
    );
    let mut tick = 1;
    let advance = session.advance();
    tokio::pin!(advance);

    loop {
        tokio::select! {
            biased;
            result = &mut advance => return Ok(result.map_err(AdcraftError::from)?),
            _ = ticker.tick() => {
                writeln!(out, "  {}", generation_message(tick))?;
                out.flush()?;
                tick += 1;
            }
        }
    }
}

/// Show the generated ad and handle review choices. Returns false on quit.
fn review<G, R, W>(session: &mut WizardSession<G>, input: &mut R, out: &mut W) -> Result<bool>
where
    G: AdGenerator,
    R: BufRead,
    W: Write,
{
    let Some(ad) = session.view().ad.cloned() else {
        return Err(anyhow!("review stage has no ad"));
    };
    writeln!(out, "{}", render::review(&ad, &Local::now()))?;

    loop {
        write!(out, "{REVIEW_PROMPT}")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            writeln!(out)?;
            return Ok(false);
        };

        match ReviewChoice::parse(&line) {
            ReviewChoice::NewAd => {
                session.reset().map_err(AdcraftError::from)?;
                return Ok(true);
            }
            ReviewChoice::Save(path) => match write_image(&ad.image_url, Path::new(path)) {
                Ok(bytes) => writeln!(out, "  Saved {bytes} bytes to {path}")?,
                Err(err) => writeln!(out, "  ✗ Could not save image: {err}")?,
            },
            ReviewChoice::Quit => return Ok(false),
            ReviewChoice::Unknown("") => {}
            ReviewChoice::Unknown(choice) => {
                writeln!(out, "  Unknown choice '{choice}'. Use n, s <path> or q.")?;
            }
        }
    }
}
