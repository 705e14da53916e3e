//! Interactive form mode
//!
//! Each stdin line is either a field edit, a command, or new text:
//!
//! ```text
//! :text <text>        replace the text field
//! :framework <name>   select spacy | hf | flair
//! :model <name>       set the model name
//! :submit             send the form (an empty line does the same)
//! :show               print the form and the last results
//! :models             list suggested models for the selected framework
//! :quit               leave
//! ```
//!
//! Any line not starting with `:` replaces the text field.

use std::io::Write;

use ner_core::{suggested_models, FormField, Framework, PredictionClient, RequestStatus};
use ner_session::{ResultRenderer, SessionState};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    Edit(FormField),
    Submit,
    Show,
    Models,
    Help,
    Quit,
}

/// Parse one input line
pub fn parse_line(line: &str) -> Result<FormCommand, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(FormCommand::Submit);
    }

    let Some(command) = line.strip_prefix(':') else {
        return Ok(FormCommand::Edit(FormField::Text(line.to_string())));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "text" | "t" => Ok(FormCommand::Edit(FormField::Text(arg.to_string()))),
        "framework" | "f" => arg
            .parse::<Framework>()
            .map(|f| FormCommand::Edit(FormField::Framework(f)))
            .map_err(|_| format!("unknown framework '{arg}', expected spacy, hf or flair")),
        "model" | "m" => {
            if arg.is_empty() {
                Err("model name missing".to_string())
            } else {
                Ok(FormCommand::Edit(FormField::ModelName(arg.to_string())))
            }
        }
        "submit" | "s" => Ok(FormCommand::Submit),
        "show" => Ok(FormCommand::Show),
        "models" => Ok(FormCommand::Models),
        "help" | "h" | "?" => Ok(FormCommand::Help),
        "quit" | "q" | "exit" => Ok(FormCommand::Quit),
        other => Err(format!("unknown command ':{other}', try :help")),
    }
}

/// Render the form fields
pub fn describe_form(session: &SessionState) -> String {
    let labels = session.labels();
    let form = session.form();
    format!(
        "{}\n  {}: {}\n  {}: {} ({})\n  {}: {}\n  {} {}: {}",
        labels.title,
        labels.text_field,
        form.text,
        labels.framework_field,
        form.framework.display_name(),
        form.framework,
        labels.model_field,
        form.model_name,
        labels.available_models,
        form.framework,
        suggested_models(form.framework).join(", "),
    )
}

/// Submit the form. The loading display goes to `progress` before the
/// request is sent; the caller renders the settled outcome.
pub async fn submit_with_progress(
    session: &mut SessionState,
    client: &dyn PredictionClient,
    progress: &mut impl Write,
) -> std::io::Result<RequestStatus> {
    crate::warn_if_unsuggested(session);
    let Some(pending) = session.begin_submit() else {
        return Ok(session.status());
    };

    write!(progress, "{}", ResultRenderer::render(session))?;
    progress.flush()?;

    let outcome = client.submit(&pending.payload).await;
    session.complete(pending.request_id, outcome);
    Ok(session.status())
}

/// Run the interactive loop on stdin until `:quit` or end of input
pub async fn run(session: &mut SessionState, client: &dyn PredictionClient) -> anyhow::Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    run_with(session, client, input, &mut std::io::stdout()).await
}

async fn run_with(
    session: &mut SessionState,
    client: &dyn PredictionClient,
    input: impl AsyncBufRead + Unpin,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    writeln!(out, "{}", describe_form(session))?;
    writeln!(
        out,
        "Type text, then press Enter on an empty line to submit. :help lists commands."
    )?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(FormCommand::Edit(field)) => session.on_field_change(field),
            Ok(FormCommand::Submit) => {
                submit_with_progress(session, client, &mut *out).await?;
                write!(out, "{}", ResultRenderer::render(session))?;
            }
            Ok(FormCommand::Show) => {
                writeln!(out, "{}", describe_form(session))?;
                if let Some(at) = session.last_completed_at() {
                    writeln!(
                        out,
                        "last request {} at {}",
                        session.status(),
                        at.format("%H:%M:%S")
                    )?;
                }
                write!(out, "{}", ResultRenderer::render(session))?;
            }
            Ok(FormCommand::Models) => {
                let framework = session.form().framework;
                writeln!(out, "{}: {}", framework, suggested_models(framework).join(", "))?;
            }
            Ok(FormCommand::Help) => writeln!(out, "{}", HELP)?,
            Ok(FormCommand::Quit) => break,
            Err(message) => eprintln!("{message}"),
        }
    }

    Ok(())
}

const HELP: &str = "\
:text <text>        replace the text field
:framework <name>   select spacy | hf | flair
:model <name>       set the model name
:submit             send the form (or press Enter on an empty line)
:show               print the form and the last results
:models             list suggested models
:quit               leave";
