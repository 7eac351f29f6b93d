use std::io::{self, BufRead, Write};
use std::thread;

use anyhow::{bail, Context};
use blog2pdf_core::{AppViewModel, Msg, Phase, SaveStatus};
use engine_logging::engine_debug;

use super::session::Session;
use super::ui::{self, Theme, QUIT_COMMAND, SAVE_COMMAND};
use crate::config::AppConfig;

/// Reads commands from stdin and renders every state change until `:quit`
/// or end of input.
pub fn run_interactive(config: &AppConfig) -> anyhow::Result<()> {
    let theme = resolve_theme(config)?;
    let mut session = Session::new(config).context("failed to start session")?;

    let input_tx = session.sender();
    thread::Builder::new()
        .name("blog2pdf-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let sent = input_msgs(&line)
                    .into_iter()
                    .all(|msg| input_tx.send(msg).is_ok());
                if !sent || line == QUIT_COMMAND {
                    return;
                }
            }
            let _ = input_tx.send(Msg::ViewClosed);
        })
        .context("failed to spawn input thread")?;

    let mut stdout = io::stdout();
    if let Some(view) = session.dispatch(Msg::Started) {
        print_view(&mut stdout, &view, theme)?;
    }
    while let Some(msg) = session.next_msg() {
        if msg == Msg::ViewClosed {
            session.close();
            break;
        }
        if let Some(view) = session.dispatch(msg) {
            print_view(&mut stdout, &view, theme)?;
        }
    }
    engine_debug!("interactive session ended");
    Ok(())
}

/// Converts `url` once, saves the PDF and exits. Fails when the submission
/// ends in an error.
pub fn run_once(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let theme = resolve_theme(config)?;
    let mut session = Session::new(config).context("failed to start session")?;
    let mut stdout = io::stdout();

    session.dispatch(Msg::InputChanged(url.to_string()));
    if let Some(view) = session.dispatch(Msg::SubmitClicked) {
        print_view(&mut stdout, &view, theme)?;
    }
    for view in session.run_until_settled(config.settle_timeout()) {
        print_view(&mut stdout, &view, theme)?;
    }

    let view = session.state().view();
    let outcome = match view.phase {
        Phase::Done => {
            let saved = session.dispatch(Msg::DownloadClicked);
            if let Some(view) = &saved {
                print_view(&mut stdout, view, theme)?;
            }
            match saved.and_then(|view| view.save_status) {
                Some(SaveStatus::Saved(_)) => Ok(()),
                Some(SaveStatus::Failed(message)) => Err(anyhow::anyhow!(message)),
                None => Err(anyhow::anyhow!("the converted PDF was not saved")),
            }
        }
        Phase::Error => Err(anyhow::anyhow!(view
            .error_message
            .unwrap_or_else(|| "conversion failed".to_string()))),
        phase => Err(anyhow::anyhow!(
            "conversion did not finish in time (stuck in {phase:?})"
        )),
    };
    session.close();
    outcome
}

fn input_msgs(line: &str) -> Vec<Msg> {
    match line {
        SAVE_COMMAND => vec![Msg::DownloadClicked],
        QUIT_COMMAND => vec![Msg::ViewClosed],
        url => vec![Msg::InputChanged(url.to_string()), Msg::SubmitClicked],
    }
}

fn resolve_theme(config: &AppConfig) -> anyhow::Result<&'static Theme> {
    match Theme::by_name(&config.theme) {
        Some(theme) => Ok(theme),
        None => bail!("unknown theme {:?}", config.theme),
    }
}

fn print_view(out: &mut impl Write, view: &AppViewModel, theme: &Theme) -> io::Result<()> {
    for line in ui::render(view, theme) {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    out.flush()
}
