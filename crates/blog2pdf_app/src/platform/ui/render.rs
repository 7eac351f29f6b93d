use blog2pdf_core::{AppViewModel, BackendStatus, SaveStatus};

use super::theme::{Theme, Tone};

pub const SAVE_COMMAND: &str = ":save";
pub const QUIT_COMMAND: &str = ":quit";

/// Renders the view model as terminal lines. Purely a function of `view`.
pub fn render(view: &AppViewModel, theme: &Theme) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(theme.paint(Tone::Muted, &backend_line(&view.backend)));
    lines.push(format!(
        "{} {}",
        theme.paint(Tone::Heading, "URL:"),
        if view.url.is_empty() {
            theme.paint(Tone::Muted, "(type a URL and press Enter)")
        } else {
            view.url.clone()
        }
    ));

    let submit = if view.submit_enabled {
        "[ Convert to PDF ]".to_string()
    } else {
        theme.paint(Tone::Muted, "[ Converting... ] (input disabled)")
    };
    lines.push(submit);

    if let Some(progress) = &view.progress_message {
        lines.push(theme.paint(Tone::Progress, &format!("... {progress}")));
    }
    if let Some(error) = &view.error_message {
        lines.push(theme.paint(Tone::Error, &format!("Error: {error}")));
    }
    if let Some(success) = &view.success_message {
        lines.push(theme.paint(Tone::Success, success));
    }
    if let Some(download) = &view.download {
        lines.push(format!(
            "{} ({}) - type {} to download",
            theme.paint(Tone::Link, &download.filename),
            format_bytes(download.byte_len),
            SAVE_COMMAND
        ));
    }
    match &view.save_status {
        Some(SaveStatus::Saved(path)) => {
            lines.push(theme.paint(Tone::Success, &format!("Saved to {}", path.display())))
        }
        Some(SaveStatus::Failed(message)) => {
            lines.push(theme.paint(Tone::Error, &format!("Save failed: {message}")))
        }
        None => {}
    }

    lines
}

fn backend_line(status: &BackendStatus) -> String {
    match status {
        BackendStatus::Unknown => "Backend: checking...".to_string(),
        BackendStatus::Online { version } => format!("Backend: online (v{version})"),
        BackendStatus::Offline { reason } => format!("Backend: offline ({reason})"),
    }
}

fn format_bytes(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    let digits: String = out.chars().rev().collect();
    format!("{digits} bytes")
}
