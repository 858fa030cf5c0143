use checker_core::{AppViewModel, PreviewView, ResultView, UiState};

/// Turns a view model into the lines printed after each change.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![format!("[{}]", state_label(view.ui_state))];

    lines.push(match &view.preview {
        PreviewView::Placeholder(text) => format!("Preview: {text}"),
        PreviewView::Decoding { file_name } => format!("Preview: {file_name}"),
        PreviewView::Image {
            file_name,
            width,
            height,
        } => format!("Preview: {file_name} ({width}x{height})"),
        PreviewView::Unavailable { file_name, message } => {
            format!("Preview: {file_name} (Preview unavailable: {message})")
        }
    });

    lines.push(if view.submit_enabled {
        format!("Button: [{}]", view.submit_label)
    } else {
        format!("Button: [{}] (disabled)", view.submit_label)
    });

    match &view.result {
        ResultView::Neutral => {}
        ResultView::Error(message) => lines.push(format!("Result (error): {message}")),
        ResultView::Verdict(verdict) => {
            lines.push(format!(
                "Result ({}) for {}:",
                verdict.verdict.css_class(),
                verdict.file_name
            ));
            lines.push(format!("  Status: {}", verdict.status));
            lines.push(format!("  Reason: {}", verdict.reason));
            lines.push(format!("  Confidence: {}", verdict.confidence));
            lines.extend(verdict.details.lines().map(|line| format!("  {line}")));
        }
    }

    match &view.server_status {
        Some(Ok(status)) => lines.push(format!("Server: {status}")),
        Some(Err(reason)) => lines.push(format!("Server unreachable: {reason}")),
        None => {}
    }

    lines
}

fn state_label(state: UiState) -> &'static str {
    match state {
        UiState::Idle => "Idle",
        UiState::Previewing => "Previewing",
        UiState::Submitting => "Submitting",
        UiState::Safe => "Safe",
        UiState::Unsafe => "Unsafe",
        UiState::Error => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checker_core::{
        update, AppState, ClassificationResult, Msg, SelectedImage, SubmissionOutcome,
    };

    fn submitted(path: &str) -> AppState {
        let (state, _) = update(
            AppState::new(),
            Msg::FileSelected(Some(SelectedImage::from_path(path))),
        );
        update(state, Msg::SubmitClicked).0
    }

    #[test]
    fn initial_screen_shows_placeholder_and_idle_button() {
        let lines = render(&AppState::new().view());
        assert_eq!(
            lines,
            vec![
                "[Idle]".to_string(),
                "Preview: No image selected.".to_string(),
                "Button: [Check Image]".to_string(),
            ]
        );
    }

    #[test]
    fn submitting_disables_button() {
        let lines = render(&submitted("cat.jpg").view());
        assert_eq!(lines[0], "[Submitting]");
        assert_eq!(lines[2], "Button: [Checking...] (disabled)");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn safe_verdict_lists_status_reason_and_confidence() {
        let result = ClassificationResult::from_json(
            br#"{"status":"Safe","reason":"no concerns","confidence":0.95,"categories":[],"category_scores":{}}"#,
        )
        .unwrap();
        let (state, _) = update(
            submitted("cat.jpg"),
            Msg::SubmissionFinished(SubmissionOutcome::Verdict(result)),
        );

        let lines = render(&state.view());
        assert_eq!(lines[0], "[Safe]");
        assert_eq!(lines[2], "Button: [Check Image]");
        assert_eq!(
            &lines[3..7],
            &[
                "Result (safe) for cat.jpg:".to_string(),
                "  Status: Safe".to_string(),
                "  Reason: no concerns".to_string(),
                "  Confidence: 95.0%".to_string(),
            ]
        );
        assert_eq!(lines[7], "  {");
        assert_eq!(lines.last().map(String::as_str), Some("  }"));
    }

    #[test]
    fn error_result_is_a_single_line() {
        let (state, _) = update(
            submitted("cat.jpg"),
            Msg::SubmissionFinished(SubmissionOutcome::ServerError {
                status: 413,
                message: "file too large".to_string(),
            }),
        );

        let lines = render(&state.view());
        assert_eq!(lines[0], "[Error]");
        assert_eq!(lines[3], "Result (error): file too large");
    }

    #[test]
    fn server_status_is_appended() {
        let (state, _) = update(
            AppState::new(),
            Msg::HealthChecked(Err("connection refused".to_string())),
        );
        let lines = render(&state.view());
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Server unreachable: connection refused")
        );
    }
}
