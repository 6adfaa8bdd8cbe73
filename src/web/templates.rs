//! HTML rendering for the upload form and the results view
//!
//! The pages are small enough that string assembly beats a template engine.

use crate::transcription::TranscriptionOutput;

pub(super) fn render_index(notice: Option<&str>) -> String {
    let notice_html = match notice {
        Some(msg) => format!("<p class=\"notice\">{}</p>\n", html_escape(msg)),
        None => String::new(),
    };

    page(
        "whosaid",
        &format!(
            r#"<h1>whosaid</h1>
<p>Upload a recording to get a transcript with speaker-labeled time segments.</p>
{notice_html}<form method="post" action="/" enctype="multipart/form-data">
  <input type="file" name="file" />
  <button type="submit">Transcribe</button>
</form>"#
        ),
    )
}

pub(super) fn render_results(filename: &str, output: &TranscriptionOutput) -> String {
    let segments = if output.turns.is_empty() {
        "<p>No speaker turns detected.</p>".to_string()
    } else {
        let items: String = output
            .turns
            .iter()
            .map(|turn| format!("  <li>{}</li>\n", html_escape(&turn.to_string())))
            .collect();
        format!("<ol>\n{items}</ol>")
    };

    page(
        "whosaid — results",
        &format!(
            r#"<h1>Results for {}</h1>
<h2>Transcription</h2>
<p>{}</p>
<h2>Speaker segments</h2>
{}
<p><a href="/">Transcribe another file</a></p>"#,
            html_escape(filename),
            html_escape(&output.transcript),
            segments
        ),
    )
}

pub(super) fn render_error(message: &str) -> String {
    page(
        "whosaid — error",
        &format!(
            r#"<h1>Something went wrong</h1>
<p>{}</p>
<p><a href="/">Back to upload</a></p>"#,
            html_escape(message)
        ),
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<title>{}</title>
</head>
<body>
{}
</body>
</html>
"#,
        html_escape(title),
        body
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diarization::SpeakerTurn;

    fn sample_output() -> TranscriptionOutput {
        TranscriptionOutput {
            transcript: "hello & goodbye".to_string(),
            turns: vec![
                SpeakerTurn {
                    start: 0.0,
                    end: 2.5,
                    speaker: "SPEAKER_00".to_string(),
                },
                SpeakerTurn {
                    start: 2.5,
                    end: 5.0,
                    speaker: "SPEAKER_01".to_string(),
                },
            ],
        }
    }

    #[test]
    fn index_contains_multipart_upload_form() {
        let html = render_index(None);
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(html.contains(r#"name="file""#));
        assert!(!html.contains("class=\"notice\""));
    }

    #[test]
    fn index_renders_notice_when_present() {
        let html = render_index(Some("Select an audio file to transcribe."));
        assert!(html.contains("class=\"notice\""));
        assert!(html.contains("Select an audio file to transcribe."));
    }

    #[test]
    fn results_render_segments_in_order() {
        let html = render_results("sample.wav", &sample_output());
        assert!(html.contains("hello &amp; goodbye"));
        assert!(html.contains("SPEAKER_00: 0.00s - 2.50s"));
        assert!(html.contains("SPEAKER_01: 2.50s - 5.00s"));

        let first = html.find("SPEAKER_00").unwrap();
        let second = html.find("SPEAKER_01").unwrap();
        assert!(first < second);
    }

    #[test]
    fn results_without_turns_show_placeholder() {
        let output = TranscriptionOutput {
            transcript: "monologue".to_string(),
            turns: Vec::new(),
        };
        let html = render_results("solo.wav", &output);
        assert!(html.contains("No speaker turns detected."));
        assert!(!html.contains("<ol>"));
    }

    #[test]
    fn error_page_escapes_the_message() {
        let html = render_error("<script>alert(1)</script>");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(html_escape(r#"<a href="x">&"#), "&lt;a href=&quot;x&quot;&gt;&amp;");
    }
}
