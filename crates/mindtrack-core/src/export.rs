use crate::stats::average_mood;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use html_escape::encode_text;
use mindtrack_model::journal::JournalEntry;
use mindtrack_utils::date::file_date;

pub const CSV_HEADER: &str = "id,timestamp,mood,text,aiResponse";

/// Number of entries listed in the HTML summary.
pub const HTML_RECENT_ENTRIES: usize = 20;

#[must_use]
pub fn csv_file_name(date: DateTime<FixedOffset>) -> String {
    format!("mindtrack-entries-{}.csv", file_date(date))
}

#[must_use]
pub fn html_file_name(date: DateTime<FixedOffset>) -> String {
    format!("mindtrack-summary-{}.html", file_date(date))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// One line per entry in the given order. Text fields are always quoted.
#[must_use]
pub fn to_csv(entries: &[JournalEntry]) -> String {
    let rows = entries.iter().map(|entry| {
        [
            entry.id.to_string(),
            entry
                .created_at
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            entry.mood.map(|mood| mood.value().to_string()).unwrap_or_default(),
            quote(&entry.text),
            quote(entry.reflection.as_deref().unwrap_or_default()),
        ]
        .join(",")
    });
    std::iter::once(CSV_HEADER.to_owned())
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

const HTML_STYLE: &str = r"
      body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
        line-height: 1.6;
        color: #374151;
        max-width: 800px;
        margin: 0 auto;
        padding: 40px 20px;
      }
      .header { text-align: center; margin-bottom: 40px; border-bottom: 2px solid #e5e7eb; padding-bottom: 20px; }
      .header h1 { color: #111827; margin: 0 0 10px 0; font-size: 28px; }
      .header p { color: #6b7280; margin: 0; font-size: 16px; }
      .stats { display: grid; grid-template-columns: repeat(3, 1fr); gap: 20px; margin-bottom: 40px; }
      .stat-card { background: #f9fafb; padding: 20px; border-radius: 8px; text-align: center; border: 1px solid #e5e7eb; }
      .stat-number { font-size: 24px; font-weight: bold; color: #111827; margin-bottom: 5px; }
      .stat-label { font-size: 14px; color: #6b7280; }
      .entries-section h2 { color: #111827; margin-bottom: 20px; font-size: 20px; }
      .entry { background: #ffffff; border: 1px solid #e5e7eb; border-radius: 8px; padding: 20px; margin-bottom: 20px; page-break-inside: avoid; }
      .entry-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 15px; padding-bottom: 10px; border-bottom: 1px solid #f3f4f6; }
      .entry-date { font-size: 14px; color: #6b7280; }
      .entry-mood { font-size: 18px; }
      .entry-text { color: #374151; margin-bottom: 15px; line-height: 1.7; white-space: pre-wrap; }
      .ai-response { background: #f8fafc; border-left: 3px solid #e5e7eb; padding: 15px; font-style: italic; color: #4b5563; font-size: 14px; }
      .ai-label { font-weight: 600; color: #374151; margin-bottom: 8px; font-style: normal; }
      .footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #e5e7eb; text-align: center; font-size: 12px; color: #9ca3af; }
      @media print {
        body { margin: 0; padding: 20px; }
        .entry { page-break-inside: avoid; }
      }
";

fn stat_card(value: &str, label: &str) -> String {
    format!(
        r#"
      <div class="stat-card">
        <div class="stat-number">{value}</div>
        <div class="stat-label">{label}</div>
      </div>"#
    )
}

fn entry_html(entry: &JournalEntry) -> String {
    let mood = entry
        .mood
        .map(|mood| format!(r#"<div class="entry-mood" title="{}">{}</div>"#, mood.label(), mood.emoji()))
        .unwrap_or_default();
    let reflection = entry
        .reflection
        .as_deref()
        .map(|reflection| {
            format!(
                r#"
        <div class="ai-response">
          <div class="ai-label">AI Reflection:</div>
          {}
        </div>"#,
                encode_text(reflection)
            )
        })
        .unwrap_or_default();
    format!(
        r#"
      <div class="entry">
        <div class="entry-header">
          <div class="entry-date">{date}</div>
          {mood}
        </div>
        <div class="entry-text">{text}</div>{reflection}
      </div>"#,
        date = entry.created_at.format("%A, %B %-d, %Y"),
        text = encode_text(&entry.text),
    )
}

/// Printable summary page with the overall numbers and the most recent entries.
/// `entries` are expected newest first.
#[must_use]
pub fn to_html(entries: &[JournalEntry], generated_at: DateTime<FixedOffset>) -> String {
    let with_mood = entries.iter().filter(|entry| entry.mood.is_some()).count();
    let average = if with_mood == 0 {
        "0".to_owned()
    } else {
        format!("{:.1}", average_mood(entries))
    };
    let stats = [
        stat_card(&entries.len().to_string(), "Total Entries"),
        stat_card(&average, "Average Mood"),
        stat_card(&with_mood.to_string(), "Entries with Mood"),
    ]
    .concat();
    let recent = entries
        .iter()
        .take(HTML_RECENT_ENTRIES)
        .map(entry_html)
        .collect::<String>();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>MindTrack AI - Journal Summary</title>
    <style>{HTML_STYLE}</style>
  </head>
  <body>
    <div class="header">
      <h1>MindTrack AI</h1>
      <p>Journal Summary Report - Generated on {generated}</p>
    </div>
    <div class="stats">{stats}
    </div>
    <div class="entries-section">
      <h2>Recent Entries (Latest {HTML_RECENT_ENTRIES})</h2>{recent}
    </div>
    <div class="footer">
      <p>This report was generated by MindTrack AI. For questions about your mental health, please consult a qualified healthcare professional.</p>
    </div>
  </body>
</html>
"#,
        generated = generated_at.format("%B %-d, %Y"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::entry_at;
    use chrono::Duration;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-01T09:30:00+01:00").unwrap()
    }

    #[test]
    fn test_file_names() {
        assert_eq!(csv_file_name(now()), "mindtrack-entries-2024-03-01.csv");
        assert_eq!(html_file_name(now()), "mindtrack-summary-2024-03-01.html");
    }

    #[test]
    fn test_csv() {
        let mut quoted = entry_at(now(), Some(4));
        quoted.text = r#"She said "hi", then left"#.to_owned();
        quoted.reflection = Some(r#"That "hi" mattered."#.to_owned());
        let plain = entry_at(now() - Duration::days(1), None);

        let csv = to_csv(&[quoted.clone(), plain.clone()]);
        let lines = csv.split('\n').collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            format!(
                r#"{},2024-03-01T08:30:00.000Z,4,"She said ""hi"", then left","That ""hi"" mattered.""#,
                quoted.id
            )
        );
        assert_eq!(
            lines[2],
            format!(r#"{},2024-02-29T08:30:00.000Z,,"{}","""#, plain.id, plain.text)
        );
    }

    #[test]
    fn test_csv_without_entries() {
        assert_eq!(to_csv(&[]), CSV_HEADER);
    }

    #[test]
    fn test_html() {
        let mut entry = entry_at(now(), Some(5));
        entry.text = "<script>alert('x')</script> & more".to_owned();
        entry.reflection = Some("Keep going <3".to_owned());
        let entries = [entry, entry_at(now() - Duration::days(1), Some(4)), entry_at(now(), None)];

        let html = to_html(&entries, now());
        assert!(html.contains("Generated on March 1, 2024"));
        assert!(html.contains(r#"<div class="stat-number">3</div>"#));
        assert!(html.contains(r#"<div class="stat-number">4.5</div>"#));
        assert!(html.contains(r#"<div class="stat-number">2</div>"#));
        assert!(html.contains("Friday, March 1, 2024"));
        assert!(html.contains("😄"));
        assert!(html.contains("AI Reflection:"));
        assert!(html.contains("Keep going &lt;3"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_html_limits_entries() {
        let entries = (0..30)
            .map(|days| entry_at(now() - Duration::days(days), None))
            .collect::<Vec<_>>();
        let html = to_html(&entries, now());
        assert_eq!(html.matches(r#"<div class="entry">"#).count(), HTML_RECENT_ENTRIES);
        assert!(html.contains(r#"<div class="stat-number">0</div>"#));
    }
}
