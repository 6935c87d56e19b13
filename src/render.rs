// file: src/render.rs
// description: plain-text views of results, chat transcripts and patient lists

use crate::models::{ChatMessage, Patient, Role, SearchResult};
use crate::utils::Validator;
use colored::Colorize;
use std::fmt::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Graph,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(ViewMode::List),
            "graph" => Ok(ViewMode::Graph),
            other => Err(format!("unknown view '{}' (expected list or graph)", other)),
        }
    }
}

pub fn render_results(
    results: &[&SearchResult],
    view: ViewMode,
    preview_chars: usize,
    graph_width: usize,
) -> String {
    let mut out = match view {
        ViewMode::List => render_list(results, preview_chars),
        ViewMode::Graph => render_graph(results, graph_width),
    };
    let _ = writeln!(out, "{} results found", results.len());
    out
}

fn render_list(results: &[&SearchResult], preview_chars: usize) -> String {
    let mut out = String::new();

    for (idx, result) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ({})",
            idx + 1,
            result.title.bold(),
            format!("{:.0}% confidence", result.confidence_score).cyan()
        );
        let _ = writeln!(out, "   Source: {}", result.source);
        if !result.date.is_empty() {
            let _ = writeln!(out, "   Date: {}", result.date);
        }
        if !result.description.is_empty() {
            let _ = writeln!(
                out,
                "   {}",
                Validator::truncate_text(&result.description, preview_chars)
            );
        }

        if let Some(related) = &result.related_data {
            if let Some(count) = related.patient_count {
                let _ = writeln!(out, "   Patients: {}", count);
            }
            if let Some(trend) = related.trend.as_ref().filter(|t| !t.is_empty()) {
                let points: Vec<String> = trend
                    .iter()
                    .map(|p| format!("{} {}", p.date, p.value))
                    .collect();
                let _ = writeln!(out, "   Trend: {}", points.join(" → "));
            }
        }
        out.push('\n');
    }

    out
}

/// One bar per result, scaled so 100% fills `width` cells.
fn render_graph(results: &[&SearchResult], width: usize) -> String {
    let label_width = results
        .iter()
        .map(|r| r.title.chars().count().min(32))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for result in results {
        let label = Validator::truncate_text(&result.title, 29);
        let filled = ((result.confidence_score / 100.0) * width as f32).round() as usize;
        let _ = writeln!(
            out,
            "{:<label_width$} | {} {:.0}",
            label,
            "█".repeat(filled.min(width)),
            result.confidence_score,
        );
    }
    out
}

pub fn render_message(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::User => "You".green().bold(),
        Role::Assistant => "Assistant".blue().bold(),
    };

    let mut out = format!("{}: {}", speaker, message.content);
    if let Some(source) = &message.source {
        let _ = write!(out, "\n  Source: {}", source.dimmed());
    }
    if !message.actions.is_empty() {
        let labels: Vec<String> = message
            .actions
            .iter()
            .map(|a| format!("[{}]", a.label))
            .collect();
        let _ = write!(out, "\n  {}", labels.join(" "));
    }
    out
}

pub fn render_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_patients(shown: &[&Patient], total: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8} {:<22} {:<10} {:<12} {}",
        "ID", "Name", "Status", "Last Visit", "Primary Condition"
    );
    for patient in shown {
        let _ = writeln!(
            out,
            "{:<8} {:<22} {:<10} {:<12} {}",
            patient.id,
            Validator::truncate_text(&patient.name, 19),
            patient.status.as_str(),
            patient.last_visit,
            patient.condition
        );
    }
    let _ = writeln!(out, "Showing {} of {} patients", shown.len(), total);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataSource, PatientStatus, RelatedData, SuggestedAction, TrendPoint};
    use crate::test_support::plain;

    fn result(title: &str, confidence: f32) -> SearchResult {
        SearchResult::new(
            "1",
            title,
            "Found 3 patients with matching symptom patterns",
            DataSource::Ehr,
            confidence,
            "2024-02-24T08:00:00",
        )
    }

    #[test]
    fn test_list_view() {
        let first = result("Similar Symptoms to Jane Doe", 92.0).with_related_data(RelatedData {
            patient_count: Some(3),
            trend: Some(vec![
                TrendPoint { date: "Feb 20".to_string(), value: 1.0 },
                TrendPoint { date: "Feb 21".to_string(), value: 2.0 },
            ]),
        });
        let rendered = plain(&render_results(&[&first], ViewMode::List, 20, 40));

        assert!(rendered.contains("1. Similar Symptoms to Jane Doe (92% confidence)"));
        assert!(rendered.contains("Source: Electronic Health Records"));
        assert!(rendered.contains("Patients: 3"));
        assert!(rendered.contains("Feb 20 1 → Feb 21 2"));
        assert!(rendered.ends_with("1 results found\n"));
    }

    #[test]
    fn test_graph_view_scales_bars() {
        let full = result("Full", 100.0);
        let half = result("Half", 50.0);
        let rendered = plain(&render_results(&[&full, &half], ViewMode::Graph, 10, 10));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0].matches('█').count(), 10);
        assert_eq!(lines[1].matches('█').count(), 5);
        assert_eq!(lines[2], "2 results found");
    }

    #[test]
    fn test_render_message_with_actions() {
        let message = ChatMessage::assistant("Here are some suggested actions")
            .with_actions(vec![SuggestedAction::new("Schedule Appointment", "schedule")]);
        let rendered = plain(&render_message(&message));
        assert!(rendered.starts_with("Assistant: Here are"));
        assert!(rendered.contains("[Schedule Appointment]"));
    }

    #[test]
    fn test_render_patients_count_line() {
        let patient = Patient {
            id: "P001".to_string(),
            name: "Sarah Johnson".to_string(),
            email: "sarah.j@example.com".to_string(),
            status: PatientStatus::Active,
            last_visit: "2024-02-20".to_string(),
            condition: "Hypertension".to_string(),
        };
        let rendered = plain(&render_patients(&[&patient], 3));
        assert!(rendered.contains("Sarah Johnson"));
        assert!(rendered.contains("Showing 1 of 3 patients"));
    }

    #[test]
    fn test_view_mode_parse() {
        assert_eq!("GRAPH".parse::<ViewMode>().unwrap(), ViewMode::Graph);
        assert!("table".parse::<ViewMode>().is_err());
    }
}
