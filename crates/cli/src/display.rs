//! Text rendering for terminal views.
//!
//! Every function returns a `String` so views stay testable; colour is applied through
//! `colored` and disappears when stdout is not a terminal or `NO_COLOR` is set.

use colored::{ColoredString, Colorize};
use ng12_core::citations::{self, CitationCard};
use ng12_core::types::{AssessmentResult, ChatMessage, Patient, Recommendation, Role};
use ng12_core::UrgencyTier;
use std::fmt::Write;

/// Applies the tier's emphasis to a recommendation label.
///
/// Unrecognised recommendations have no tier and are returned unstyled.
pub fn styled_recommendation(recommendation: &Recommendation) -> ColoredString {
    let label = recommendation.as_str();
    match UrgencyTier::for_recommendation(recommendation) {
        Some(UrgencyTier::Routine) => label.green().bold(),
        Some(UrgencyTier::Urgent) => label.yellow().bold(),
        Some(UrgencyTier::SameDay) => label.red().bold(),
        None => label.normal(),
    }
}

/// One line per patient; the selected one is marked.
pub fn patient_list(patients: &[Patient], selected: Option<&str>) -> String {
    if patients.is_empty() {
        return "No patients found.\n".to_string();
    }

    let mut out = String::new();
    for patient in patients {
        let marker = if selected == Some(patient.patient_id.as_str()) {
            ">"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            "{} {} ({}) - Age {}",
            marker, patient.name, patient.patient_id, patient.age
        );
    }
    out
}

/// Summary of the selected patient shown before assessing.
pub fn patient_summary(patient: &Patient) -> String {
    format!(
        "{} ({}) - Age {}\nSymptoms: {}",
        patient.name,
        patient.patient_id,
        patient.age,
        patient.symptom_summary()
    )
}

fn citation_block(cards: &[CitationCard<'_>], indent: &str) -> String {
    let mut out = String::new();
    for card in cards {
        let _ = writeln!(out, "{}[{}] {}", indent, card.position, card.heading.bold());
        let _ = writeln!(out, "{}    {}", indent, card.excerpt);
        let _ = writeln!(
            out,
            "{}    {}",
            indent,
            format!("Chunk ID: {}", card.chunk_id).dimmed()
        );
    }
    out
}

/// Full assessment result view.
pub fn assessment(result: &AssessmentResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Assessment Result".bold());
    let _ = writeln!(out, "Patient: {} ({})", result.patient_name, result.patient_id);
    let _ = writeln!(out, "Age: {}", result.age);
    let _ = writeln!(out, "Symptoms: {}", result.symptoms.join(", "));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Recommendation".bold());
    let _ = writeln!(out, "  {}", styled_recommendation(&result.recommendation));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Clinical Reasoning".bold());
    for line in result.reasoning.lines() {
        let _ = writeln!(out, "  {}", line);
    }

    let cards = citations::render(&result.citations);
    if !cards.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Guidelines References".bold());
        out.push_str(&citation_block(&cards, "  "));
    }
    out
}

/// One transcript entry, with its sources under assistant turns.
pub fn chat_message(message: &ChatMessage) -> String {
    let mut out = String::new();
    let speaker = match message.role {
        Role::User => "You".blue().bold(),
        Role::Assistant => "Assistant".cyan().bold(),
    };
    let _ = writeln!(out, "{}: {}", speaker, message.content);

    let cards = citations::render(&message.citations);
    if message.role == Role::Assistant && !cards.is_empty() {
        let _ = writeln!(out, "  {}", "Sources:".bold());
        out.push_str(&citation_block(&cards, "    "));
    }
    out
}

/// The whole transcript, or a welcome line when it is empty.
pub fn transcript(messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return "Welcome to the NG12 Assistant. Ask questions about cancer risk assessment and clinical guidelines.\n"
            .to_string();
    }
    messages.iter().map(chat_message).collect()
}

/// Error banner.
pub fn error_banner(message: &str) -> String {
    message.red().bold().to_string()
}

/// In-progress affordance shown while a request is outstanding.
pub fn in_progress(label: &str) -> String {
    format!("{} {}", "...".dimmed(), label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ng12_core::types::Citation;

    fn plain() {
        colored::control::set_override(false);
    }

    fn result(recommendation: &str) -> AssessmentResult {
        AssessmentResult {
            patient_id: "P1".into(),
            patient_name: "Jane Doe".into(),
            age: 54,
            symptoms: vec!["cough".into(), "weight loss".into()],
            recommendation: recommendation.into(),
            reasoning: "Persistent cough.\nUnexplained weight loss.".into(),
            citations: vec![Citation {
                source: "NG12".into(),
                page: 12,
                excerpt: "Offer an urgent chest X-ray".into(),
                chunk_id: "c1".into(),
            }],
        }
    }

    #[test]
    fn assessment_shows_recommendation_and_citation() {
        plain();
        let text = assessment(&result("Urgent Referral"));

        assert!(text.contains("Patient: Jane Doe (P1)"));
        assert!(text.contains("  Urgent Referral"));
        assert!(text.contains("[1] NG12 - Page 12"));
        assert!(text.contains("Offer an urgent chest X-ray"));
        assert!(text.contains("Chunk ID: c1"));
    }

    #[test]
    fn unknown_recommendation_renders_raw_text() {
        plain();
        let text = assessment(&result("Discuss at MDT"));

        assert!(text.contains("  Discuss at MDT"));
        assert!(text.contains("Unexplained weight loss."));
        assert!(text.contains("Guidelines References"));
    }

    #[test]
    fn no_citations_means_no_reference_section() {
        plain();
        let mut r = result("Routine GP Screening");
        r.citations.clear();

        let text = assessment(&r);
        assert!(!text.contains("Guidelines References"));
        assert!(!text.contains("Chunk ID"));
    }

    #[test]
    fn patient_list_marks_selection() {
        plain();
        let patients = vec![
            Patient {
                patient_id: "P1".into(),
                name: "Jane Doe".into(),
                age: 54,
                symptoms: vec![],
            },
            Patient {
                patient_id: "P2".into(),
                name: "John Roe".into(),
                age: 61,
                symptoms: vec![],
            },
        ];

        let text = patient_list(&patients, Some("P2"));
        assert_eq!(text, "  Jane Doe (P1) - Age 54\n> John Roe (P2) - Age 61\n");
        assert_eq!(patient_list(&[], None), "No patients found.\n");
    }

    #[test]
    fn user_turns_never_show_sources() {
        plain();
        let msg = ChatMessage {
            role: Role::User,
            content: "hello".into(),
            citations: vec![],
        };
        assert_eq!(chat_message(&msg), "You: hello\n");
    }

    #[test]
    fn assistant_turn_lists_sources() {
        plain();
        let msg = ChatMessage::assistant(
            "Refer urgently.",
            vec![Citation {
                source: "NG12".into(),
                page: 7,
                excerpt: "Refer adults...".into(),
                chunk_id: "c7".into(),
            }],
        );

        let text = chat_message(&msg);
        assert!(text.starts_with("Assistant: Refer urgently.\n"));
        assert!(text.contains("Sources:"));
        assert!(text.contains("[1] NG12 - Page 7"));
    }
}
