//! Built-in seed data for local and demo environments

use crate::models::{EventFormat, EventStatus, Instructor, NewEvent};
use chrono::NaiveDate;

fn instructor(id: &str, name: &str, title: &str, bio: &str) -> Instructor {
    Instructor {
        id: id.to_string(),
        name: name.to_string(),
        title: title.to_string(),
        bio: bio.to_string(),
        avatar: None,
    }
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

/// Default set loaded by `seed --confirm`.
pub fn default_seed_events() -> Vec<NewEvent> {
    let mira = instructor(
        "inst-mira",
        "Mira Okafor",
        "Principal Engineer",
        "Builds storage engines and teaches systems programming.",
    );
    let jonas = instructor(
        "inst-jonas",
        "Jonas Lindqvist",
        "Product Designer",
        "Runs design critiques for early-stage teams.",
    );
    let priya = instructor(
        "inst-priya",
        "Priya Raman",
        "Engineering Manager",
        "Coaches new managers through their first year.",
    );

    vec![
        NewEvent {
            title: "Async Rust in Practice".to_string(),
            description: "Futures, executors and cancellation, with live debugging.".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 5).unwrap_or_default(),
            time: "18:00".to_string(),
            format: EventFormat::Online,
            location: "Online".to_string(),
            attendee_limit: 50,
            status: EventStatus::Published,
            tags: tags(&["rust", "async"]),
            instructor: mira.clone(),
            external_link: None,
            meeting_link: Some("https://meet.example.com/async-rust".to_string()),
        },
        NewEvent {
            title: "Storage Engines Deep Dive".to_string(),
            description: "LSM trees, B-trees and how to pick between them.".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 12).unwrap_or_default(),
            time: "17:30".to_string(),
            format: EventFormat::InPerson,
            location: "Berlin, Factory Görlitzer Park".to_string(),
            attendee_limit: 3,
            status: EventStatus::Published,
            tags: tags(&["databases", "rust"]),
            instructor: mira,
            external_link: None,
            meeting_link: None,
        },
        NewEvent {
            title: "Design Critique Night".to_string(),
            description: "Bring a flow you're working on and get feedback.".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 19).unwrap_or_default(),
            time: "19:00".to_string(),
            format: EventFormat::Hybrid,
            location: "Stockholm and online".to_string(),
            attendee_limit: 20,
            status: EventStatus::Published,
            tags: tags(&["design", "ux"]),
            instructor: jonas.clone(),
            external_link: Some("https://lu.ma/ux3".to_string()),
            meeting_link: None,
        },
        NewEvent {
            title: "Your First 90 Days as a Manager".to_string(),
            description: "Practical habits for one-on-ones, delegation and feedback."
                .to_string(),
            date: NaiveDate::from_ymd_opt(2026, 12, 2).unwrap_or_default(),
            time: "12:00".to_string(),
            format: EventFormat::Online,
            location: "Online".to_string(),
            attendee_limit: 30,
            status: EventStatus::Published,
            tags: tags(&["leadership"]),
            instructor: priya.clone(),
            external_link: None,
            meeting_link: Some("https://meet.example.com/first-90".to_string()),
        },
        NewEvent {
            title: "Accessible Components Workshop".to_string(),
            description: "Keyboard navigation, focus management and screen readers."
                .to_string(),
            date: NaiveDate::from_ymd_opt(2026, 12, 10).unwrap_or_default(),
            time: "16:00".to_string(),
            format: EventFormat::Online,
            location: "Online".to_string(),
            attendee_limit: 25,
            status: EventStatus::Draft,
            tags: tags(&["design", "accessibility"]),
            instructor: jonas,
            external_link: None,
            meeting_link: Some("https://meet.example.com/a11y".to_string()),
        },
        NewEvent {
            title: "Hiring Loops That Work".to_string(),
            description: "Structured interviews and calibrated scorecards.".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap_or_default(),
            time: "15:00".to_string(),
            format: EventFormat::InPerson,
            location: "London, Shoreditch".to_string(),
            attendee_limit: 40,
            status: EventStatus::Completed,
            tags: tags(&["leadership", "hiring"]),
            instructor: priya,
            external_link: None,
            meeting_link: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_seed_events_are_valid() {
        for event in default_seed_events() {
            assert!(event.validate().is_ok(), "invalid seed entry: {}", event.title);
        }
    }

    #[test]
    fn test_seed_includes_external_and_small_events() {
        let events = default_seed_events();
        assert!(
            events
                .iter()
                .any(|e| e.external_link.as_deref() == Some("https://lu.ma/ux3"))
        );
        assert!(events.iter().any(|e| e.attendee_limit <= 3));
    }
}
