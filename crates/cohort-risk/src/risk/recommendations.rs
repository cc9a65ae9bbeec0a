use super::domain::RuleKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

/// Card rendered on the student detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub id: &'static str,
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub priority: RecommendationPriority,
}

const MAINTAIN: Recommendation = Recommendation {
    id: "REC_MAINTAIN",
    icon: "check",
    title: "Keep Up the Good Work!",
    description: "You're doing well! Continue your current study habits and maintain your healthy academic balance.",
    priority: RecommendationPriority::Low,
};

pub const fn recommendation_for(kind: RuleKind) -> Recommendation {
    match kind {
        RuleKind::LowAttendance => Recommendation {
            id: "REC_ATTENDANCE",
            icon: "people",
            title: "Schedule Advisor Meeting",
            description: "Book a session with your academic advisor to discuss attendance patterns and identify any barriers to class participation.",
            priority: RecommendationPriority::High,
        },
        RuleKind::RepeatedLateSubmissions => Recommendation {
            id: "REC_DEADLINE",
            icon: "calendar",
            title: "Deadline Management Workshop",
            description: "Attend a time management workshop or use a calendar system to track assignment due dates 48 hours in advance.",
            priority: RecommendationPriority::Medium,
        },
        RuleKind::WorkloadSpike => Recommendation {
            id: "REC_WORKLOAD",
            icon: "scale",
            title: "Workload Balancing",
            description: "Work with your advisor to evaluate current course load and consider redistributing tasks or dropping non-essential activities.",
            priority: RecommendationPriority::Medium,
        },
        RuleKind::MissingSubmissions => Recommendation {
            id: "REC_RECOVERY",
            icon: "books",
            title: "Academic Recovery Plan",
            description: "Contact your professors to discuss make-up options and create a catch-up plan for missed assignments.",
            priority: RecommendationPriority::High,
        },
        RuleKind::SuddenAttendanceDrop => Recommendation {
            id: "REC_CHECKIN",
            icon: "chat",
            title: "Wellness Check-In",
            description: "Consider visiting the campus counseling center to discuss any personal challenges affecting your academic performance.",
            priority: RecommendationPriority::High,
        },
    }
}

/// Maps triggered rules to recommendation cards, deduplicated in trigger order.
pub fn recommend(kinds: &[RuleKind]) -> Vec<Recommendation> {
    let mut cards: Vec<Recommendation> = Vec::new();
    for kind in kinds {
        let card = recommendation_for(*kind);
        if !cards.iter().any(|existing| existing.id == card.id) {
            cards.push(card);
        }
    }

    if cards.is_empty() {
        cards.push(MAINTAIN);
    }

    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_triggers_yield_the_maintain_card() {
        let cards = recommend(&[]);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "REC_MAINTAIN");
        assert_eq!(cards[0].priority, RecommendationPriority::Low);
    }

    #[test]
    fn cards_follow_trigger_order_without_duplicates() {
        let cards = recommend(&[
            RuleKind::MissingSubmissions,
            RuleKind::LowAttendance,
            RuleKind::MissingSubmissions,
        ]);
        let ids: Vec<_> = cards.iter().map(|card| card.id).collect();
        assert_eq!(ids, vec!["REC_RECOVERY", "REC_ATTENDANCE"]);
    }

    #[test]
    fn every_rule_has_a_distinct_card() {
        let cards = recommend(&RuleKind::ordered());
        assert_eq!(cards.len(), RuleKind::ordered().len());
    }
}
