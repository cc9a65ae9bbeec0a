use serde::{Deserialize, Serialize};

/// One survey response row. Field names match the dataset's CSV header.
///
/// Values are taken as given; range checks against each survey scale are the caller's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub anxiety_level: i32,
    pub self_esteem: i32,
    pub mental_health_history: i32,
    pub depression: i32,
    pub headache: i32,
    pub blood_pressure: i32,
    pub sleep_quality: i32,
    pub breathing_problem: i32,
    pub noise_level: i32,
    pub living_conditions: i32,
    pub safety: i32,
    pub basic_needs: i32,
    pub academic_performance: i32,
    pub study_load: i32,
    pub teacher_student_relationship: i32,
    pub future_career_concerns: i32,
    pub social_support: i32,
    pub peer_pressure: i32,
    pub extracurricular_activities: i32,
    pub bullying: i32,
    /// Ground-truth stress class (0, 1, 2) when the dataset carries it.
    #[serde(default)]
    pub stress_level: Option<u8>,
}

impl FeatureRow {
    pub fn value(&self, feature: Feature) -> i32 {
        match feature {
            Feature::AnxietyLevel => self.anxiety_level,
            Feature::SelfEsteem => self.self_esteem,
            Feature::MentalHealthHistory => self.mental_health_history,
            Feature::Depression => self.depression,
            Feature::Headache => self.headache,
            Feature::BloodPressure => self.blood_pressure,
            Feature::SleepQuality => self.sleep_quality,
            Feature::BreathingProblem => self.breathing_problem,
            Feature::NoiseLevel => self.noise_level,
            Feature::LivingConditions => self.living_conditions,
            Feature::Safety => self.safety,
            Feature::BasicNeeds => self.basic_needs,
            Feature::AcademicPerformance => self.academic_performance,
            Feature::StudyLoad => self.study_load,
            Feature::TeacherStudentRelationship => self.teacher_student_relationship,
            Feature::FutureCareerConcerns => self.future_career_concerns,
            Feature::SocialSupport => self.social_support,
            Feature::PeerPressure => self.peer_pressure,
            Feature::ExtracurricularActivities => self.extracurricular_activities,
            Feature::Bullying => self.bullying,
        }
    }
}

/// Survey features with their attribution weight and population mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    AnxietyLevel,
    SelfEsteem,
    MentalHealthHistory,
    Depression,
    Headache,
    BloodPressure,
    SleepQuality,
    BreathingProblem,
    NoiseLevel,
    LivingConditions,
    Safety,
    BasicNeeds,
    AcademicPerformance,
    StudyLoad,
    TeacherStudentRelationship,
    FutureCareerConcerns,
    SocialSupport,
    PeerPressure,
    ExtracurricularActivities,
    Bullying,
}

impl Feature {
    /// Attribution order. Ties in impact keep this order.
    pub const fn weighted() -> [Self; 20] {
        [
            Self::AnxietyLevel,
            Self::Depression,
            Self::SleepQuality,
            Self::AcademicPerformance,
            Self::SocialSupport,
            Self::PeerPressure,
            Self::Bullying,
            Self::StudyLoad,
            Self::SelfEsteem,
            Self::MentalHealthHistory,
            Self::FutureCareerConcerns,
            Self::LivingConditions,
            Self::Safety,
            Self::BasicNeeds,
            Self::TeacherStudentRelationship,
            Self::NoiseLevel,
            Self::Headache,
            Self::BloodPressure,
            Self::BreathingProblem,
            Self::ExtracurricularActivities,
        ]
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::AnxietyLevel => "Anxiety Level",
            Self::SelfEsteem => "Self Esteem",
            Self::MentalHealthHistory => "Mental Health History",
            Self::Depression => "Depression",
            Self::Headache => "Headache Frequency",
            Self::BloodPressure => "Blood Pressure",
            Self::SleepQuality => "Sleep Quality",
            Self::BreathingProblem => "Breathing Problems",
            Self::NoiseLevel => "Noise Level",
            Self::LivingConditions => "Living Conditions",
            Self::Safety => "Safety",
            Self::BasicNeeds => "Basic Needs Met",
            Self::AcademicPerformance => "Academic Performance",
            Self::StudyLoad => "Study Load",
            Self::TeacherStudentRelationship => "Teacher Relationship",
            Self::FutureCareerConcerns => "Career Concerns",
            Self::SocialSupport => "Social Support",
            Self::PeerPressure => "Peer Pressure",
            Self::ExtracurricularActivities => "Extracurriculars",
            Self::Bullying => "Bullying Exposure",
        }
    }

    /// Negative weights mark protective features where higher is better.
    pub const fn weight(self) -> f64 {
        match self {
            Self::AnxietyLevel => 0.15,
            Self::Depression => 0.15,
            Self::SleepQuality => -0.10,
            Self::AcademicPerformance => -0.08,
            Self::SocialSupport => -0.08,
            Self::PeerPressure => 0.07,
            Self::Bullying => 0.10,
            Self::StudyLoad => 0.06,
            Self::SelfEsteem => -0.08,
            Self::MentalHealthHistory => 0.08,
            Self::FutureCareerConcerns => 0.05,
            Self::LivingConditions => -0.04,
            Self::Safety => -0.04,
            Self::BasicNeeds => -0.04,
            Self::TeacherStudentRelationship => -0.03,
            Self::NoiseLevel => 0.03,
            Self::Headache => 0.02,
            Self::BloodPressure => 0.02,
            Self::BreathingProblem => 0.02,
            Self::ExtracurricularActivities => -0.02,
        }
    }

    pub const fn population_mean(self) -> f64 {
        match self {
            Self::AnxietyLevel => 10.5,
            Self::Depression => 12.0,
            Self::SleepQuality => 2.5,
            Self::AcademicPerformance => 2.5,
            Self::SocialSupport => 2.0,
            Self::PeerPressure => 2.5,
            Self::Bullying => 2.5,
            Self::StudyLoad => 3.0,
            Self::SelfEsteem => 17.0,
            Self::MentalHealthHistory => 0.5,
            Self::FutureCareerConcerns => 3.0,
            Self::LivingConditions => 2.5,
            Self::Safety => 2.5,
            Self::BasicNeeds => 3.0,
            Self::TeacherStudentRelationship => 2.5,
            Self::NoiseLevel => 2.5,
            Self::Headache => 2.5,
            Self::BloodPressure => 2.0,
            Self::BreathingProblem => 2.5,
            Self::ExtracurricularActivities => 2.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn weighted_order_covers_every_feature_once() {
        let unique: HashSet<_> = Feature::weighted().into_iter().collect();
        assert_eq!(unique.len(), 20);
    }

    #[test]
    fn value_reads_the_matching_field() {
        let row = FeatureRow {
            anxiety_level: 14,
            bullying: 4,
            ..FeatureRow::default()
        };
        assert_eq!(row.value(Feature::AnxietyLevel), 14);
        assert_eq!(row.value(Feature::Bullying), 4);
        assert_eq!(row.value(Feature::Depression), 0);
    }
}
