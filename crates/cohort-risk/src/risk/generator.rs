//! Synthetic cohort generator used for demos and local development.

use super::anomaly::round_to;
use super::domain::{StudentId, StudentSnapshot};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

pub const FIRST_STUDENT_ID: u32 = 1000;

const DEPARTMENTS: [&str; 10] = [
    "Computer Science",
    "Data Science",
    "Mechanical Engineering",
    "Electrical Engineering",
    "Business Administration",
    "Psychology",
    "Chemistry",
    "Biomedical Engineering",
    "Mathematics",
    "Physics",
];

const FIRST_NAMES: [&str; 50] = [
    "Alex", "Sarah", "Marcus", "Emily", "James", "Priya", "David", "Olivia", "Michael", "Emma",
    "Daniel", "Sophia", "Ethan", "Isabella", "Noah", "Mia", "Liam", "Ava", "Lucas", "Charlotte",
    "Mason", "Amelia", "Logan", "Harper", "Benjamin", "Evelyn", "Elijah", "Abigail", "Oliver",
    "Ella", "Jacob", "Scarlett", "Aiden", "Grace", "Jack", "Lily", "Henry", "Aria", "Sebastian",
    "Chloe", "Owen", "Zoey", "Samuel", "Penelope", "Ryan", "Layla", "Nathan", "Riley", "Leo",
    "Nora",
];

const LAST_NAMES: [&str; 50] = [
    "Thompson", "Chen", "Johnson", "Rodriguez", "Wilson", "Patel", "Kim", "Martinez", "Brown",
    "Davis", "Miller", "Garcia", "Anderson", "Taylor", "Thomas", "Moore", "Jackson", "White",
    "Harris", "Martin", "Clark", "Lewis", "Robinson", "Walker", "Young", "Allen", "King",
    "Wright", "Scott", "Torres", "Nguyen", "Hill", "Flores", "Green", "Adams", "Nelson", "Baker",
    "Hall", "Rivera", "Campbell", "Mitchell", "Carter", "Roberts", "Gomez", "Phillips", "Evans",
    "Turner", "Diaz", "Parker", "Cruz",
];

/// Behavioral archetype that drives the value ranges of a generated student.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentProfile {
    Excellent,
    Good,
    Moderate,
    Struggling,
    Critical,
}

impl StudentProfile {
    const ALL: [Self; 5] = [
        Self::Excellent,
        Self::Good,
        Self::Moderate,
        Self::Struggling,
        Self::Critical,
    ];
    /// Percent share of each profile, in `ALL` order.
    const WEIGHTS: [u32; 5] = [15, 25, 30, 20, 10];

    fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mix = WeightedIndex::new(Self::WEIGHTS).expect("profile weights are non-zero");
        Self::ALL[mix.sample(rng)]
    }
}

struct Metrics {
    attendance: f64,
    late: u32,
    missed: u32,
    workload: i64,
    previous_attendance: f64,
    previous_workload: i64,
}

fn metrics_for<R: Rng + ?Sized>(profile: StudentProfile, rng: &mut R) -> Metrics {
    match profile {
        StudentProfile::Excellent => {
            let attendance = rng.gen_range(92.0..=100.0);
            let workload = rng.gen_range(6..=10);
            Metrics {
                attendance,
                late: 0,
                missed: 0,
                workload,
                previous_attendance: attendance + rng.gen_range(-2.0..=2.0),
                previous_workload: workload,
            }
        }
        StudentProfile::Good => {
            let attendance = rng.gen_range(82.0..=94.0);
            let workload = rng.gen_range(8..=12);
            Metrics {
                attendance,
                late: rng.gen_range(0..=1),
                missed: 0,
                workload,
                previous_attendance: attendance + rng.gen_range(-5.0..=5.0),
                previous_workload: workload - rng.gen_range(0..=2),
            }
        }
        StudentProfile::Moderate => {
            let attendance = rng.gen_range(72.0..=85.0);
            let workload = rng.gen_range(10..=15);
            Metrics {
                attendance,
                late: rng.gen_range(1..=3),
                missed: rng.gen_range(0..=1),
                workload,
                previous_attendance: attendance + rng.gen_range(5.0..=15.0),
                previous_workload: workload - rng.gen_range(2..=5),
            }
        }
        StudentProfile::Struggling => {
            let attendance = rng.gen_range(62.0..=78.0);
            let workload = rng.gen_range(14..=20);
            Metrics {
                attendance,
                late: rng.gen_range(2..=5),
                missed: rng.gen_range(1..=2),
                workload,
                previous_attendance: attendance + rng.gen_range(10.0..=20.0),
                previous_workload: workload - rng.gen_range(4..=8),
            }
        }
        StudentProfile::Critical => {
            let attendance = rng.gen_range(50.0..=68.0);
            let workload = rng.gen_range(16..=25);
            Metrics {
                attendance,
                late: rng.gen_range(4..=8),
                missed: rng.gen_range(2..=4),
                workload,
                previous_attendance: attendance + rng.gen_range(15.0..=30.0),
                previous_workload: workload - rng.gen_range(6..=12),
            }
        }
    }
}

/// Generates `count` students with ids starting at 1000.
pub fn generate_cohort<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<StudentSnapshot> {
    let mut cohort = Vec::with_capacity(count);

    for index in 0..count {
        let first = FIRST_NAMES[index % FIRST_NAMES.len()];
        let last = LAST_NAMES[index % LAST_NAMES.len()];
        let profile = StudentProfile::pick(rng);
        let metrics = metrics_for(profile, rng);
        let initial = last.chars().next().unwrap_or('x').to_ascii_lowercase();
        let department = DEPARTMENTS.choose(rng).copied().unwrap_or(DEPARTMENTS[0]);

        cohort.push(StudentSnapshot {
            student_id: StudentId(FIRST_STUDENT_ID + index as u32),
            name: format!("{first} {last}"),
            email: format!("{}.{initial}@university.edu", first.to_lowercase()),
            department: department.to_string(),
            year: rng.gen_range(1..=4),
            attendance_rate: round_to(metrics.attendance, 1),
            late_submissions: metrics.late,
            missed_submissions: metrics.missed,
            workload_tasks: metrics.workload.max(0) as u32,
            previous_attendance: round_to(metrics.previous_attendance.clamp(0.0, 100.0), 1),
            previous_workload: metrics.previous_workload.max(1) as u32,
        });
    }

    cohort
}
