//! Demo data generators for the roster service.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{
    AoHistory, AoPerson, AoScheduleRequest, AoSlot, DayType, DutyType, NaHistory, NaPerson,
    NaScheduleRequest, NaSlot, Period, Seat, Segment, UnavailabilityEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }

    fn parameters(&self) -> DemoDataParameters {
        match self {
            DemoData::Small => DemoDataParameters {
                days_in_schedule: 14,
                person_count: 8,
                weekday_a_seats: 2,
                blocks_per_person: 2,
            },
            DemoData::Large => DemoDataParameters {
                days_in_schedule: 28,
                person_count: 20,
                weekday_a_seats: 3,
                blocks_per_person: 4,
            },
        }
    }
}

struct DemoDataParameters {
    days_in_schedule: i64,
    person_count: usize,
    weekday_a_seats: usize,
    blocks_per_person: usize,
}

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

const NAMES: &[&str] = &[
    "Ada", "Berk", "Ceren", "Deniz", "Ece", "Ferit", "Gül", "Hakan", "İpek", "Kaan", "Lale",
    "Mert", "Nur", "Okan", "Pelin", "Rüzgar", "Selin", "Tolga", "Umut", "Yasemin",
];

/// Generates a demo AÖ request: A/B/C slots on weekdays, D/E/F on weekends,
/// seeded histories and a sprinkle of unavailability.
pub fn generate_ao(demo: DemoData) -> AoScheduleRequest {
    let params = demo.parameters();
    let mut rng = StdRng::seed_from_u64(0);

    let start_date = find_next_monday(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    let end_date = start_date + Duration::days(params.days_in_schedule - 1);

    let persons: Vec<AoPerson> = (0..params.person_count)
        .map(|i| {
            let expected = rng.gen_range(10..40);
            let drift = rng.gen_range(-3i64..=3);
            let nights = rng.gen_range(0..8);
            let weekends = rng.gen_range(0..8);
            AoPerson {
                id: format!("u{}", i + 1),
                name: NAMES[i % NAMES.len()].to_string(),
                contact: None,
                likes_night: rng.gen_bool(0.2),
                dislikes_weekend: rng.gen_bool(0.3),
                history: AoHistory {
                    total_all_time: (expected + drift).max(0),
                    expected_total: expected,
                    weekday_count: expected - weekends,
                    weekend_count: weekends,
                    count_a: expected / 3,
                    count_b: expected / 4,
                    count_c: nights / 2,
                    count_d: weekends / 2,
                    count_e: weekends / 2,
                    count_f: nights / 2,
                    count_night_all_time: nights,
                    count_weekend_all_time: weekends,
                },
            }
        })
        .collect();

    let mut slots = Vec::new();
    for day in 0..params.days_in_schedule {
        let date = start_date + Duration::days(day);
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        if weekend {
            for duty in [DutyType::D, DutyType::E, DutyType::F] {
                slots.push(slot(date, duty, DayType::Weekend, 1, slots.len()));
            }
        } else {
            slots.push(slot(
                date,
                DutyType::A,
                DayType::Weekday,
                params.weekday_a_seats,
                slots.len(),
            ));
            slots.push(slot(date, DutyType::B, DayType::Weekday, 1, slots.len()));
            slots.push(slot(date, DutyType::C, DayType::Weekday, 1, slots.len()));
        }
    }

    let unavailability = pick_blocks(
        &mut rng,
        persons.iter().map(|p| p.id.clone()).collect(),
        slots.iter().map(|s| s.id.clone()).collect(),
        params.blocks_per_person,
    );

    AoScheduleRequest {
        period: Period {
            id: "demo-ao".into(),
            name: format!("Demo roster starting {}", start_date),
            start_date,
            end_date,
        },
        persons,
        slots,
        unavailability,
    }
}

/// Generates a demo NA request: one MORNING and one EVENING A-slot per day.
pub fn generate_na(demo: DemoData) -> NaScheduleRequest {
    let params = demo.parameters();
    let mut rng = StdRng::seed_from_u64(0);

    let start_date = find_next_monday(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    let end_date = start_date + Duration::days(params.days_in_schedule - 1);

    let persons: Vec<NaPerson> = (0..params.person_count)
        .map(|i| {
            let total = rng.gen_range(5..30);
            let mornings = rng.gen_range(0..=total);
            NaPerson {
                id: format!("u{}", i + 1),
                name: NAMES[i % NAMES.len()].to_string(),
                contact: None,
                likes_morning: rng.gen_bool(0.3),
                likes_evening: rng.gen_bool(0.3),
                history: NaHistory {
                    total_all_time: total,
                    count_a_all_time: total,
                    count_morning_all_time: mornings,
                    count_evening_all_time: total - mornings,
                },
            }
        })
        .collect();

    let mut slots = Vec::new();
    for day in 0..params.days_in_schedule {
        let date = start_date + Duration::days(day);
        for (segment, seats) in [(Segment::Morning, 2), (Segment::Evening, 1)] {
            let idx = slots.len();
            slots.push(NaSlot {
                id: format!("slot{}", idx + 1),
                date,
                segment,
                seats: (0..seats)
                    .map(|k| Seat {
                        id: format!("slot{}-{}", idx + 1, k + 1),
                        role: None,
                    })
                    .collect(),
            });
        }
    }

    let unavailability = pick_blocks(
        &mut rng,
        persons.iter().map(|p| p.id.clone()).collect(),
        slots.iter().map(|s| s.id.clone()).collect(),
        params.blocks_per_person,
    );

    NaScheduleRequest {
        period: Period {
            id: "demo-na".into(),
            name: format!("Demo half-day roster starting {}", start_date),
            start_date,
            end_date,
        },
        persons,
        slots,
        unavailability,
    }
}

fn slot(date: NaiveDate, duty: DutyType, day_type: DayType, seats: usize, idx: usize) -> AoSlot {
    AoSlot {
        id: format!("slot{}", idx + 1),
        date,
        duty_type: duty,
        day_type,
        seats: (0..seats)
            .map(|k| Seat {
                id: format!("slot{}-{}", idx + 1, k + 1),
                role: None,
            })
            .collect(),
    }
}

fn pick_blocks(
    rng: &mut StdRng,
    person_ids: Vec<String>,
    slot_ids: Vec<String>,
    per_person: usize,
) -> Vec<UnavailabilityEntry> {
    let mut entries = Vec::new();
    for person_id in &person_ids {
        let count = rng.gen_range(0..=per_person);
        for slot_id in slot_ids.choose_multiple(rng, count) {
            entries.push(UnavailabilityEntry {
                person_id: person_id.clone(),
                slot_id: slot_id.clone(),
            });
        }
    }
    entries
}

fn find_next_monday(date: NaiveDate) -> NaiveDate {
    let days_until_monday = match date.weekday() {
        Weekday::Mon => 0,
        Weekday::Tue => 6,
        Weekday::Wed => 5,
        Weekday::Thu => 4,
        Weekday::Fri => 3,
        Weekday::Sat => 2,
        Weekday::Sun => 1,
    };
    date + Duration::days(days_until_monday)
}
