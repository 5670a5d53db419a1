//! Domain model for the on-call roster optimization service.
//!
//! Request/response types for both scheduling modes plus the request-scoped
//! [`RosterContext`] the builders work on: day offsets, blocked pairs,
//! per-person ideal shares and seniority ranks, all computed once per
//! request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Error taxonomy of the scheduling core.
///
/// Timeouts and infeasibility are not errors: they surface through
/// [`SolverStatus`] in a normal response.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("solver fault: {0}")]
    SolverFault(String),
}

/// Scheduling mode. AÖ covers the six weekday/weekend duty bands,
/// NA covers A-shifts split into morning/evening segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ao,
    Na,
}

/// Duty bands of the AÖ roster: A/B/C are weekday day/evening/night,
/// D/E/F are weekend day/evening/night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DutyType {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl DutyType {
    pub fn is_night(self) -> bool {
        matches!(self, DutyType::C | DutyType::F)
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, DutyType::D | DutyType::E | DutyType::F)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayType {
    Weekday,
    Weekend,
}

/// Half-day segment of an NA A-shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Segment {
    Morning,
    Evening,
}

/// Sub-role on an A-shift seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatRole {
    Desk,
    Operator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Immutable AÖ history record carried per person.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AoHistory {
    pub total_all_time: i64,
    /// What the person should have accumulated by now; zero marks a newcomer.
    pub expected_total: i64,
    pub weekday_count: i64,
    pub weekend_count: i64,
    pub count_a: i64,
    pub count_b: i64,
    pub count_c: i64,
    pub count_d: i64,
    pub count_e: i64,
    pub count_f: i64,
    pub count_night_all_time: i64,
    pub count_weekend_all_time: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AoPerson {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default)]
    pub likes_night: bool,
    #[serde(default)]
    pub dislikes_weekend: bool,
    #[serde(default)]
    pub history: AoHistory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NaHistory {
    pub total_all_time: i64,
    pub count_a_all_time: i64,
    pub count_morning_all_time: i64,
    pub count_evening_all_time: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaPerson {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default)]
    pub likes_morning: bool,
    #[serde(default)]
    pub likes_evening: bool,
    #[serde(default)]
    pub history: NaHistory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    #[serde(default)]
    pub role: Option<SeatRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AoSlot {
    pub id: String,
    pub date: NaiveDate,
    pub duty_type: DutyType,
    pub day_type: DayType,
    pub seats: Vec<Seat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaSlot {
    pub id: String,
    pub date: NaiveDate,
    pub segment: Segment,
    pub seats: Vec<Seat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailabilityEntry {
    pub person_id: String,
    pub slot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AoScheduleRequest {
    pub period: Period,
    pub persons: Vec<AoPerson>,
    pub slots: Vec<AoSlot>,
    #[serde(default)]
    pub unavailability: Vec<UnavailabilityEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaScheduleRequest {
    pub period: Period,
    pub persons: Vec<NaPerson>,
    pub slots: Vec<NaSlot>,
    #[serde(default)]
    pub unavailability: Vec<UnavailabilityEntry>,
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverStatus {
    /// Proven optimum.
    Optimal,
    /// Best solution found within the wall-clock budget.
    Feasible,
    /// No assignment satisfies the hard constraints.
    Infeasible,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub slot_id: String,
    pub seat_id: String,
    pub person_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_role: Option<SeatRole>,
    pub is_extra: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMeta {
    pub base: i64,
    pub max_shifts: i64,
    pub min_shifts: i64,
    pub users_at_base_plus2: usize,
    pub unavailability_violations: usize,
    pub warnings: Vec<String>,
    pub solver_status: SolverStatus,
    pub solve_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub assignments: Vec<Assignment>,
    pub meta: ScheduleMeta,
}

// ============================================================================
// Roster context
// ============================================================================

/// What a slot occupies on the calendar: an AÖ duty band or an NA segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Duty(DutyType),
    Segment(Segment),
}

impl SlotKind {
    pub fn is_night(self) -> bool {
        matches!(self, SlotKind::Duty(d) if d.is_night())
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, SlotKind::Duty(d) if d.is_weekend())
    }

    /// True for slots whose seats carry DESK/OPERATOR roles.
    pub fn has_roles(self) -> bool {
        matches!(self, SlotKind::Duty(DutyType::A) | SlotKind::Segment(_))
    }
}

#[derive(Debug, Clone)]
pub struct SlotCtx {
    pub id: String,
    /// Day offset from the period start, zero-based.
    pub day: usize,
    pub kind: SlotKind,
    pub seats: Vec<Seat>,
}

#[derive(Debug, Clone)]
pub struct PersonCtx {
    pub id: String,
    /// Target share for the period, history-adjusted in AÖ mode.
    pub ideal: i64,
    /// Position when persons are sorted ascending by `(totalAllTime, id)`;
    /// higher ranks are penalized first when breaking ties.
    pub rank: usize,
    pub likes_night: bool,
    pub dislikes_weekend: bool,
    pub likes_morning: bool,
    pub likes_evening: bool,
}

/// Precomputed, request-scoped view the constraint and objective builders
/// operate on. Construction performs all semantic validation; a context that
/// exists is safe to build a model from.
#[derive(Debug, Clone)]
pub struct RosterContext {
    pub mode: Mode,
    pub period_start: NaiveDate,
    pub day_count: usize,
    pub base: i64,
    pub total_seats: usize,
    pub persons: Vec<PersonCtx>,
    pub slots: Vec<SlotCtx>,
    /// Slot indices per day offset.
    pub slots_by_day: Vec<Vec<usize>>,
    /// Blocked `(person_idx, slot_idx)` pairs from the unavailability list.
    pub blocked: HashSet<(usize, usize)>,
    /// Per slot: every person is blocked, so a violation there is unavoidable.
    pub fully_blocked_slots: Vec<bool>,
}

impl RosterContext {
    pub fn from_ao(req: &AoScheduleRequest) -> Result<Self, ScheduleError> {
        let persons: Vec<ProtoPerson> = req
            .persons
            .iter()
            .map(|p| ProtoPerson {
                id: p.id.clone(),
                total_all_time: p.history.total_all_time,
                expected_total: p.history.expected_total,
                likes_night: p.likes_night,
                dislikes_weekend: p.dislikes_weekend,
                likes_morning: false,
                likes_evening: false,
            })
            .collect();
        let slots: Vec<ProtoSlot> = req
            .slots
            .iter()
            .map(|s| ProtoSlot {
                id: s.id.clone(),
                date: s.date,
                kind: SlotKind::Duty(s.duty_type),
                seats: s.seats.clone(),
            })
            .collect();
        Self::build(Mode::Ao, &req.period, persons, slots, &req.unavailability)
    }

    pub fn from_na(req: &NaScheduleRequest) -> Result<Self, ScheduleError> {
        let persons: Vec<ProtoPerson> = req
            .persons
            .iter()
            .map(|p| ProtoPerson {
                id: p.id.clone(),
                total_all_time: p.history.total_all_time,
                expected_total: 0,
                likes_night: false,
                dislikes_weekend: false,
                likes_morning: p.likes_morning,
                likes_evening: p.likes_evening,
            })
            .collect();
        let slots: Vec<ProtoSlot> = req
            .slots
            .iter()
            .map(|s| ProtoSlot {
                id: s.id.clone(),
                date: s.date,
                kind: SlotKind::Segment(s.segment),
                seats: s.seats.clone(),
            })
            .collect();
        Self::build(Mode::Na, &req.period, persons, slots, &req.unavailability)
    }

    fn build(
        mode: Mode,
        period: &Period,
        persons: Vec<ProtoPerson>,
        slots: Vec<ProtoSlot>,
        unavailability: &[UnavailabilityEntry],
    ) -> Result<Self, ScheduleError> {
        if persons.is_empty() {
            return Err(ScheduleError::InvalidRequest(
                "at least one person is required".into(),
            ));
        }
        if period.start_date > period.end_date {
            return Err(ScheduleError::InvalidRequest(format!(
                "period start {} is after period end {}",
                period.start_date, period.end_date
            )));
        }
        let day_count = (period.end_date - period.start_date).num_days() as usize + 1;

        let mut person_index: HashMap<&str, usize> = HashMap::new();
        for (i, p) in persons.iter().enumerate() {
            if person_index.insert(p.id.as_str(), i).is_some() {
                return Err(ScheduleError::InvalidRequest(format!(
                    "duplicate person id '{}'",
                    p.id
                )));
            }
        }

        let mut slot_index: HashMap<&str, usize> = HashMap::new();
        let mut seat_ids: HashSet<&str> = HashSet::new();
        let mut slot_ctxs = Vec::with_capacity(slots.len());
        let mut slots_by_day: Vec<Vec<usize>> = vec![Vec::new(); day_count];
        let mut total_seats = 0usize;

        for (i, s) in slots.iter().enumerate() {
            if slot_index.insert(s.id.as_str(), i).is_some() {
                return Err(ScheduleError::InvalidRequest(format!(
                    "duplicate slot id '{}'",
                    s.id
                )));
            }
            if s.seats.is_empty() {
                return Err(ScheduleError::InvalidRequest(format!(
                    "slot '{}' has no seats",
                    s.id
                )));
            }
            if s.date < period.start_date || s.date > period.end_date {
                return Err(ScheduleError::InvalidRequest(format!(
                    "slot '{}' date {} is outside the period",
                    s.id, s.date
                )));
            }
            for seat in &s.seats {
                if !seat_ids.insert(seat.id.as_str()) {
                    return Err(ScheduleError::InvalidRequest(format!(
                        "duplicate seat id '{}'",
                        seat.id
                    )));
                }
            }
            let day = (s.date - period.start_date).num_days() as usize;
            slots_by_day[day].push(i);
            total_seats += s.seats.len();
            slot_ctxs.push(SlotCtx {
                id: s.id.clone(),
                day,
                kind: s.kind,
                seats: s.seats.clone(),
            });
        }

        let mut blocked: HashSet<(usize, usize)> = HashSet::new();
        for entry in unavailability {
            let p = *person_index.get(entry.person_id.as_str()).ok_or_else(|| {
                ScheduleError::InvalidRequest(format!(
                    "unavailability references unknown person '{}'",
                    entry.person_id
                ))
            })?;
            let s = *slot_index.get(entry.slot_id.as_str()).ok_or_else(|| {
                ScheduleError::InvalidRequest(format!(
                    "unavailability references unknown slot '{}'",
                    entry.slot_id
                ))
            })?;
            blocked.insert((p, s));
        }
        let fully_blocked_slots: Vec<bool> = (0..slot_ctxs.len())
            .map(|s| (0..persons.len()).all(|p| blocked.contains(&(p, s))))
            .collect();

        let base = (total_seats / persons.len()) as i64;

        // Seniority ranks: ascending (totalAllTime, id), ties by id.
        let mut order: Vec<usize> = (0..persons.len()).collect();
        order.sort_by(|&a, &b| {
            (persons[a].total_all_time, persons[a].id.as_str())
                .cmp(&(persons[b].total_all_time, persons[b].id.as_str()))
        });
        let mut rank = vec![0usize; persons.len()];
        for (r, &p) in order.iter().enumerate() {
            rank[p] = r;
        }

        let person_ctxs: Vec<PersonCtx> = persons
            .iter()
            .enumerate()
            .map(|(i, p)| PersonCtx {
                id: p.id.clone(),
                ideal: match mode {
                    Mode::Ao => p.ideal_ao(base),
                    Mode::Na => base,
                },
                rank: rank[i],
                likes_night: p.likes_night,
                dislikes_weekend: p.dislikes_weekend,
                likes_morning: p.likes_morning,
                likes_evening: p.likes_evening,
            })
            .collect();

        Ok(Self {
            mode,
            period_start: period.start_date,
            day_count,
            base,
            total_seats,
            persons: person_ctxs,
            slots: slot_ctxs,
            slots_by_day,
            blocked,
            fully_blocked_slots,
        })
    }

    /// Per-person target share of a category, rounded to nearest.
    pub fn rounded_share(&self, category_seats: usize) -> i64 {
        let n = self.persons.len() as i64;
        ((category_seats as i64) * 2 + n) / (2 * n)
    }
}

/// Mode-erased person input for context construction.
struct ProtoPerson {
    id: String,
    total_all_time: i64,
    expected_total: i64,
    likes_night: bool,
    dislikes_weekend: bool,
    likes_morning: bool,
    likes_evening: bool,
}

impl ProtoPerson {
    /// History-adjusted ideal: `clamp(base - fark, 0, base + 2)` where
    /// `fark = totalAllTime - expectedTotal`. Newcomers (zero expected
    /// total) take the plain base share.
    fn ideal_ao(&self, base: i64) -> i64 {
        let fark = if self.expected_total == 0 {
            0
        } else {
            self.total_all_time - self.expected_total
        };
        (base - fark).clamp(0, base + 2)
    }
}

struct ProtoSlot {
    id: String,
    date: NaiveDate,
    kind: SlotKind,
    seats: Vec<Seat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, d).unwrap()
    }

    fn period(start: u32, end: u32) -> Period {
        Period {
            id: "p1".into(),
            name: "December".into(),
            start_date: date(start),
            end_date: date(end),
        }
    }

    fn person(id: &str, total: i64, expected: i64) -> AoPerson {
        AoPerson {
            id: id.into(),
            name: id.to_uppercase(),
            contact: None,
            likes_night: false,
            dislikes_weekend: false,
            history: AoHistory {
                total_all_time: total,
                expected_total: expected,
                ..AoHistory::default()
            },
        }
    }

    fn slot(id: &str, day: u32, duty: DutyType, seats: &[&str]) -> AoSlot {
        AoSlot {
            id: id.into(),
            date: date(day),
            duty_type: duty,
            day_type: if duty.is_weekend() {
                DayType::Weekend
            } else {
                DayType::Weekday
            },
            seats: seats
                .iter()
                .map(|s| Seat {
                    id: (*s).into(),
                    role: None,
                })
                .collect(),
        }
    }

    fn request(persons: Vec<AoPerson>, slots: Vec<AoSlot>) -> AoScheduleRequest {
        AoScheduleRequest {
            period: period(1, 7),
            persons,
            slots,
            unavailability: vec![],
        }
    }

    #[test]
    fn base_is_floor_of_seats_over_persons() {
        let req = request(
            vec![person("u1", 0, 0), person("u2", 0, 0)],
            vec![
                slot("s1", 1, DutyType::A, &["t1", "t2"]),
                slot("s2", 2, DutyType::B, &["t3"]),
                slot("s3", 3, DutyType::C, &["t4", "t5"]),
            ],
        );
        let ctx = RosterContext::from_ao(&req).unwrap();
        assert_eq!(ctx.total_seats, 5);
        assert_eq!(ctx.base, 2);
    }

    #[test]
    fn ideal_pulls_back_historical_surplus() {
        // u1 is 2 shifts ahead of expectation, u2 is 1 behind.
        let req = request(
            vec![person("u1", 12, 10), person("u2", 9, 10)],
            vec![
                slot("s1", 1, DutyType::A, &["t1", "t2", "t3"]),
                slot("s2", 2, DutyType::A, &["t4", "t5", "t6"]),
            ],
        );
        let ctx = RosterContext::from_ao(&req).unwrap();
        assert_eq!(ctx.base, 3);
        assert_eq!(ctx.persons[0].ideal, 1); // 3 - 2
        assert_eq!(ctx.persons[1].ideal, 4); // 3 + 1
    }

    #[test]
    fn ideal_is_clamped_to_zero_and_base_plus_two() {
        let req = request(
            vec![person("u1", 20, 10), person("u2", 1, 10)],
            vec![
                slot("s1", 1, DutyType::A, &["t1", "t2", "t3"]),
                slot("s2", 2, DutyType::A, &["t4", "t5", "t6"]),
            ],
        );
        let ctx = RosterContext::from_ao(&req).unwrap();
        assert_eq!(ctx.persons[0].ideal, 0); // 3 - 10 clamped up
        assert_eq!(ctx.persons[1].ideal, 5); // 3 + 9 clamped to base + 2
    }

    #[test]
    fn newcomer_gets_plain_base_share() {
        let req = request(
            vec![person("u1", 7, 0), person("u2", 0, 0)],
            vec![slot("s1", 1, DutyType::A, &["t1", "t2"])],
        );
        let ctx = RosterContext::from_ao(&req).unwrap();
        // expectedTotal == 0 means no pull, even with prior totals on record.
        assert_eq!(ctx.persons[0].ideal, 1);
        assert_eq!(ctx.persons[1].ideal, 1);
    }

    #[test]
    fn day_offsets_and_slots_by_day() {
        let req = request(
            vec![person("u1", 0, 0)],
            vec![
                slot("s1", 1, DutyType::A, &["t1"]),
                slot("s2", 3, DutyType::B, &["t2"]),
                slot("s3", 3, DutyType::C, &["t3"]),
            ],
        );
        let ctx = RosterContext::from_ao(&req).unwrap();
        assert_eq!(ctx.day_count, 7);
        assert_eq!(ctx.slots[0].day, 0);
        assert_eq!(ctx.slots[1].day, 2);
        assert_eq!(ctx.slots_by_day[2], vec![1, 2]);
        assert!(ctx.slots_by_day[1].is_empty());
    }

    #[test]
    fn seniority_ranks_order_by_total_then_id() {
        let req = request(
            vec![person("b", 5, 5), person("a", 5, 5), person("c", 1, 5)],
            vec![slot("s1", 1, DutyType::A, &["t1"])],
        );
        let ctx = RosterContext::from_ao(&req).unwrap();
        // c has the lowest total; a and b tie on total, a wins by id.
        assert_eq!(ctx.persons[2].rank, 0); // c
        assert_eq!(ctx.persons[1].rank, 1); // a
        assert_eq!(ctx.persons[0].rank, 2); // b
    }

    #[test]
    fn rejects_inverted_period() {
        let mut req = request(vec![person("u1", 0, 0)], vec![]);
        req.period = period(7, 1);
        assert!(matches!(
            RosterContext::from_ao(&req),
            Err(ScheduleError::InvalidRequest(_))
        ));
    }

    #[test]
    fn rejects_empty_seats_and_duplicates() {
        let mut empty_seats = request(
            vec![person("u1", 0, 0)],
            vec![slot("s1", 1, DutyType::A, &[])],
        );
        assert!(RosterContext::from_ao(&empty_seats).is_err());

        empty_seats.slots = vec![
            slot("s1", 1, DutyType::A, &["t1"]),
            slot("s1", 2, DutyType::B, &["t2"]),
        ];
        assert!(RosterContext::from_ao(&empty_seats).is_err());

        let dup_seat = request(
            vec![person("u1", 0, 0)],
            vec![
                slot("s1", 1, DutyType::A, &["t1"]),
                slot("s2", 2, DutyType::B, &["t1"]),
            ],
        );
        assert!(RosterContext::from_ao(&dup_seat).is_err());

        let dup_person = request(
            vec![person("u1", 0, 0), person("u1", 0, 0)],
            vec![slot("s1", 1, DutyType::A, &["t1"])],
        );
        assert!(RosterContext::from_ao(&dup_person).is_err());
    }

    #[test]
    fn rejects_unknown_unavailability_references() {
        let mut req = request(
            vec![person("u1", 0, 0)],
            vec![slot("s1", 1, DutyType::A, &["t1"])],
        );
        req.unavailability = vec![UnavailabilityEntry {
            person_id: "ghost".into(),
            slot_id: "s1".into(),
        }];
        assert!(RosterContext::from_ao(&req).is_err());
    }

    #[test]
    fn rejects_slot_outside_period() {
        let req = request(
            vec![person("u1", 0, 0)],
            vec![slot("s1", 9, DutyType::A, &["t1"])],
        );
        assert!(RosterContext::from_ao(&req).is_err());
    }

    #[test]
    fn fully_blocked_slot_is_flagged() {
        let mut req = request(
            vec![person("u1", 0, 0), person("u2", 0, 0)],
            vec![
                slot("s1", 1, DutyType::A, &["t1"]),
                slot("s2", 2, DutyType::A, &["t2"]),
            ],
        );
        req.unavailability = vec![
            UnavailabilityEntry {
                person_id: "u1".into(),
                slot_id: "s1".into(),
            },
            UnavailabilityEntry {
                person_id: "u2".into(),
                slot_id: "s1".into(),
            },
            UnavailabilityEntry {
                person_id: "u1".into(),
                slot_id: "s2".into(),
            },
        ];
        let ctx = RosterContext::from_ao(&req).unwrap();
        assert_eq!(ctx.fully_blocked_slots, vec![true, false]);
    }

    #[test]
    fn na_context_uses_base_as_ideal() {
        let req = NaScheduleRequest {
            period: period(1, 2),
            persons: vec![
                NaPerson {
                    id: "u1".into(),
                    name: "U1".into(),
                    contact: None,
                    likes_morning: true,
                    likes_evening: false,
                    history: NaHistory {
                        total_all_time: 40,
                        ..NaHistory::default()
                    },
                },
                NaPerson {
                    id: "u2".into(),
                    name: "U2".into(),
                    contact: None,
                    likes_morning: false,
                    likes_evening: true,
                    history: NaHistory::default(),
                },
            ],
            slots: vec![
                NaSlot {
                    id: "s1".into(),
                    date: date(1),
                    segment: Segment::Morning,
                    seats: vec![Seat {
                        id: "t1".into(),
                        role: None,
                    }],
                },
                NaSlot {
                    id: "s2".into(),
                    date: date(1),
                    segment: Segment::Evening,
                    seats: vec![Seat {
                        id: "t2".into(),
                        role: None,
                    }],
                },
            ],
            unavailability: vec![],
        };
        let ctx = RosterContext::from_na(&req).unwrap();
        assert_eq!(ctx.mode, Mode::Na);
        assert_eq!(ctx.base, 1);
        assert!(ctx.persons.iter().all(|p| p.ideal == 1));
        assert!(ctx.persons[0].likes_morning);
        assert_eq!(ctx.slots[1].kind, SlotKind::Segment(Segment::Evening));
    }

    #[test]
    fn rounded_share_rounds_to_nearest() {
        let req = request(
            vec![person("u1", 0, 0), person("u2", 0, 0), person("u3", 0, 0)],
            vec![slot("s1", 1, DutyType::A, &["t1", "t2"])],
        );
        let ctx = RosterContext::from_ao(&req).unwrap();
        assert_eq!(ctx.rounded_share(2), 1); // 2/3 rounds up
        assert_eq!(ctx.rounded_share(4), 1); // 4/3 rounds down
        assert_eq!(ctx.rounded_share(5), 2); // 5/3 rounds up
    }
}
