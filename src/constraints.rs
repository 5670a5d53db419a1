//! Constraint and objective construction for the roster model.
//!
//! One binary variable `x[person][slot][seat]` per assignable triple. The
//! hard rules are posted as inviolable linear constraints; every soft rule
//! becomes a weighted term over auxiliary variables (deviation pairs,
//! day/streak indicators, window slacks) in a single minimization objective.

use good_lp::{constraint, variable, Constraint, Expression, ProblemVariables, Variable};
use tracing::debug;

use crate::config::Weights;
use crate::domain::{DutyType, Mode, RosterContext, Segment, SlotKind};

/// A fully built model, ready to hand to the solver driver.
pub struct RosterModel {
    pub vars: ProblemVariables,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
    /// Assignment variables indexed `[person][slot][seat]`.
    pub x: Vec<Vec<Vec<Variable>>>,
}

/// Builds the model for either mode. `cap` is the hard per-person total
/// (base + 2 normally, base + 3 after the one infeasibility relaxation).
pub fn build(ctx: &RosterContext, weights: &Weights, cap: i64) -> RosterModel {
    let mut b = ModelBuilder::new(ctx, weights);

    b.hard_seat_exclusivity();
    b.hard_single_occupancy();
    b.hard_daily_cap();
    b.hard_total_cap(cap);
    if ctx.mode == Mode::Ao {
        b.hard_forbidden_transitions();
    }
    b.hard_coverage();

    b.soft_unavailability();
    b.soft_ideal_deviation();
    b.soft_consecutive_days();
    b.soft_weekly_clustering();
    b.soft_double_day();
    match ctx.mode {
        Mode::Ao => {
            b.soft_zero_assignment();
            b.soft_dispersion(|k| k == SlotKind::Duty(DutyType::A), weights.duty_fairness);
            b.soft_dispersion(|k| k == SlotKind::Duty(DutyType::B), weights.duty_fairness);
            b.soft_dispersion(|k| k == SlotKind::Duty(DutyType::C), weights.duty_fairness);
            b.soft_dispersion(|k| k.is_night(), weights.night_fairness);
            b.soft_dispersion(|k| k == SlotKind::Duty(DutyType::D), weights.weekend_fairness);
            b.soft_dispersion(|k| k == SlotKind::Duty(DutyType::E), weights.weekend_fairness);
            b.soft_dispersion(|k| k == SlotKind::Duty(DutyType::F), weights.weekend_fairness);
            b.soft_consecutive_nights();
            b.soft_ao_preferences();
        }
        Mode::Na => {
            b.soft_dispersion(
                |k| k == SlotKind::Segment(Segment::Morning),
                weights.segment_fairness,
            );
            b.soft_dispersion(
                |k| k == SlotKind::Segment(Segment::Evening),
                weights.segment_fairness,
            );
            b.soft_na_preferences();
        }
    }
    b.soft_seniority_tiebreak();

    b.finish()
}

struct ModelBuilder<'a> {
    ctx: &'a RosterContext,
    w: &'a Weights,
    vars: ProblemVariables,
    constraints: Vec<Constraint>,
    /// Objective as `(coefficient, variable)` pairs, summed at the end.
    terms: Vec<(f64, Variable)>,
    x: Vec<Vec<Vec<Variable>>>,
}

impl<'a> ModelBuilder<'a> {
    fn new(ctx: &'a RosterContext, w: &'a Weights) -> Self {
        let mut vars = ProblemVariables::new();
        let x: Vec<Vec<Vec<Variable>>> = (0..ctx.persons.len())
            .map(|_| {
                ctx.slots
                    .iter()
                    .map(|s| vars.add_vector(variable().binary(), s.seats.len()))
                    .collect()
            })
            .collect();
        debug!(
            persons = ctx.persons.len(),
            slots = ctx.slots.len(),
            seats = ctx.total_seats,
            "created assignment variables"
        );
        Self {
            ctx,
            w,
            vars,
            constraints: Vec::new(),
            terms: Vec::new(),
            x,
        }
    }

    /// Sum of a person's seat variables for one slot (0 or 1 under H2).
    fn slot_load(&self, p: usize, s: usize) -> Expression {
        self.x[p][s].iter().copied().sum()
    }

    fn day_load(&self, p: usize, day: usize) -> Expression {
        self.ctx.slots_by_day[day]
            .iter()
            .flat_map(|&s| self.x[p][s].iter().copied())
            .sum()
    }

    fn total_load(&self, p: usize) -> Expression {
        self.x[p].iter().flatten().copied().sum()
    }

    // ------------------------------------------------------------------
    // Hard constraints
    // ------------------------------------------------------------------

    /// H1: every seat is filled by exactly one person.
    fn hard_seat_exclusivity(&mut self) {
        for s in 0..self.ctx.slots.len() {
            for seat in 0..self.ctx.slots[s].seats.len() {
                let filled: Expression = (0..self.ctx.persons.len())
                    .map(|p| self.x[p][s][seat])
                    .sum();
                self.constraints.push(constraint!(filled == 1));
            }
        }
    }

    /// H2: a person takes at most one seat of a slot.
    fn hard_single_occupancy(&mut self) {
        for p in 0..self.ctx.persons.len() {
            for s in 0..self.ctx.slots.len() {
                let load = self.slot_load(p, s);
                self.constraints.push(constraint!(load <= 1));
            }
        }
    }

    /// H3: at most two shifts per person per calendar day.
    fn hard_daily_cap(&mut self) {
        for p in 0..self.ctx.persons.len() {
            for day in 0..self.ctx.day_count {
                if self.ctx.slots_by_day[day].is_empty() {
                    continue;
                }
                let load = self.day_load(p, day);
                self.constraints.push(constraint!(load <= 2));
            }
        }
    }

    /// H4: per-person total stays within the hard cap.
    fn hard_total_cap(&mut self, cap: i64) {
        for p in 0..self.ctx.persons.len() {
            let total = self.total_load(p);
            self.constraints.push(constraint!(total <= cap as f64));
        }
    }

    /// H5 (AÖ): no A or D duty the morning after a C or F night.
    fn hard_forbidden_transitions(&mut self) {
        for day in 0..self.ctx.day_count.saturating_sub(1) {
            for &night in &self.ctx.slots_by_day[day] {
                if !self.ctx.slots[night].kind.is_night() {
                    continue;
                }
                for &morning in &self.ctx.slots_by_day[day + 1] {
                    let follows = matches!(
                        self.ctx.slots[morning].kind,
                        SlotKind::Duty(DutyType::A) | SlotKind::Duty(DutyType::D)
                    );
                    if !follows {
                        continue;
                    }
                    for p in 0..self.ctx.persons.len() {
                        let pair = self.slot_load(p, night) + self.slot_load(p, morning);
                        self.constraints.push(constraint!(pair <= 1));
                    }
                }
            }
        }
    }

    /// H6: per-slot coverage equals the seat count. Redundant given H1,
    /// kept explicit as a solver hint.
    fn hard_coverage(&mut self) {
        for s in 0..self.ctx.slots.len() {
            let seat_count = self.ctx.slots[s].seats.len();
            let covered: Expression = (0..self.ctx.persons.len())
                .flat_map(|p| self.x[p][s].iter().copied())
                .sum();
            self.constraints
                .push(constraint!(covered == seat_count as f64));
        }
    }

    // ------------------------------------------------------------------
    // Soft objective
    // ------------------------------------------------------------------

    /// Assigning a blocked pair costs the tier-1 weight. Slots where every
    /// person is blocked cannot avoid a violation, so they carry the small
    /// tie-break weight instead.
    fn soft_unavailability(&mut self) {
        for s in 0..self.ctx.slots.len() {
            let weight = if self.ctx.fully_blocked_slots[s] {
                self.w.unavailability_tiebreak
            } else {
                self.w.unavailability
            } as f64;
            for p in 0..self.ctx.persons.len() {
                if !self.ctx.blocked.contains(&(p, s)) {
                    continue;
                }
                for &var in &self.x[p][s] {
                    self.terms.push((weight, var));
                }
            }
        }
    }

    /// Binds `actual - ideal = over - under` with the over/under sides split
    /// into a soft part (within the ±2 band) and a hard tail beyond it.
    fn soft_ideal_deviation(&mut self) {
        let (over_soft_w, over_hard_w, under_soft_w, under_hard_w) = match self.ctx.mode {
            Mode::Ao => (
                self.w.ideal_soft + self.w.history_fairness,
                self.w.over_ideal + self.w.history_fairness,
                self.w.ideal_soft + self.w.history_fairness,
                self.w.under_ideal + self.w.history_fairness,
            ),
            // NA under-assignment is only steered by the history signal.
            Mode::Na => (
                self.w.history_fairness,
                self.w.over_ideal + self.w.history_fairness,
                self.w.history_fairness,
                self.w.history_fairness,
            ),
        };
        for p in 0..self.ctx.persons.len() {
            let ideal = self.ctx.persons[p].ideal as f64;
            let over_soft = self.vars.add(variable().integer().min(0).max(2));
            let over_hard = self.vars.add(variable().integer().min(0));
            let under_soft = self.vars.add(variable().integer().min(0).max(2));
            let under_hard = self.vars.add(variable().integer().min(0));
            let total = self.total_load(p);
            self.constraints.push(constraint!(
                total + Expression::from(under_soft) + Expression::from(under_hard)
                    - Expression::from(over_soft)
                    - Expression::from(over_hard)
                    == ideal
            ));
            self.terms.push((over_soft_w as f64, over_soft));
            self.terms.push((over_hard_w as f64, over_hard));
            self.terms.push((under_soft_w as f64, under_soft));
            self.terms.push((under_hard_w as f64, under_hard));
        }
    }

    /// Indicator that a person ended the period with zero shifts (AÖ).
    fn soft_zero_assignment(&mut self) {
        for p in 0..self.ctx.persons.len() {
            let empty = self.vars.add(variable().binary());
            let total = self.total_load(p);
            self.constraints
                .push(constraint!(total + Expression::from(empty) >= 1));
            self.terms.push((self.w.zero_assignment as f64, empty));
        }
    }

    /// Worked-day indicators and the 3-consecutive-days windows.
    fn soft_consecutive_days(&mut self) {
        for p in 0..self.ctx.persons.len() {
            let worked: Vec<Variable> = (0..self.ctx.day_count)
                .map(|day| {
                    let y = self.vars.add(variable().binary());
                    for &s in &self.ctx.slots_by_day[day] {
                        let load = self.slot_load(p, s);
                        self.constraints
                            .push(constraint!(load - Expression::from(y) <= 0));
                    }
                    y
                })
                .collect();
            for day in 0..self.ctx.day_count.saturating_sub(2) {
                let streak = self.vars.add(variable().binary());
                self.constraints.push(constraint!(
                    Expression::from(worked[day])
                        + Expression::from(worked[day + 1])
                        + Expression::from(worked[day + 2])
                        - Expression::from(streak)
                        <= 2
                ));
                self.terms.push((self.w.consecutive_triple as f64, streak));
            }
        }
    }

    /// Paired absolute deviation of a slot category against the rounded
    /// per-person target share of that category.
    fn soft_dispersion(&mut self, pred: impl Fn(SlotKind) -> bool, weight: i64) {
        let slots: Vec<usize> = (0..self.ctx.slots.len())
            .filter(|&s| pred(self.ctx.slots[s].kind))
            .collect();
        if slots.is_empty() || weight == 0 {
            return;
        }
        let seats: usize = slots.iter().map(|&s| self.ctx.slots[s].seats.len()).sum();
        let target = self.ctx.rounded_share(seats) as f64;
        for p in 0..self.ctx.persons.len() {
            let count: Expression = slots
                .iter()
                .flat_map(|&s| self.x[p][s].iter().copied())
                .sum();
            let above = self.vars.add(variable().integer().min(0));
            let below = self.vars.add(variable().integer().min(0));
            self.constraints.push(constraint!(
                count - Expression::from(above) + Expression::from(below) == target
            ));
            self.terms.push((weight as f64, above));
            self.terms.push((weight as f64, below));
        }
    }

    /// Rolling 7-day windows anchored at the period start; slack counts
    /// shifts beyond 2 per window.
    fn soft_weekly_clustering(&mut self) {
        let windows = self.ctx.day_count.div_ceil(7);
        for p in 0..self.ctx.persons.len() {
            for win in 0..windows {
                let days = (win * 7)..((win * 7 + 7).min(self.ctx.day_count));
                let slots: Vec<usize> = days
                    .flat_map(|d| self.ctx.slots_by_day[d].iter().copied())
                    .collect();
                if slots.is_empty() {
                    continue;
                }
                let load: Expression = slots
                    .iter()
                    .flat_map(|&s| self.x[p][s].iter().copied())
                    .sum();
                let slack = self.vars.add(variable().integer().min(0));
                self.constraints
                    .push(constraint!(load - Expression::from(slack) <= 2));
                self.terms.push((self.w.weekly_clustering as f64, slack));
            }
        }
    }

    /// Penalizes holding both shifts of one calendar day.
    fn soft_double_day(&mut self) {
        for p in 0..self.ctx.persons.len() {
            for day in 0..self.ctx.day_count {
                if self.ctx.slots_by_day[day].len() < 2 {
                    continue;
                }
                let load = self.day_load(p, day);
                let doubled = self.vars.add(variable().binary());
                self.constraints
                    .push(constraint!(load - Expression::from(doubled) <= 1));
                self.terms.push((self.w.double_day as f64, doubled));
            }
        }
    }

    /// Adjacent-day night pairs (AÖ).
    fn soft_consecutive_nights(&mut self) {
        let night_days: Vec<Vec<usize>> = (0..self.ctx.day_count)
            .map(|d| {
                self.ctx.slots_by_day[d]
                    .iter()
                    .copied()
                    .filter(|&s| self.ctx.slots[s].kind.is_night())
                    .collect()
            })
            .collect();
        for p in 0..self.ctx.persons.len() {
            let night_worked: Vec<Option<Variable>> = night_days
                .iter()
                .map(|slots| {
                    if slots.is_empty() {
                        return None;
                    }
                    let ny = self.vars.add(variable().binary());
                    for &s in slots {
                        let load = self.slot_load(p, s);
                        self.constraints
                            .push(constraint!(load - Expression::from(ny) <= 0));
                    }
                    Some(ny)
                })
                .collect();
            for day in 0..self.ctx.day_count.saturating_sub(1) {
                if let (Some(a), Some(b)) = (night_worked[day], night_worked[day + 1]) {
                    let pair = self.vars.add(variable().binary());
                    self.constraints.push(constraint!(
                        Expression::from(a) + Expression::from(b) - Expression::from(pair) <= 1
                    ));
                    self.terms.push((self.w.consecutive_night as f64, pair));
                }
            }
        }
    }

    fn soft_ao_preferences(&mut self) {
        for p in 0..self.ctx.persons.len() {
            let person = &self.ctx.persons[p];
            for s in 0..self.ctx.slots.len() {
                let kind = self.ctx.slots[s].kind;
                if person.dislikes_weekend && kind.is_weekend() {
                    for &var in &self.x[p][s] {
                        self.terms.push((self.w.weekend_dislike as f64, var));
                    }
                }
                if person.likes_night && kind.is_night() {
                    for &var in &self.x[p][s] {
                        self.terms.push((-(self.w.night_bonus as f64), var));
                    }
                }
            }
        }
    }

    fn soft_na_preferences(&mut self) {
        for p in 0..self.ctx.persons.len() {
            let person = &self.ctx.persons[p];
            for s in 0..self.ctx.slots.len() {
                let matched = match self.ctx.slots[s].kind {
                    SlotKind::Segment(Segment::Morning) => person.likes_morning,
                    SlotKind::Segment(Segment::Evening) => person.likes_evening,
                    SlotKind::Duty(_) => false,
                };
                if matched {
                    for &var in &self.x[p][s] {
                        self.terms.push((-(self.w.segment_bonus as f64), var));
                    }
                }
            }
        }
    }

    /// Weight-1 lexicographic nudge: persons with a higher
    /// `(totalAllTime, id)` rank pay their rank per assignment.
    fn soft_seniority_tiebreak(&mut self) {
        if self.w.seniority_tiebreak == 0 {
            return;
        }
        for p in 0..self.ctx.persons.len() {
            let coeff = (self.w.seniority_tiebreak as f64) * (self.ctx.persons[p].rank as f64);
            if coeff == 0.0 {
                continue;
            }
            for s in 0..self.ctx.slots.len() {
                for &var in &self.x[p][s] {
                    self.terms.push((coeff, var));
                }
            }
        }
    }

    fn finish(self) -> RosterModel {
        debug!(
            constraints = self.constraints.len(),
            objective_terms = self.terms.len(),
            "model built"
        );
        let objective: Expression = self
            .terms
            .into_iter()
            .map(|(coeff, var)| coeff * Expression::from(var))
            .sum();
        RosterModel {
            vars: self.vars,
            objective,
            constraints: self.constraints,
            x: self.x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AoPerson, AoScheduleRequest, AoSlot, DayType, NaPerson, NaScheduleRequest, NaSlot, Period,
        Seat,
    };
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, d).unwrap()
    }

    fn seats(ids: &[&str]) -> Vec<Seat> {
        ids.iter()
            .map(|s| Seat {
                id: (*s).into(),
                role: None,
            })
            .collect()
    }

    fn ao_fixture() -> RosterContext {
        let req = AoScheduleRequest {
            period: Period {
                id: "p".into(),
                name: "p".into(),
                start_date: date(1),
                end_date: date(4),
            },
            persons: ["u1", "u2", "u3"]
                .iter()
                .map(|id| AoPerson {
                    id: (*id).into(),
                    name: (*id).into(),
                    contact: None,
                    likes_night: false,
                    dislikes_weekend: false,
                    history: Default::default(),
                })
                .collect(),
            slots: vec![
                AoSlot {
                    id: "s1".into(),
                    date: date(1),
                    duty_type: DutyType::A,
                    day_type: DayType::Weekday,
                    seats: seats(&["t1", "t2"]),
                },
                AoSlot {
                    id: "s2".into(),
                    date: date(1),
                    duty_type: DutyType::C,
                    day_type: DayType::Weekday,
                    seats: seats(&["t3"]),
                },
                AoSlot {
                    id: "s3".into(),
                    date: date(2),
                    duty_type: DutyType::A,
                    day_type: DayType::Weekday,
                    seats: seats(&["t4"]),
                },
            ],
            unavailability: vec![],
        };
        RosterContext::from_ao(&req).unwrap()
    }

    #[test]
    fn assignment_variables_match_seat_layout() {
        let ctx = ao_fixture();
        let model = build(&ctx, &Weights::default(), ctx.base + 2);
        assert_eq!(model.x.len(), 3);
        for person_vars in &model.x {
            assert_eq!(person_vars.len(), 3);
            assert_eq!(person_vars[0].len(), 2);
            assert_eq!(person_vars[1].len(), 1);
            assert_eq!(person_vars[2].len(), 1);
        }
    }

    #[test]
    fn night_before_morning_adds_transition_constraints() {
        let ctx = ao_fixture();
        let with_night = build(&ctx, &Weights::default(), ctx.base + 2);

        // Same layout with the night slot turned into a B duty: H5 and the
        // consecutive-night machinery disappear.
        let mut all_day = ao_fixture();
        all_day.slots[1].kind = SlotKind::Duty(DutyType::B);
        let without_night = build(&all_day, &Weights::default(), all_day.base + 2);

        assert!(with_night.constraints.len() > without_night.constraints.len());
    }

    #[test]
    fn na_model_builds() {
        let req = NaScheduleRequest {
            period: Period {
                id: "p".into(),
                name: "p".into(),
                start_date: date(1),
                end_date: date(2),
            },
            persons: vec![
                NaPerson {
                    id: "u1".into(),
                    name: "u1".into(),
                    contact: None,
                    likes_morning: true,
                    likes_evening: false,
                    history: Default::default(),
                },
                NaPerson {
                    id: "u2".into(),
                    name: "u2".into(),
                    contact: None,
                    likes_morning: false,
                    likes_evening: true,
                    history: Default::default(),
                },
            ],
            slots: vec![
                NaSlot {
                    id: "m1".into(),
                    date: date(1),
                    segment: Segment::Morning,
                    seats: seats(&["t1"]),
                },
                NaSlot {
                    id: "e1".into(),
                    date: date(1),
                    segment: Segment::Evening,
                    seats: seats(&["t2"]),
                },
            ],
            unavailability: vec![],
        };
        let ctx = RosterContext::from_na(&req).unwrap();
        let model = build(&ctx, &Weights::default(), ctx.base + 2);
        assert_eq!(model.x.len(), 2);
        assert!(!model.constraints.is_empty());
    }
}
