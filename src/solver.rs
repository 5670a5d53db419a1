//! Solver driver: configures the HiGHS backend, runs the solve, decodes the
//! assignment and assembles response metadata.
//!
//! The driver owns the one retry the service allows: when the model is
//! proven infeasible under the `base + 2` cap, it rebuilds once with
//! `base + 3` and a warning before reporting INFEASIBLE.

use std::time::Instant;

use chrono::{Datelike, Weekday};
use good_lp::{default_solver, ResolutionError, Solution, SolverModel, Variable, WithTimeLimit};
use tracing::{info, warn};

use crate::config::SchedulerConfig;
use crate::constraints;
use crate::domain::{
    Assignment, Mode, RosterContext, ScheduleError, ScheduleMeta, ScheduleResponse, Seat,
    SeatRole, SolverStatus,
};

use crate::domain::{AoScheduleRequest, NaScheduleRequest};

/// Solves an AÖ request end to end.
pub fn solve_ao(
    req: &AoScheduleRequest,
    cfg: &SchedulerConfig,
) -> Result<ScheduleResponse, ScheduleError> {
    let ctx = RosterContext::from_ao(req)?;
    solve(&ctx, cfg)
}

/// Solves an NA request end to end.
pub fn solve_na(
    req: &NaScheduleRequest,
    cfg: &SchedulerConfig,
) -> Result<ScheduleResponse, ScheduleError> {
    let ctx = RosterContext::from_na(req)?;
    solve(&ctx, cfg)
}

fn solve(ctx: &RosterContext, cfg: &SchedulerConfig) -> Result<ScheduleResponse, ScheduleError> {
    let started = Instant::now();
    let mut warnings = standing_warnings(ctx);

    match attempt(ctx, cfg, ctx.base + 2) {
        Ok((x, solution, solve_secs)) => Ok(decode(
            ctx, cfg, &x, &solution, solve_secs, started, warnings,
        )),
        Err(ResolutionError::Infeasible) => {
            warn!("model infeasible at cap base+2, retrying with base+3");
            warnings.push(format!(
                "no assignment satisfies the hard cap of {} shifts per person; retried with {}",
                ctx.base + 2,
                ctx.base + 3
            ));
            match attempt(ctx, cfg, ctx.base + 3) {
                Ok((x, solution, solve_secs)) => Ok(decode(
                    ctx, cfg, &x, &solution, solve_secs, started, warnings,
                )),
                Err(ResolutionError::Infeasible) => {
                    warnings.push(
                        "model is infeasible even with the relaxed cap; likely causes: \
                         too few persons for the seat count, or daily/transition limits \
                         that cannot all be met"
                            .to_string(),
                    );
                    Ok(infeasible_response(ctx, started, warnings))
                }
                Err(other) => fault_or_timeout(ctx, other, started, warnings),
            }
        }
        Err(other) => fault_or_timeout(ctx, other, started, warnings),
    }
}

/// A solve that ran out of wall clock before any incumbent is reported as
/// INFEASIBLE, not as a backend fault.
fn fault_or_timeout(
    ctx: &RosterContext,
    err: ResolutionError,
    started: Instant,
    mut warnings: Vec<String>,
) -> Result<ScheduleResponse, ScheduleError> {
    if err.to_string().to_ascii_lowercase().contains("time") {
        warnings.push(
            "time budget exhausted before any feasible assignment was found".to_string(),
        );
        return Ok(infeasible_response(ctx, started, warnings));
    }
    Err(ScheduleError::SolverFault(err.to_string()))
}

/// One build-and-solve pass at the given per-person cap.
fn attempt(
    ctx: &RosterContext,
    cfg: &SchedulerConfig,
    cap: i64,
) -> Result<(Vec<Vec<Vec<Variable>>>, impl Solution, f64), ResolutionError> {
    let model = constraints::build(ctx, &cfg.weights, cap);
    let constraints::RosterModel {
        vars,
        objective,
        constraints: posted,
        x,
    } = model;

    let mut problem = vars
        .minimise(objective)
        .using(default_solver)
        .with_time_limit(cfg.settings.time_limit_seconds);
    for c in posted {
        problem.add_constraint(c);
    }

    let solve_started = Instant::now();
    let solution = problem.solve()?;
    let solve_secs = solve_started.elapsed().as_secs_f64();
    info!(cap, solve_secs, "solve finished");
    Ok((x, solution, solve_secs))
}

/// Warnings that do not depend on the solve outcome.
fn standing_warnings(ctx: &RosterContext) -> Vec<String> {
    let mut warnings = Vec::new();
    if ctx.period_start.weekday() != Weekday::Mon {
        warnings.push(format!(
            "weekly clustering uses 7-day windows anchored at {}; the period does not \
             start on a Monday, so windows differ from ISO weeks",
            ctx.period_start
        ));
    }
    for (s, fully_blocked) in ctx.fully_blocked_slots.iter().enumerate() {
        if *fully_blocked {
            warnings.push(format!(
                "slot '{}': every person is blocked, its seats will violate unavailability",
                ctx.slots[s].id
            ));
        }
    }
    warnings
}

fn decode(
    ctx: &RosterContext,
    cfg: &SchedulerConfig,
    x: &[Vec<Vec<Variable>>],
    solution: &impl Solution,
    solve_secs: f64,
    started: Instant,
    warnings: Vec<String>,
) -> ScheduleResponse {
    let mut counts = vec![0i64; ctx.persons.len()];
    // chosen[slot][seat] = person index
    let mut chosen: Vec<Vec<Option<usize>>> = ctx
        .slots
        .iter()
        .map(|s| vec![None; s.seats.len()])
        .collect();
    for p in 0..ctx.persons.len() {
        for s in 0..ctx.slots.len() {
            for (seat, &var) in x[p][s].iter().enumerate() {
                if solution.value(var) > 0.5 {
                    chosen[s][seat] = Some(p);
                    counts[p] += 1;
                }
            }
        }
    }

    let mut assignments = Vec::with_capacity(ctx.total_seats);
    let mut violations = 0usize;
    for (s, slot) in ctx.slots.iter().enumerate() {
        let roles: Vec<Option<SeatRole>> = if slot.kind.has_roles() {
            assign_roles(ctx.mode, &slot.seats)
                .into_iter()
                .map(Some)
                .collect()
        } else {
            vec![None; slot.seats.len()]
        };
        for (seat, assigned) in chosen[s].iter().enumerate() {
            let Some(p) = assigned else { continue };
            if ctx.blocked.contains(&(*p, s)) {
                violations += 1;
            }
            assignments.push(Assignment {
                slot_id: slot.id.clone(),
                seat_id: slot.seats[seat].id.clone(),
                person_id: ctx.persons[*p].id.clone(),
                seat_role: roles[seat],
                is_extra: counts[*p] > ctx.base + 1,
            });
        }
    }

    let status = if solve_secs >= cfg.settings.time_limit_seconds {
        SolverStatus::Feasible
    } else {
        SolverStatus::Optimal
    };
    let meta = ScheduleMeta {
        base: ctx.base,
        max_shifts: counts.iter().copied().max().unwrap_or(0),
        min_shifts: counts.iter().copied().min().unwrap_or(0),
        users_at_base_plus2: counts.iter().filter(|&&c| c >= ctx.base + 2).count(),
        unavailability_violations: violations,
        warnings,
        solver_status: status,
        solve_time_ms: started.elapsed().as_millis() as u64,
    };
    ScheduleResponse { assignments, meta }
}

fn infeasible_response(
    ctx: &RosterContext,
    started: Instant,
    warnings: Vec<String>,
) -> ScheduleResponse {
    ScheduleResponse {
        assignments: Vec::new(),
        meta: ScheduleMeta {
            base: ctx.base,
            max_shifts: 0,
            min_shifts: 0,
            users_at_base_plus2: 0,
            unavailability_violations: 0,
            warnings,
            solver_status: SolverStatus::Infeasible,
            solve_time_ms: started.elapsed().as_millis() as u64,
        },
    }
}

// ============================================================================
// DESK/OPERATOR distribution
// ============================================================================

/// Target `(DESK, OPERATOR)` counts for an A-shift with `seats` seats.
pub fn role_split(mode: Mode, seats: usize) -> (usize, usize) {
    match mode {
        Mode::Ao => match seats {
            0 => (0, 0),
            1 => (0, 1),
            2 => (1, 1),
            3 => (1, 2),
            4 => (2, 2),
            5 => (3, 2),
            6 => (3, 3),
            7 => (4, 3),
            n => (n.div_ceil(2), n / 2),
        },
        Mode::Na => match seats {
            0 => (0, 0),
            1 => (0, 1),
            2 => (1, 1),
            3 => (2, 1),
            n => {
                let desk = (2 * n).div_ceil(3);
                (desk, n - desk)
            }
        },
    }
}

/// Distributes roles over one slot's seats: preassigned roles are honored
/// first and consume their quota, then null-role seats are filled in
/// seat-id order, DESK while under its target, OPERATOR afterwards.
pub fn assign_roles(mode: Mode, seats: &[Seat]) -> Vec<SeatRole> {
    let (desk_target, _) = role_split(mode, seats.len());
    let preassigned_desks = seats
        .iter()
        .filter(|s| s.role == Some(SeatRole::Desk))
        .count();
    let mut desk_left = desk_target.saturating_sub(preassigned_desks);

    let mut open: Vec<usize> = (0..seats.len()).filter(|&i| seats[i].role.is_none()).collect();
    open.sort_by(|&a, &b| seats[a].id.cmp(&seats[b].id));

    let mut roles: Vec<Option<SeatRole>> = seats.iter().map(|s| s.role).collect();
    for i in open {
        if desk_left > 0 {
            roles[i] = Some(SeatRole::Desk);
            desk_left -= 1;
        } else {
            roles[i] = Some(SeatRole::Operator);
        }
    }
    roles.into_iter().map(|r| r.unwrap_or(SeatRole::Operator)).collect()
}
