//! Process-wide scheduler configuration.
//!
//! Solver settings and penalty coefficients are read from the environment
//! once at startup and held read-only for the process lifetime. The weight
//! defaults are the literal objective coefficients; any of them can be
//! overridden through `SCHEDULER_WEIGHT_<LABEL>`.

use std::sync::OnceLock;

/// Penalty coefficients of the soft objective, highest tier first.
///
/// The magnitudes are chosen so that any violation at a higher tier
/// dominates plausible combinations of lower-tier violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weights {
    /// Per assignment on a slot the person asked to be blocked from.
    pub unavailability: i64,
    /// Replaces `unavailability` on slots where every person is blocked.
    pub unavailability_tiebreak: i64,
    /// Per unit below `ideal - 2`.
    pub under_ideal: i64,
    /// Per unit above `ideal + 2`.
    pub over_ideal: i64,
    /// Person received no shifts at all (AÖ).
    pub zero_assignment: i64,
    /// Per 3-day window worked on each day.
    pub consecutive_triple: i64,
    /// Per unit of deviation inside the `ideal ± 2` band.
    pub ideal_soft: i64,
    /// Secondary signal on every unit of `|actual - ideal|`.
    pub history_fairness: i64,
    /// Dispersion of A/B/C counts across persons (AÖ).
    pub duty_fairness: i64,
    /// Dispersion of night (C+F) counts (AÖ).
    pub night_fairness: i64,
    /// Dispersion per weekend duty D/E/F (AÖ).
    pub weekend_fairness: i64,
    /// Dispersion of MORNING/EVENING counts (NA).
    pub segment_fairness: i64,
    /// Per shift beyond 2 in any 7-day window.
    pub weekly_clustering: i64,
    /// Per day a person holds both shifts.
    pub double_day: i64,
    /// Per adjacent-day night pair (AÖ).
    pub consecutive_night: i64,
    /// Per weekend assignment of a person who dislikes weekends (AÖ).
    pub weekend_dislike: i64,
    /// Bonus per night assignment of a person who likes nights (AÖ).
    pub night_bonus: i64,
    /// Bonus per matched MORNING/EVENING preference (NA).
    pub segment_bonus: i64,
    /// Per assignment, scaled by the person's seniority rank.
    pub seniority_tiebreak: i64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            unavailability: 200_000,
            unavailability_tiebreak: 1_000,
            under_ideal: 140_000,
            over_ideal: 120_000,
            zero_assignment: 80_000,
            consecutive_triple: 7_000,
            ideal_soft: 4_000,
            history_fairness: 3_000,
            duty_fairness: 1_000,
            night_fairness: 1_000,
            weekend_fairness: 50,
            segment_fairness: 1_000,
            weekly_clustering: 100,
            double_day: 100,
            consecutive_night: 100,
            weekend_dislike: 10,
            night_bonus: 5,
            segment_bonus: 5,
            seniority_tiebreak: 1,
        }
    }
}

impl Weights {
    /// Applies `SCHEDULER_WEIGHT_<LABEL>` overrides through an injected
    /// lookup so tests never touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut w = Self::default();
        let set = |label: &str, field: &mut i64| {
            if let Some(v) = lookup(&format!("SCHEDULER_WEIGHT_{label}")) {
                if let Ok(parsed) = v.trim().parse::<i64>() {
                    *field = parsed;
                }
            }
        };
        set("UNAVAILABILITY", &mut w.unavailability);
        set("UNAVAILABILITY_TIEBREAK", &mut w.unavailability_tiebreak);
        set("UNDER_IDEAL", &mut w.under_ideal);
        set("OVER_IDEAL", &mut w.over_ideal);
        set("ZERO_ASSIGNMENT", &mut w.zero_assignment);
        set("CONSECUTIVE_TRIPLE", &mut w.consecutive_triple);
        set("IDEAL_SOFT", &mut w.ideal_soft);
        set("HISTORY_FAIRNESS", &mut w.history_fairness);
        set("DUTY_FAIRNESS", &mut w.duty_fairness);
        set("NIGHT_FAIRNESS", &mut w.night_fairness);
        set("WEEKEND_FAIRNESS", &mut w.weekend_fairness);
        set("SEGMENT_FAIRNESS", &mut w.segment_fairness);
        set("WEEKLY_CLUSTERING", &mut w.weekly_clustering);
        set("DOUBLE_DAY", &mut w.double_day);
        set("CONSECUTIVE_NIGHT", &mut w.consecutive_night);
        set("WEEKEND_DISLIKE", &mut w.weekend_dislike);
        set("NIGHT_BONUS", &mut w.night_bonus);
        set("SEGMENT_BONUS", &mut w.segment_bonus);
        set("SENIORITY_TIEBREAK", &mut w.seniority_tiebreak);
        w
    }
}

/// Backend configuration for a single solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverSettings {
    pub time_limit_seconds: f64,
    pub random_seed: i32,
    /// One worker keeps solves reproducible across runs.
    pub threads: i32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            time_limit_seconds: 60.0,
            random_seed: 42,
            threads: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerConfig {
    pub settings: SolverSettings,
    pub weights: Weights,
}

impl SchedulerConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = SolverSettings::default();
        if let Some(v) = lookup("SCHEDULER_TIME_LIMIT_SECONDS") {
            if let Ok(parsed) = v.trim().parse::<f64>() {
                if parsed > 0.0 {
                    settings.time_limit_seconds = parsed;
                }
            }
        }
        if let Some(v) = lookup("SCHEDULER_RANDOM_SEED") {
            if let Ok(parsed) = v.trim().parse::<i32>() {
                settings.random_seed = parsed;
            }
        }
        if let Some(v) = lookup("SCHEDULER_SOLVER_THREADS") {
            if let Ok(parsed) = v.trim().parse::<i32>() {
                if parsed > 0 {
                    settings.threads = parsed;
                }
            }
        }
        Self {
            settings,
            weights: Weights::from_lookup(lookup),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// The process-wide configuration, initialized from the environment on
/// first access and never mutated afterwards.
pub fn global() -> &'static SchedulerConfig {
    static CONFIG: OnceLock<SchedulerConfig> = OnceLock::new();
    CONFIG.get_or_init(SchedulerConfig::from_env)
}
