use tracing::debug;

use crate::options::Options;

/// Growth schedule for the learnt-clause database limit: the database is
/// reduced whenever it outgrows `limit(num_assigns)`, and the limit itself
/// is enlarged every `adjust_cnt` conflicts.
#[derive(Debug)]
pub struct LearningSchedule {
    learntsize_factor: f64,
    learntsize_inc: f64,
    learntsize_adjust_start: f64,
    learntsize_adjust_inc: f64,
    max_learnts: f64,
    adjust_confl: f64,
    adjust_cnt: u64,
}

impl LearningSchedule {
    pub fn new(options: &Options) -> Self {
        Self {
            learntsize_factor: options.learntsize_factor,
            learntsize_inc: options.learntsize_inc,
            learntsize_adjust_start: options.learntsize_adjust_start,
            learntsize_adjust_inc: options.learntsize_adjust_inc,
            max_learnts: 0.0,
            adjust_confl: 0.0,
            adjust_cnt: 0,
        }
    }

    pub fn limit(&self, num_assigns: usize) -> usize {
        self.max_learnts as usize + num_assigns
    }

    pub fn reset(&mut self, num_clauses: usize) {
        self.max_learnts = num_clauses as f64 * self.learntsize_factor;
        self.adjust_confl = self.learntsize_adjust_start;
        self.adjust_cnt = self.adjust_confl as u64;
    }

    /// Called once per conflict; returns `true` when the limit was enlarged.
    pub fn on_conflict(&mut self) -> bool {
        self.adjust_cnt = self.adjust_cnt.saturating_sub(1);
        if self.adjust_cnt == 0 {
            self.max_learnts *= self.learntsize_inc;
            self.adjust_confl *= self.learntsize_adjust_inc;
            self.adjust_cnt = self.adjust_confl as u64;
            debug!(
                "New max_learnts = {}, adjust_cnt = {}",
                self.max_learnts as u64, self.adjust_cnt
            );
            true
        } else {
            false
        }
    }
}
