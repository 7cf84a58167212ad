#[derive(Debug, Clone)]
pub struct Options {
    // Restart:
    pub restart_init: usize,
    pub restart_inc: f64,
    // Activity decay:
    pub var_decay: f64,
    pub cla_decay: f64,
    // ReduceDB:
    pub learntsize_factor: f64,
    pub learntsize_inc: f64,
    pub learntsize_adjust_start: f64,
    pub learntsize_adjust_inc: f64,
}

pub const DEFAULT_OPTIONS: Options = Options {
    // Restart:
    restart_init: 100,
    restart_inc: 1.5,
    // Activity decay:
    var_decay: 0.95,
    cla_decay: 0.999,
    // ReduceDB:
    learntsize_factor: 1.0 / 3.0,
    learntsize_inc: 1.1,
    learntsize_adjust_start: 100.0,
    learntsize_adjust_inc: 1.5,
};

impl Default for Options {
    fn default() -> Self {
        DEFAULT_OPTIONS
    }
}
