pub mod solver;

pub mod assignment;
pub mod clause;
pub mod clause_allocator;
pub mod clause_database;
pub mod cref;
pub mod idx;
pub mod interpolate;
pub mod lbool;
pub mod learning;
pub mod lit;
pub mod options;
pub mod proof;
pub mod utils;
pub mod var;
pub mod var_order;
pub mod watch;
