pub mod calculator;
pub mod close;
pub mod flash_loan;
pub mod math;
pub mod multiply;
pub mod solver;
