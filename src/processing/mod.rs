pub mod chart_spec;
pub mod report;
pub mod statistics;
