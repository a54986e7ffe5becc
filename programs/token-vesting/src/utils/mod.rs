pub mod calculator;
pub mod schedule_id;
pub mod time;
