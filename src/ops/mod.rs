pub mod day_nav;
pub mod order;
pub mod task_ops;
