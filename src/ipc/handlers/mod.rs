pub mod assignments;
pub mod core;
pub mod courses;
pub mod departments;
pub mod groups;
pub mod programs;
pub mod students;
pub mod teachers;
