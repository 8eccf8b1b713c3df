pub mod attendance;
pub mod classes;
pub mod core;
pub mod notices;
mod records;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod views;
