pub mod appointment;
pub mod attempt;
pub mod question;
pub mod survey;
pub mod user;
