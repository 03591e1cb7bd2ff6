mod manager;
pub mod models;
pub mod time;
pub mod validation;

pub use manager::{ManagerConfig, WorkingHoursManager};
pub use models::{DayOfWeek, DoctorSchedule, Draft, EditState, IntervalId, WorkingInterval};
pub use time::TimeOfDay;
pub use validation::validate;
