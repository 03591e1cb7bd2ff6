// Export components
pub mod working_hours;

// Re-export the working hours manager
pub use working_hours::WorkingHoursManager;
