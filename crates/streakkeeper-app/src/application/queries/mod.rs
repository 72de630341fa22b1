mod check_in_status_queries;

pub use check_in_status_queries::CheckInStatusQueries;
