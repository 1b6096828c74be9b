pub mod sequential_executor;
pub mod threaded_executor;
