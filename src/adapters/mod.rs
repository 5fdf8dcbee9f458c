pub mod logging_consumer;
pub mod shutdown_reporter;

pub use logging_consumer::LoggingConsumer;
pub use shutdown_reporter::ShutdownReporter;
