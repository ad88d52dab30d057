//! Shared library modules providing error types, file utilities, console output, and telemetry.

pub mod dotnet;
pub mod errors;
pub mod fs;
pub mod output;
pub mod telemetry;
