//! Colored status lines for the terminal.

use owo_colors::{OwoColorize, Stream};

pub fn print_info(message: &str) {
    println!(
        "{}",
        message.if_supports_color(Stream::Stdout, |s| s.blue())
    );
}

pub fn print_progress(message: &str) {
    println!(
        "{}",
        message.if_supports_color(Stream::Stdout, |s| s.yellow())
    );
}

pub fn print_success(message: &str) {
    println!(
        "{}",
        message.if_supports_color(Stream::Stdout, |s| s.green())
    );
}

pub fn print_error(message: &str) {
    eprintln!(
        "{}",
        message.if_supports_color(Stream::Stderr, |s| s.red())
    );
}

pub fn print_warning(message: &str) {
    eprintln!(
        "{}",
        message.if_supports_color(Stream::Stderr, |s| s.yellow())
    );
}

pub fn print_stat(label: &str, value: &str) {
    println!(
        "  {}: {}",
        label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
        value
    );
}

/// `Batch Publish and Package .Net Projects v<version>`, version in green.
pub fn print_version(name: &str, version: &str) {
    let tagged = format!("v{version}");
    println!(
        "{name} {}",
        tagged.if_supports_color(Stream::Stdout, |s| s.green())
    );
}

/// `No publish profiles found in "<path>" or any subdirectories`, path in green.
pub fn print_no_profiles(path: &str) {
    let quoted = format!("\"{path}\"");
    eprintln!(
        "{} {} {}",
        "No publish profiles found in".if_supports_color(Stream::Stderr, |s| s.red()),
        quoted.if_supports_color(Stream::Stderr, |s| s.green()),
        "or any subdirectories".if_supports_color(Stream::Stderr, |s| s.red())
    );
}
