use colored::Colorize;

pub fn log_info(message: String) {
    println!("{}: {}", "Info".bright_blue(), message.blue());
}

pub fn log_warning(message: String) {
    println!("{}: {}", "Warning".bright_yellow(), message.yellow());
}

pub fn log_error(message: String) {
    eprintln!("{}: {}", "Error".bright_red().bold(), message.red());
}

/// Stored data may disagree with itself past this point. Alert-worthy.
pub fn log_fatal(message: String) {
    eprintln!("{}: {}", "FATAL".bright_red().bold(), message.bright_red().bold());
}
