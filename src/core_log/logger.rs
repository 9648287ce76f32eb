use crate::constants::EVENT_TIME_FORMAT;
use chrono::Local;

/// Prefixes a host-visible log line with the local wall-clock time.
pub fn timestamped(message: &str) -> String {
    let timestamp = Local::now().format(EVENT_TIME_FORMAT).to_string();
    format!("{} {}", timestamp, message)
}

/// Hides the argument of a PASS command before it reaches any log.
pub fn redact_command(line: &str) -> String {
    let line = line.trim();
    let verb = line.split(' ').next().unwrap_or_default();
    if verb.eq_ignore_ascii_case("PASS") {
        "PASS ***".to_string()
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_argument_is_redacted() {
        assert_eq!(redact_command("PASS hunter2\r\n"), "PASS ***");
        assert_eq!(redact_command("pass hunter2"), "PASS ***");
        assert_eq!(redact_command("USER john\r\n"), "USER john");
        assert_eq!(redact_command("PASSIVE"), "PASSIVE");
    }

    #[test]
    fn timestamp_is_prefixed() {
        let line = timestamped("hello");
        assert!(line.ends_with(" hello"));
        assert_eq!(line.len(), "01.01.2024 - 00:00:00 hello".len());
    }
}
