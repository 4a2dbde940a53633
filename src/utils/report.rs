//! Error reporting sinks
//!
//! The scanner hands every lexical error to a [`Reporter`] as soon as it
//! is found. Reporters never influence the scan.

/// Receives `(line, message)` pairs
pub trait Reporter {
    fn report(&mut self, line: usize, message: &str);
}

/// Prints `[line N] Error: message` to stderr
#[derive(Debug, Default)]
pub struct StderrReporter {
    count: usize,
}

impl StderrReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Reporter for StderrReporter {
    fn report(&mut self, line: usize, message: &str) {
        eprintln!("{}", format_report(line, message));
        self.count += 1;
    }
}

/// Records every report in order
#[cfg(test)]
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub reports: Vec<(usize, String)>,
}

#[cfg(test)]
impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Reporter for CollectingReporter {
    fn report(&mut self, line: usize, message: &str) {
        self.reports.push((line, message.to_string()));
    }
}

/// Discards reports
#[cfg(test)]
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

#[cfg(test)]
impl Reporter for SilentReporter {
    fn report(&mut self, _line: usize, _message: &str) {}
}

pub fn format_report(line: usize, message: &str) -> String {
    format!("[line {}] Error: {}", line, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_report() {
        assert_eq!(
            format_report(3, "Unterminated string."),
            "[line 3] Error: Unterminated string."
        );
    }

    #[test]
    fn test_stderr_reporter_counts() {
        let mut reporter = StderrReporter::new();
        assert_eq!(reporter.count(), 0);
        reporter.report(1, "Unexpected character: #");
        reporter.report(2, "Unexpected character: $");
        assert_eq!(reporter.count(), 2);
    }

    #[test]
    fn test_collecting_reporter_keeps_order() {
        let mut reporter = CollectingReporter::new();
        reporter.report(2, "b");
        reporter.report(1, "a");
        assert_eq!(reporter.reports, vec![(2, "b".to_string()), (1, "a".to_string())]);
    }
}
