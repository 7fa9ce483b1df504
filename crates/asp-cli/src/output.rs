// Output formatting and styling

use colored::Colorize;

use asp_provision::ProvisionResult;

use crate::logging::VerbosityLevel;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    /// Plain output, for tests and piped use
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format info message
    pub fn info(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "ℹ".blue(), msg)
        } else {
            format!("ℹ {}", msg)
        }
    }

    /// Format header
    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format a section header
    pub fn section(&self, title: &str) -> String {
        if self.use_colors {
            format!(
                "\n{}\n{}",
                title.bold().underline(),
                "─".repeat(title.chars().count())
            )
        } else {
            format!("\n{}\n{}", title, "─".repeat(title.chars().count()))
        }
    }

    /// Format a list item
    pub fn list_item(&self, item: &str) -> String {
        format!("  • {}", item)
    }

    /// Format a key-value pair
    pub fn key_value(&self, key: &str, value: &str) -> String {
        if self.use_colors {
            format!("  {}: {}", key.bold(), value)
        } else {
            format!("  {}: {}", key, value)
        }
    }

    /// One provisioning result, e.g. `✓ Kafka connection 'k' created`
    pub fn provision(&self, label: &str, result: &ProvisionResult) -> String {
        match result.failure() {
            None => self.success(&format!("{} '{}' {}", label, result.resource, result.status_label())),
            Some(failure) => self.error(&format!("{} '{}' failed: {}", label, result.resource, failure)),
        }
    }
}

/// Print a line unless running quiet
pub fn print_line(line: &str) {
    if VerbosityLevel::Normal.should_output() {
        println!("{}", line);
    }
}

/// Errors are printed to stderr even in quiet mode
pub fn print_error(msg: &str) {
    let style = OutputStyle {
        use_colors: atty::is(atty::Stream::Stderr),
    };
    eprintln!("{}", style.error(msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_markers() {
        let style = OutputStyle::plain();
        assert_eq!(style.success("done"), "✓ done");
        assert_eq!(style.error("bad"), "✗ bad");
        assert_eq!(style.warning("hmm"), "⚠ hmm");
        assert_eq!(style.info("fyi"), "ℹ fyi");
        assert_eq!(style.key_value("k", "v"), "  k: v");
    }

    #[test]
    fn test_section_underline_matches_title() {
        let style = OutputStyle::plain();
        assert_eq!(style.section("Summary"), "\nSummary\n───────");
    }

    #[test]
    fn test_provision_lines() {
        use asp_provision::ProvisionFailure;

        let style = OutputStyle::plain();
        assert_eq!(
            style.provision("Topic", &ProvisionResult::reused("t")),
            "✓ Topic 't' reused (already existed)"
        );
        assert_eq!(
            style.provision(
                "Topic",
                &ProvisionResult::failed("t", ProvisionFailure::Timeout { seconds: 30 })
            ),
            format!("✗ Topic 't' failed: {}", ProvisionFailure::Timeout { seconds: 30 })
        );
    }
}
