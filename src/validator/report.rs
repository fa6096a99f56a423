use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of one check on one document field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// A fact could not be verified or looks suspicious; does not fail the document
    Warning(String),
    /// Check failed
    Failed(String),
}

/// Result of one check on one document field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationCheck {
    /// Dotted path of the field, e.g. `datapoints[0].temperature`
    pub field: String,
    /// Result status of the check
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            status: CheckStatus::Ok,
        }
    }

    pub(crate) fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    pub(crate) fn failed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

/// Errors and warnings collected for one field path
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldFindings<'r> {
    /// Dotted field path
    pub field: &'r str,
    /// Error messages in the order they were found
    pub errors: Vec<&'r str>,
    /// Warning messages in the order they were found
    pub warnings: Vec<&'r str>,
}

/// All checks run against one ChemKED document.
///
/// The useful view is per field: [`errors`](Self::errors) gives
/// `(field, message)` pairs, [`by_field`](Self::by_field) groups them by
/// field path in the order fields were first reported.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// Individual check results in the order they ran
    pub checks: Vec<ValidationCheck>,
    /// Name of the validated document (file path or a placeholder)
    pub source: String,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            source: source.into(),
        }
    }

    /// Record a check result
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    fn messages<'r>(
        &'r self,
        pick: fn(&CheckStatus) -> Option<&str>,
    ) -> impl Iterator<Item = (&'r str, &'r str)> + 'r {
        self.checks
            .iter()
            .filter_map(move |c| pick(&c.status).map(|msg| (c.field.as_str(), msg)))
    }

    /// True if any field failed
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// True if any fact was left unverified
    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// Number of passed checks
    pub fn success_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Ok)
            .count()
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.messages(warning_message).count()
    }

    /// Number of errors
    pub fn failure_count(&self) -> usize {
        self.messages(error_message).count()
    }

    /// `(field, message)` for every error
    pub fn errors(&self) -> Vec<(String, String)> {
        self.messages(error_message)
            .map(|(field, msg)| (field.to_string(), msg.to_string()))
            .collect()
    }

    /// `(field, message)` for every warning
    pub fn warnings(&self) -> Vec<(String, String)> {
        self.messages(warning_message)
            .map(|(field, msg)| (field.to_string(), msg.to_string()))
            .collect()
    }

    /// Error messages attached to one field
    pub fn errors_for(&self, field: &str) -> Vec<&str> {
        self.messages(error_message)
            .filter(|(f, _)| *f == field)
            .map(|(_, msg)| msg)
            .collect()
    }

    /// Fields with at least one error or warning, grouped
    pub fn by_field(&self) -> Vec<FieldFindings<'_>> {
        let mut grouped: Vec<FieldFindings<'_>> = Vec::new();
        for check in &self.checks {
            let (error, warning) = match &check.status {
                CheckStatus::Ok => continue,
                CheckStatus::Failed(msg) => (Some(msg.as_str()), None),
                CheckStatus::Warning(msg) => (None, Some(msg.as_str())),
            };
            let idx = match grouped.iter().position(|g| g.field == check.field) {
                Some(idx) => idx,
                None => {
                    grouped.push(FieldFindings {
                        field: &check.field,
                        ..Default::default()
                    });
                    grouped.len() - 1
                }
            };
            grouped[idx].errors.extend(error);
            grouped[idx].warnings.extend(warning);
        }
        grouped
    }

    fn summary(&self) -> String {
        format!(
            "{}: {} error(s), {} warning(s), {} check(s) passed",
            self.source,
            self.failure_count(),
            self.warning_count(),
            self.success_count()
        )
    }

    /// Render with field paths colored by severity (plain text without the
    /// `colorized_output` feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            let summary = self.summary();
            if self.has_failures() {
                output.push_str(&format!("{}\n", style(summary).red().bold()));
            } else {
                output.push_str(&format!("{}\n", style(summary).green().bold()));
            }
            for group in self.by_field() {
                let field = if group.errors.is_empty() {
                    style(group.field).yellow()
                } else {
                    style(group.field).red()
                };
                output.push_str(&format!("  {}\n", field));
                for msg in &group.errors {
                    output.push_str(&format!("    {}: {}\n", style("error").red(), msg));
                }
                for msg in &group.warnings {
                    output.push_str(&format!("    {}: {}\n", style("warning").yellow(), msg));
                }
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

fn error_message(status: &CheckStatus) -> Option<&str> {
    match status {
        CheckStatus::Failed(msg) => Some(msg.as_str()),
        _ => None,
    }
}

fn warning_message(status: &CheckStatus) -> Option<&str> {
    match status {
        CheckStatus::Warning(msg) => Some(msg.as_str()),
        _ => None,
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for group in self.by_field() {
            writeln!(f, "  {}", group.field)?;
            for msg in &group.errors {
                writeln!(f, "    error: {}", msg)?;
            }
            for msg in &group.warnings {
                writeln!(f, "    warning: {}", msg)?;
            }
        }
        Ok(())
    }
}
