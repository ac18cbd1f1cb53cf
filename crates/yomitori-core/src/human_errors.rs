// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command-line surface.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity decides how the CLI words the failure and which exit code it uses.

use crate::error::YomitoriError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// User must do something (install a language, fix a path or flag).
    ActionRequired,
    /// Cannot be fixed by the user, e.g. a corrupt image or an engine crash.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (first line of output).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

impl HumanError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity {
            Severity::ActionRequired => 2,
            Severity::Permanent => 1,
        }
    }
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n  {}", self.message, self.suggestion)
    }
}

/// Convert a `YomitoriError` into a `HumanError`.
pub fn humanize_error(err: &YomitoriError) -> HumanError {
    match err {
        YomitoriError::ImageRead { path, reason } => {
            let lower = reason.to_ascii_lowercase();
            if lower.contains("no such file") || lower.contains("not found") {
                HumanError {
                    message: format!("The image {} couldn't be found.", path.display()),
                    suggestion: "Check the path and try again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if lower.contains("unsupported") || lower.contains("format") {
                HumanError {
                    message: format!("{} isn't an image format we can read.", path.display()),
                    suggestion: "Convert it to PNG, JPEG, or TIFF first.".into(),
                    severity: Severity::Permanent,
                }
            } else {
                HumanError {
                    message: format!("There's a problem with the image {}.", path.display()),
                    suggestion: format!("The file may be damaged. ({reason})"),
                    severity: Severity::Permanent,
                }
            }
        }

        YomitoriError::Encoding(detail) => HumanError {
            message: "The cleaned-up image couldn't be prepared for recognition.".into(),
            suggestion: format!("Try a smaller target pixel area. ({detail})"),
            severity: Severity::Permanent,
        },

        YomitoriError::AccelerationUnavailable(detail) => HumanError {
            message: "Accelerated preprocessing isn't available in this build.".into(),
            suggestion: format!(
                "Run with `--mode standard`, or drop `--no-fallback` to fall back \
                 automatically. ({detail})"
            ),
            severity: Severity::ActionRequired,
        },

        YomitoriError::LanguageNotAvailable { code, dir } => HumanError {
            message: format!("The language '{code}' isn't installed."),
            suggestion: format!(
                "Install {code}.traineddata into {} or point `--tessdata` at a directory \
                 that has it. `--list-languages` shows what is installed.",
                dir.display()
            ),
            severity: Severity::ActionRequired,
        },

        YomitoriError::Recognition(detail) => HumanError {
            message: "Text recognition didn't work on this image.".into(),
            suggestion: format!(
                "Check that Tesseract is installed and the language data matches its \
                 version. ({detail})"
            ),
            severity: Severity::Permanent,
        },

        YomitoriError::InvalidConfig(detail) => HumanError {
            message: "The settings aren't valid.".into(),
            suggestion: detail.clone(),
            severity: Severity::ActionRequired,
        },

        YomitoriError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file or directory couldn't be found.".into(),
                    suggestion: "Check the `--tessdata` and `--config` paths.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied while reading a file or directory.".into(),
                    suggestion: "Check the permissions of the language-data directory and \
                                 config file."
                        .into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading a file.".into(),
                    suggestion: format!("{io_err}"),
                    severity: Severity::Permanent,
                }
            }
        }

        YomitoriError::Serialization(detail) => HumanError {
            message: "The config file couldn't be read.".into(),
            suggestion: format!("Check that it is valid JSON. ({detail})"),
            severity: Severity::ActionRequired,
        },
    }
}
