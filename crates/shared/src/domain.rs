use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

macro_rules! keyword_enum {
    ($name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let needle = raw.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| UnknownVariant::new($kind, raw))
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Message,
}

keyword_enum!(FormField, "form field" {
    Name => "name",
    Email => "email",
    Message => "message",
});

impl FormField {
    /// Human label used in inline error messages.
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Message => "Message",
        }
    }
}

/// Lifecycle of one contact form submission.
///
/// `Validating` is only held while the field rules run; `Succeeded` and
/// `Failed` leave the form interactive again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    pub fn is_in_flight(self) -> bool {
        self == SubmissionStatus::Submitting
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionStatus::Succeeded | SubmissionStatus::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    #[default]
    All,
    Web,
    Mobile,
    Featured,
}

keyword_enum!(FilterType, "filter" {
    All => "all",
    Web => "web",
    Mobile => "mobile",
    Featured => "featured",
});

impl FilterType {
    /// Category value a project must carry to pass this filter, if the filter
    /// is category based.
    pub fn category(self) -> Option<&'static str> {
        match self {
            FilterType::Web => Some("web"),
            FilterType::Mobile => Some("mobile"),
            FilterType::All | FilterType::Featured => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Grid,
    Masonry,
    Featured,
}

keyword_enum!(ViewMode, "view mode" {
    Grid => "grid",
    Masonry => "masonry",
    Featured => "featured",
});

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
