use std::fmt;

use serde::{Deserialize, Serialize};

use super::states::state_name;

/// The capacity in which a participant appears at a hearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Witness,
    Chair,
    Clerk,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Member => "member",
            Role::Witness => "witness",
            Role::Chair => "chair",
            Role::Clerk => "clerk",
        };
        f.write_str(label)
    }
}

/// A known participant of a hearing, as listed on the document roster or
/// confirmed during disambiguation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Full name in "Last, First" order
    #[serde(rename = "name")]
    pub full_name: String,
    pub role: Role,
    /// Surname, possibly several tokens ("Van Buren")
    pub last_name: String,
    /// Full state name; empty for witnesses
    #[serde(rename = "state", default)]
    pub state_name: String,
    /// Two-letter state code; empty for witnesses
    #[serde(default)]
    pub state_code: String,
}

impl Participant {
    /// A committee member identified by state
    pub fn member(
        full_name: impl Into<String>,
        last_name: impl Into<String>,
        state_code: impl Into<String>,
    ) -> Self {
        let state_code = state_code.into();
        Self {
            full_name: full_name.into(),
            role: Role::Member,
            last_name: last_name.into(),
            state_name: state_name(&state_code).unwrap_or_default().to_string(),
            state_code,
        }
    }

    /// A witness, who carries no state
    pub fn witness(full_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            role: Role::Witness,
            last_name: last_name.into(),
            state_name: String::new(),
            state_code: String::new(),
        }
    }

    /// Build a participant from manually entered fields.
    ///
    /// The role is inferred: without a state code the speaker is a witness,
    /// otherwise a member.
    pub fn manual(last_name: &str, first_name: &str, state_code: &str) -> Self {
        let last_name = last_name.trim();
        let first_name = first_name.trim();
        let state_code = state_code.trim().to_uppercase();
        let full_name = if first_name.is_empty() {
            last_name.to_string()
        } else {
            format!("{}, {}", last_name, first_name)
        };

        if state_code.is_empty() {
            Self::witness(full_name, last_name)
        } else {
            Self::member(full_name, last_name, state_code)
        }
    }

    /// Surname tokens in order
    pub fn surname_tokens(&self) -> impl Iterator<Item = &str> {
        self.last_name.split_whitespace()
    }

    /// Number of tokens in the surname
    pub fn surname_token_count(&self) -> usize {
        self.surname_tokens().count()
    }

    /// Final token of the surname ("Buren" for "Van Buren")
    pub fn surname_tail(&self) -> &str {
        self.surname_tokens().last().unwrap_or("")
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.state_name.is_empty() {
            write!(f, "{} ({})", self.full_name, self.role)
        } else {
            write!(f, "{} ({}, {})", self.full_name, self.role, self.state_name)
        }
    }
}
