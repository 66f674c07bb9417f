use serde::{Deserialize, Serialize};

use super::record::RecordKind;

/// Management screens guarded by roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    ManageEmployee,
    ManageClient,
    ManageAccount,
    ManageProject,
    ManageExpense,
    ManageEarning,
    ManageRoles,
}

impl Screen {
    /// Prefix used in role strings, e.g. `"ManageExpense"`.
    #[must_use]
    pub fn role_prefix(&self) -> &'static str {
        match self {
            Screen::ManageEmployee => "ManageEmployee",
            Screen::ManageClient => "ManageClient",
            Screen::ManageAccount => "ManageAccount",
            Screen::ManageProject => "ManageProject",
            Screen::ManageExpense => "ManageExpense",
            Screen::ManageEarning => "ManageEarning",
            Screen::ManageRoles => "ManageRoles",
        }
    }

    /// Role string granting read-only access.
    #[must_use]
    pub fn read_role(&self) -> String {
        format!("{}:read", self.role_prefix())
    }

    /// Role string granting full access.
    #[must_use]
    pub fn full_access_role(&self) -> String {
        format!("{}:full access", self.role_prefix())
    }

    /// Screen that manages records of the given kind.
    #[must_use]
    pub fn for_record_kind(kind: RecordKind) -> Screen {
        match kind {
            RecordKind::Expense => Screen::ManageExpense,
            RecordKind::Earning => Screen::ManageEarning,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.role_prefix())
    }
}

/// What a user may do on a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccessLevel {
    None,
    ReadOnly,
    Full,
}

impl AccessLevel {
    /// Derive the access level from a user's role strings.
    /// Role strings are matched exactly.
    pub fn from_roles<S: AsRef<str>>(roles: &[S], screen: Screen) -> AccessLevel {
        let full = screen.full_access_role();
        let read = screen.read_role();
        if roles.iter().any(|r| r.as_ref() == full) {
            AccessLevel::Full
        } else if roles.iter().any(|r| r.as_ref() == read) {
            AccessLevel::ReadOnly
        } else {
            AccessLevel::None
        }
    }

    #[must_use]
    pub fn can_read(&self) -> bool {
        *self >= AccessLevel::ReadOnly
    }

    #[must_use]
    pub fn can_write(&self) -> bool {
        *self == AccessLevel::Full
    }
}
