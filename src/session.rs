use serde::{Deserialize, Serialize};

/// The simulated auth flag. The shell consults it for navigation gating;
/// the data layer never depends on it (authorization enforcement is a
/// non-goal here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

#[derive(Debug, Default)]
pub struct Session {
    role: Option<Role>,
}

impl Session {
    pub fn login(&mut self, role: Role) {
        self.role = Some(role);
    }

    pub fn logout(&mut self) {
        self.role = None;
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn can_manage(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}
