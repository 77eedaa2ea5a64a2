//! Demo sign-in gate: a fixed credential table and a session flag. This is
//! the whole of authentication in this demo.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// (email, password, name, id)
const DEMO_USERS: &[(&str, &str, &str, &str)] = &[
    ("demo@example.com", "demo123", "Demo User", "1"),
    ("test@example.com", "test123", "Test User", "2"),
];

/// Checks a credential pair against the demo table.
pub fn verify_credentials(email: &str, password: &str) -> Option<UserProfile> {
    DEMO_USERS
        .iter()
        .find(|(known_email, known_password, _, _)| {
            *known_email == email && *known_password == password
        })
        .map(|(known_email, _, name, id)| UserProfile {
            id: (*id).to_string(),
            email: (*known_email).to_string(),
            name: (*name).to_string(),
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionGate {
    user: Option<UserProfile>,
}

impl SessionGate {
    pub fn sign_in(&mut self, profile: UserProfile) {
        self.user = Some(profile);
    }

    pub fn sign_out(&mut self) {
        self.user = None;
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }
}
