//! Session state
//!
//! The signed-in identity is an explicit value: login returns a `Session`,
//! logout consumes it. Nothing is kept in ambient global storage.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the platform a login targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Voter,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Voter => write!(f, "Voter"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

/// Current session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Session {
    #[default]
    Anonymous,
    Voter { voter_id: String },
    Admin { id: String },
}

/// A navigation entry and the route it leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: &'static str,
}

impl Session {
    pub fn role(&self) -> Option<Role> {
        match self {
            Session::Anonymous => None,
            Session::Voter { .. } => Some(Role::Voter),
            Session::Admin { .. } => Some(Role::Admin),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        !matches!(self, Session::Anonymous)
    }

    /// Greeting shown after a successful login
    pub fn welcome_message(&self) -> Option<String> {
        self.role().map(|role| format!("Welcome back, {}!", role))
    }

    /// Links visible for this session
    pub fn nav_links(&self) -> Vec<NavLink> {
        let mut links = vec![NavLink { label: "Home", route: "/" }];

        match self {
            Session::Admin { .. } => {
                links.push(NavLink { label: "Dashboard", route: "/adminDashbord" });
                links.push(NavLink { label: "Log Out", route: "/" });
            }
            Session::Voter { .. } => {
                links.push(NavLink { label: "My Profile", route: "/profile" });
                links.push(NavLink { label: "Log Out", route: "/" });
            }
            Session::Anonymous => {
                links.push(NavLink { label: "Login", route: "/login" });
                links.push(NavLink { label: "Sign Up", route: "/signup" });
            }
        }

        links
    }

    /// End the session, returning the message to show the user
    ///
    /// An admin session takes precedence when deciding the message; an
    /// anonymous session logs out as a voter.
    pub fn logout(self) -> (Session, &'static str) {
        let message = match self {
            Session::Admin { .. } => "Admin Logout Successful",
            Session::Voter { .. } | Session::Anonymous => "Voter Logout Successful",
        };
        (Session::Anonymous, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(session: &Session) -> Vec<&'static str> {
        session.nav_links().iter().map(|l| l.label).collect()
    }

    #[test]
    fn test_nav_links_by_role() {
        assert_eq!(labels(&Session::Anonymous), vec!["Home", "Login", "Sign Up"]);
        assert_eq!(
            labels(&Session::Voter { voter_id: "V-1".into() }),
            vec!["Home", "My Profile", "Log Out"]
        );
        assert_eq!(
            labels(&Session::Admin { id: "1".into() }),
            vec!["Home", "Dashboard", "Log Out"]
        );
    }

    #[test]
    fn test_logout_messages() {
        let (session, msg) = Session::Admin { id: "1".into() }.logout();
        assert_eq!(session, Session::Anonymous);
        assert_eq!(msg, "Admin Logout Successful");

        let (_, msg) = Session::Voter { voter_id: "V-1".into() }.logout();
        assert_eq!(msg, "Voter Logout Successful");
    }

    #[test]
    fn test_welcome_message() {
        assert_eq!(Session::Anonymous.welcome_message(), None);
        assert_eq!(
            Session::Admin { id: "1".into() }.welcome_message().as_deref(),
            Some("Welcome back, Admin!")
        );
    }

    #[test]
    fn test_session_serialization() {
        let session = Session::Voter { voter_id: "V-1".into() };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["role"], "voter");
        assert_eq!(json["voter_id"], "V-1");
    }
}
