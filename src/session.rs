// Login gate
// A single local account checked before the library is shown. Once passed,
// the gate stays open for the rest of the process (a "session").

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: String, password: String) -> Self {
        Credentials { username, password }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Which field of the login form has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug)]
pub struct LoginGate {
    credentials: Credentials,
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
    passed: bool,
}

impl LoginGate {
    pub fn new(credentials: Credentials) -> Self {
        LoginGate {
            credentials,
            username: String::new(),
            password: String::new(),
            focus: LoginField::Username,
            error: None,
            passed: false,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.passed
    }

    pub fn push_char(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn pop_char(&mut self) {
        self.focused_mut().pop();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    /// Checks the form. On failure the password field is cleared.
    pub fn submit(&mut self) -> bool {
        if self.credentials.matches(&self.username, &self.password) {
            info!(user = %self.username, "Login ok");
            self.passed = true;
            self.error = None;
        } else {
            warn!(user = %self.username, "Login rejected");
            self.error = Some("Wrong username or password".to_string());
            self.password.clear();
            self.focus = LoginField::Password;
        }
        self.passed
    }

    /// Password rendered as asterisks
    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }
}
