//! Library staff records

use serde::{Deserialize, Serialize};

/// A library employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,

    /// Employee registration number
    pub registration: String,

    pub role: String,
}

impl Staff {
    pub fn new(
        name: impl Into<String>,
        registration: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            registration: registration.into(),
            role: role.into(),
        }
    }

    pub fn with_contact(mut self, email: impl Into<String>, phone: impl Into<String>) -> Self {
        self.email = email.into();
        self.phone = phone.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_contact_is_not_serialized() {
        let staff = Staff::new("Ana Silva", "FUNC001", "Librarian");
        let json = serde_json::to_value(&staff).unwrap();

        assert!(json.get("email").is_none());
        assert_eq!(json["registration"], "FUNC001");
    }

    #[test]
    fn with_contact() {
        let staff = Staff::new("Ana Silva", "FUNC001", "Librarian")
            .with_contact("ana@biblioteca.com", "(11) 9999-8888");

        assert_eq!(staff.email, "ana@biblioteca.com");
        assert_eq!(staff.phone, "(11) 9999-8888");
    }
}
