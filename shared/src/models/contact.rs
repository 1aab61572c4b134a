//! Contact fields attached to an order

use serde::{Deserialize, Serialize};

/// Optional buyer contact details; blank fields are treated as absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl ContactFields {
    pub fn company(&self) -> Option<&str> {
        non_blank(&self.company)
    }

    pub fn name(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    pub fn email(&self) -> Option<&str> {
        non_blank(&self.email)
    }

    pub fn phone(&self) -> Option<&str> {
        non_blank(&self.phone)
    }

    pub fn is_empty(&self) -> bool {
        self.company().is_none()
            && self.name().is_none()
            && self.email().is_none()
            && self.phone().is_none()
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
