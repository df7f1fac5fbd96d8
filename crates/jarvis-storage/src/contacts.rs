//! Persisted contact list, addressed by position.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use jarvis_core::error::Result;

use crate::json_file::JsonArrayFile;
use crate::timestamp_now;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub created_at: String,
}

pub struct ContactBook {
    file: JsonArrayFile<Contact>,
}

impl ContactBook {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            file: JsonArrayFile::open(path)?,
        })
    }

    pub fn add(&self, name: &str, phone: &str, email: &str) -> Result<Contact> {
        let contact = Contact {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            created_at: timestamp_now(),
        };
        let stored = contact.clone();
        self.file.update(|contacts| contacts.push(stored))?;
        tracing::info!(name = %contact.name, "Contact added");
        Ok(contact)
    }

    pub fn list(&self) -> Vec<Contact> {
        self.file.load()
    }

    /// Remove the contact at `index`. `false` when out of range.
    pub fn delete(&self, index: usize) -> Result<bool> {
        let removed = self.file.update(|contacts| {
            if index < contacts.len() {
                Some(contacts.remove(index))
            } else {
                None
            }
        })?;
        match removed {
            Some(contact) => {
                tracing::info!(index, name = %contact.name, "Contact deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
