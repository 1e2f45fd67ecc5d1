//! Space settings records.
//!
//! Two records configure where imports land:
//!
//! - the **global** default space, one per installation, stored plain;
//! - **personal** settings, one per user account, holding a target instance
//!   URL and that user's API credentials, stored secret-grade.
//!
//! The personal token is write-only from the client's point of view: reads
//! that leave the backend go through [`PersonalSettings::sanitized`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ext::KvsExt;
use crate::kvs::{Kvs, KvsError};

/// Key prefix for settings records.
const KEY_PREFIX: &str = "settings";

/// Key component for the global space record.
const GLOBAL_COMPONENT: &str = "globalSpace";

/// Key component for personal settings records.
const PERSONAL_COMPONENT: &str = "personal";

/// Minimum accepted account id length.
const MIN_ACCOUNT_ID_LEN: usize = 8;

/// Space identifier, which the remote API returns as either a string or a
/// number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpaceId {
    /// String form.
    Str(String),
    /// Numeric form.
    Num(u64),
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Num(n) => write!(f, "{n}"),
        }
    }
}

/// Space icon metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceIcon {
    /// Icon path relative to the instance base URL.
    pub path: String,
}

/// Space homepage reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceHomepage {
    /// Homepage content id.
    pub id: SpaceId,
}

/// A Confluence space, as configured for the whole installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// Space id.
    pub id: SpaceId,
    /// Space key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Space status (e.g. "current").
    pub status: String,
    /// Icon, when the space has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<SpaceIcon>,
    /// Homepage, used as the parent for imported pages when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<SpaceHomepage>,
}

/// Stored user credentials for a remote instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authentication {
    /// Account email.
    pub email: String,
    /// API token. Never echoed back to clients.
    pub token: String,
}

/// Destination space reference inside personal settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceRef {
    /// Space id on the target instance.
    pub id: String,
}

/// One literal text substitution applied to page bodies before they are
/// sent to a remote instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Literal text to replace.
    pub from: String,
    /// Replacement text.
    pub to: String,
}

/// Per-user export settings, including a possibly-remote target instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalSettings {
    /// Base URL of the target Confluence instance.
    pub target_instance: String,
    /// The user's credentials on that instance.
    pub authentication: Authentication,
    /// Destination space.
    pub space: SpaceRef,
    /// Literal substitutions applied to page bodies before send.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacements: Option<Vec<Replacement>>,
}

impl PersonalSettings {
    /// Copy of these settings safe to return to a client: the token is
    /// blanked, only the email survives.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            authentication: Authentication {
                email: self.authentication.email.clone(),
                token: String::new(),
            },
            ..self.clone()
        }
    }
}

/// Repository for the global space and personal settings records.
///
/// Layout: `settings-globalSpace` (plain), `settings-personal-{accountId}`
/// (secret-grade; personal settings carry credentials). Unlike link keys,
/// the account id component is not scanned by prefix, so it only needs to
/// be non-trivial, not delimiter-free.
pub struct SettingsRepository {
    store: Arc<dyn Kvs>,
}

impl SettingsRepository {
    /// Create a repository over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Kvs>) -> Self {
        Self { store }
    }

    /// Store (or overwrite) the global default space.
    ///
    /// # Errors
    ///
    /// Returns a store error on write failure.
    pub fn save_global(&self, space: &Space) -> Result<(), KvsError> {
        self.store.set_json(&Self::global_key(), space)
    }

    /// The global default space, when one has been configured.
    ///
    /// # Errors
    ///
    /// Returns a store error on read failure.
    pub fn get_global(&self) -> Result<Option<Space>, KvsError> {
        self.store.get_json(&Self::global_key())
    }

    /// Store (or overwrite) one user's personal settings, secret-grade.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError::InvalidRecord`] for an account id shorter than
    /// eight characters, or a store error on write failure.
    pub fn save_personal(
        &self,
        account_id: &str,
        settings: &PersonalSettings,
    ) -> Result<(), KvsError> {
        let key = Self::personal_key(account_id)?;
        debug!("saving personal settings for account {account_id}");
        self.store.set_secret_json(&key, settings)
    }

    /// One user's personal settings, when they exist.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError::InvalidRecord`] for an invalid account id, or a
    /// store error on read failure.
    pub fn get_personal(&self, account_id: &str) -> Result<Option<PersonalSettings>, KvsError> {
        let key = Self::personal_key(account_id)?;
        self.store.get_secret_json(&key)
    }

    fn global_key() -> String {
        format!("{KEY_PREFIX}-{GLOBAL_COMPONENT}")
    }

    fn personal_key(account_id: &str) -> Result<String, KvsError> {
        if account_id.trim().len() < MIN_ACCOUNT_ID_LEN {
            return Err(KvsError::InvalidRecord(format!(
                "account id must be at least {MIN_ACCOUNT_ID_LEN} characters"
            )));
        }
        Ok(format!("{KEY_PREFIX}-{PERSONAL_COMPONENT}-{account_id}"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::memory::MemoryKvs;

    fn space() -> Space {
        Space {
            id: SpaceId::Num(1),
            key: "KEY".to_owned(),
            name: "Space".to_owned(),
            status: "current".to_owned(),
            icon: None,
            homepage: None,
        }
    }

    fn personal() -> PersonalSettings {
        PersonalSettings {
            target_instance: "https://other.example.com".to_owned(),
            authentication: Authentication {
                email: "a@b.com".to_owned(),
                token: "tok".to_owned(),
            },
            space: SpaceRef { id: "1".to_owned() },
            replacements: Some(vec![Replacement {
                from: "a".to_owned(),
                to: "b".to_owned(),
            }]),
        }
    }

    fn repository() -> (Arc<MemoryKvs>, SettingsRepository) {
        let store = Arc::new(MemoryKvs::new());
        let repo = SettingsRepository::new(Arc::clone(&store) as Arc<dyn Kvs>);
        (store, repo)
    }

    #[test]
    fn test_global_round_trip() {
        let (store, repo) = repository();

        repo.save_global(&space()).unwrap();
        assert!(store.get("settings-globalSpace").unwrap().is_some());
        assert_eq!(repo.get_global().unwrap(), Some(space()));
    }

    #[test]
    fn test_global_absent_is_none() {
        let (_, repo) = repository();
        assert_eq!(repo.get_global().unwrap(), None);
    }

    #[test]
    fn test_global_overwrite() {
        let (_, repo) = repository();

        repo.save_global(&space()).unwrap();
        let renamed = Space {
            name: "Renamed".to_owned(),
            ..space()
        };
        repo.save_global(&renamed).unwrap();
        assert_eq!(repo.get_global().unwrap(), Some(renamed));
    }

    #[test]
    fn test_personal_round_trip_in_secret_storage() {
        let (store, repo) = repository();

        repo.save_personal("12345678", &personal()).unwrap();

        // Credentials never land in plain storage
        assert!(store.get("settings-personal-12345678").unwrap().is_none());
        assert!(store.get_secret("settings-personal-12345678").unwrap().is_some());

        assert_eq!(repo.get_personal("12345678").unwrap(), Some(personal()));
    }

    #[test]
    fn test_personal_rejects_short_account_id() {
        let (_, repo) = repository();
        assert!(matches!(
            repo.save_personal("short", &personal()),
            Err(KvsError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_personal_absent_is_none() {
        let (_, repo) = repository();
        assert_eq!(repo.get_personal("12345678").unwrap(), None);
    }

    #[test]
    fn test_sanitized_blanks_token_only() {
        let sanitized = personal().sanitized();
        assert_eq!(sanitized.authentication.email, "a@b.com");
        assert_eq!(sanitized.authentication.token, "");
        assert_eq!(sanitized.target_instance, personal().target_instance);
        assert_eq!(sanitized.replacements, personal().replacements);
    }

    #[test]
    fn test_space_id_accepts_string_or_number() {
        let from_num: Space = serde_json::from_str(
            r#"{"id": 635502596, "key": "K", "name": "N", "status": "current"}"#,
        )
        .unwrap();
        assert_eq!(from_num.id.to_string(), "635502596");

        let from_str: Space =
            serde_json::from_str(r#"{"id": "abc", "key": "K", "name": "N", "status": "current"}"#)
                .unwrap();
        assert_eq!(from_str.id.to_string(), "abc");
    }

    #[test]
    fn test_personal_settings_json_shape() {
        let json = serde_json::to_value(personal()).unwrap();
        assert_eq!(json["targetInstance"], "https://other.example.com");
        assert_eq!(json["authentication"]["email"], "a@b.com");
        assert_eq!(json["space"]["id"], "1");
        assert_eq!(json["replacements"][0]["from"], "a");
    }
}
