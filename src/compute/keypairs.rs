// Copyright 2025 The oscloud contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Key pair management.

use serde::{Deserialize, Serialize};

use super::protocol::KeyPair;
use crate::services::COMPUTE;
use crate::{Error, ErrorKind, Session};

/// A request to create or import a key pair.
#[derive(Clone, Debug, Serialize)]
pub struct KeyPairCreate {
    /// Name of the new key pair.
    pub name: String,
    /// Public key to import.
    ///
    /// A new key pair is generated by the cloud when this field is missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl KeyPairCreate {
    /// Create a request for a generated key pair.
    pub fn new<S: Into<String>>(name: S) -> KeyPairCreate {
        KeyPairCreate {
            name: name.into(),
            public_key: None,
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.name.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Key pair name is required",
            ));
        }
        Ok(())
    }
}

// The key pair API wraps every item in the listing in yet another object.
#[derive(Debug, Deserialize)]
struct KeyPairItem {
    keypair: KeyPair,
}

#[derive(Debug, Deserialize)]
struct KeyPairsRoot {
    keypairs: Vec<KeyPairItem>,
}

#[derive(Debug, Deserialize)]
struct KeyPairRoot {
    keypair: KeyPair,
}

#[derive(Debug, Serialize)]
struct KeyPairCreateRoot<'a> {
    keypair: &'a KeyPairCreate,
}

/// List key pairs of the current user.
pub async fn list(session: &Session) -> Result<Vec<KeyPair>, Error> {
    let root: KeyPairsRoot = session
        .get(COMPUTE, &["os-keypairs"])
        .await?
        .fetch_json()
        .await?;
    Ok(root.keypairs.into_iter().map(|item| item.keypair).collect())
}

/// Get a key pair by its name.
pub async fn get(session: &Session, name: &str) -> Result<KeyPair, Error> {
    let root: KeyPairRoot = session
        .get(COMPUTE, &["os-keypairs", name])
        .await?
        .fetch_json()
        .await?;
    Ok(root.keypair)
}

/// Create or import a key pair.
pub async fn create(session: &Session, request: KeyPairCreate) -> Result<KeyPair, Error> {
    request.validate()?;
    let root: KeyPairRoot = session
        .post(COMPUTE, &["os-keypairs"])
        .await?
        .json(&KeyPairCreateRoot { keypair: &request })
        .fetch_json()
        .await?;
    Ok(root.keypair)
}

/// Delete a key pair.
pub async fn delete(session: &Session, name: &str) -> Result<(), Error> {
    let _ = session
        .delete(COMPUTE, &["os-keypairs", name])
        .await?
        .send()
        .await?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{KeyPairCreate, KeyPairsRoot};
    use crate::common::test::compare;
    use crate::ErrorKind;

    #[test]
    fn test_create_missing_name() {
        let request = KeyPairCreate::new("");
        assert_eq!(
            request.validate().err().unwrap().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_create_body() {
        let mut request = KeyPairCreate::new("default");
        request.public_key = Some("ssh-rsa AAAA...".into());
        request.validate().unwrap();
        compare(
            r#"{"name": "default", "public_key": "ssh-rsa AAAA..."}"#,
            request,
        );
    }

    #[test]
    fn test_listing_unwraps_items() {
        let root: KeyPairsRoot = serde_json::from_str(
            r#"{"keypairs": [
                {"keypair": {"name": "k1", "public_key": "ssh-rsa AAAA", "fingerprint": "aa:bb"}},
                {"keypair": {"name": "k2", "public_key": "ssh-ed25519 BBBB"}}
            ]}"#,
        )
        .unwrap();
        let names: Vec<_> = root
            .keypairs
            .into_iter()
            .map(|item| item.keypair.name)
            .collect();
        assert_eq!(names, vec!["k1", "k2"]);
    }
}
