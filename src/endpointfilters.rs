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

//! Filters used when looking up endpoints in a service catalog.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::Deref;
use std::str::FromStr;

use super::{Error, ErrorKind};
use crate::identity::protocol::Endpoint;

/// Interface type: public, internal or admin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InterfaceType {
    /// Public interface (used by default).
    #[default]
    Public,
    /// Internal interface.
    Internal,
    /// Administrator interface.
    Admin,
}

/// A list of acceptable interface types.
///
/// There are only three interface types, so this is a small inline array
/// rather than a heap-allocated vector.
#[derive(Clone, Copy, Eq)]
pub struct ValidInterfaces {
    items: [InterfaceType; 3],
    len: u8,
}

/// Endpoint filters for looking up endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct EndpointFilters {
    /// Acceptable endpoint interfaces in the order of preference.
    pub interfaces: ValidInterfaces,
    /// Cloud region.
    pub region: Option<String>,
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(match self {
            InterfaceType::Public => "public",
            InterfaceType::Internal => "internal",
            InterfaceType::Admin => "admin",
        })
    }
}

impl FromStr for InterfaceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" | "publicURL" => Ok(InterfaceType::Public),
            "internal" | "internalURL" => Ok(InterfaceType::Internal),
            "admin" | "adminURL" => Ok(InterfaceType::Admin),
            other => Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Unknown interface type: {}", other),
            )),
        }
    }
}

impl<T> PartialEq<T> for InterfaceType
where
    T: AsRef<str>,
{
    fn eq(&self, other: &T) -> bool {
        if let Ok(converted) = InterfaceType::from_str(other.as_ref()) {
            *self == converted
        } else {
            false
        }
    }
}

impl fmt::Debug for ValidInterfaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidInterfaces ")?;
        f.debug_list()
            .entries(&self.items[..self.len as usize])
            .finish()
    }
}

impl AsRef<[InterfaceType]> for ValidInterfaces {
    fn as_ref(&self) -> &[InterfaceType] {
        self
    }
}

impl Default for ValidInterfaces {
    /// Defaults to "public".
    fn default() -> ValidInterfaces {
        ValidInterfaces::one(InterfaceType::Public)
    }
}

impl Deref for ValidInterfaces {
    type Target = [InterfaceType];

    fn deref(&self) -> &Self::Target {
        &self.items[..self.len as usize]
    }
}

impl From<InterfaceType> for ValidInterfaces {
    fn from(value: InterfaceType) -> ValidInterfaces {
        ValidInterfaces::one(value)
    }
}

impl From<Vec<InterfaceType>> for ValidInterfaces {
    fn from(value: Vec<InterfaceType>) -> ValidInterfaces {
        Self::from_iter(value)
    }
}

impl From<&[InterfaceType]> for ValidInterfaces {
    fn from(value: &[InterfaceType]) -> ValidInterfaces {
        value.iter().collect()
    }
}

impl FromIterator<InterfaceType> for ValidInterfaces {
    /// Create from an iterator of interface types.
    ///
    /// Any duplicates are ignored.
    fn from_iter<T: IntoIterator<Item = InterfaceType>>(iter: T) -> Self {
        let mut result = ValidInterfaces::empty();
        for item in iter {
            let _ = result.push(item);
        }
        result
    }
}

impl<'s> FromIterator<&'s InterfaceType> for ValidInterfaces {
    /// Create from an iterator of interface types.
    ///
    /// Any duplicates are ignored.
    fn from_iter<T: IntoIterator<Item = &'s InterfaceType>>(iter: T) -> Self {
        iter.into_iter().copied().collect()
    }
}

impl PartialEq for ValidInterfaces {
    fn eq(&self, other: &ValidInterfaces) -> bool {
        self.len == other.len && self.items[..self.len as usize] == other.items[..self.len as usize]
    }
}

impl Hash for ValidInterfaces {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        self.items[..self.len as usize].hash(state);
    }
}

impl ValidInterfaces {
    /// One valid interface.
    #[inline]
    pub fn one(item: InterfaceType) -> ValidInterfaces {
        ValidInterfaces {
            items: [item; 3],
            len: 1,
        }
    }

    /// Add an item to the end.
    ///
    /// Returns `true` if the item was added and `false` on duplicate.
    #[inline]
    pub fn push(&mut self, item: InterfaceType) -> bool {
        // There are exactly 3 possible interface types, overflow is impossible.
        if !self.contains(&item) {
            self.items[self.len as usize] = item;
            self.len += 1;
            true
        } else {
            false
        }
    }

    #[inline]
    fn empty() -> ValidInterfaces {
        ValidInterfaces {
            items: [InterfaceType::Public; 3],
            len: 0,
        }
    }

    /// The position of a textual interface name in the list, if any.
    #[inline]
    pub(crate) fn find(&self, interface: &str) -> Option<usize> {
        self.iter().position(|x| x == &interface)
    }

    /// Whether the interfaces match the provided endpoint.
    pub(crate) fn check(&self, endpoint: &Endpoint) -> bool {
        self.find(&endpoint.interface).is_some()
    }
}

impl EndpointFilters {
    /// Create filters with interfaces and region.
    ///
    /// Hint: use `default` to create empty filters (and `with_*` methods to populate it).
    pub fn new<I, S>(interfaces: I, region: S) -> EndpointFilters
    where
        I: IntoIterator<Item = InterfaceType>,
        S: Into<String>,
    {
        EndpointFilters {
            interfaces: interfaces.into_iter().collect(),
            region: Some(region.into()),
        }
    }

    /// Fill the unset fields from the provided defaults.
    pub(crate) fn with_defaults(&self, defaults: &EndpointFilters) -> EndpointFilters {
        EndpointFilters {
            interfaces: if self.interfaces == ValidInterfaces::default() {
                defaults.interfaces
            } else {
                self.interfaces
            },
            region: self.region.clone().or_else(|| defaults.region.clone()),
        }
    }

    /// Whether the filters match the provided endpoint.
    pub fn check(&self, endpoint: &Endpoint) -> bool {
        if !self.interfaces.check(endpoint) {
            return false;
        }

        if let Some(ref region) = self.region {
            endpoint.region == *region
        } else {
            true
        }
    }

    /// Set one or more valid interfaces.
    ///
    /// Accepts a single `InterfaceType` as well because of the generic argument.
    #[inline]
    pub fn set_interfaces<T: Into<ValidInterfaces>>(&mut self, value: T) {
        self.interfaces = value.into();
    }

    /// Set region.
    #[inline]
    pub fn set_region<T: Into<String>>(&mut self, value: T) {
        self.region = Some(value.into());
    }

    /// Add one or more valid interfaces.
    #[inline]
    pub fn with_interfaces<T: Into<ValidInterfaces>>(mut self, value: T) -> Self {
        self.set_interfaces(value);
        self
    }

    /// Add a region.
    #[inline]
    pub fn with_region<T: Into<String>>(mut self, value: T) -> Self {
        self.set_region(value);
        self
    }
}

#[cfg(test)]
pub mod test {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::{EndpointFilters, InterfaceType, ValidInterfaces};
    use crate::identity::protocol::Endpoint;
    use InterfaceType::*;

    fn endpoint(interface: &str, region: &str) -> Endpoint {
        Endpoint {
            interface: interface.into(),
            region: region.into(),
            url: "https://cloud.local/".parse().unwrap(),
        }
    }

    #[test]
    fn test_valid_interfaces_size() {
        assert_eq!(std::mem::size_of::<ValidInterfaces>(), 4);
    }

    #[test]
    fn test_valid_interfaces_default() {
        let default = ValidInterfaces::default();
        assert_eq!(default.len(), 1);
        assert_eq!(*default, [Public]);
        assert!(default.contains(&Public));
        assert!(!default.contains(&Internal));
        assert_eq!("ValidInterfaces [Public]", format!("{:?}", default).as_str());
    }

    #[test]
    fn test_valid_interfaces_one() {
        let one = ValidInterfaces::one(Internal);
        assert_eq!(one.len(), 1);
        assert_eq!(*one, [Internal]);
        assert!(!one.contains(&Public));
    }

    #[test]
    fn test_valid_interfaces_push() {
        let mut vi = ValidInterfaces::default();
        assert!(!vi.push(Public));
        assert_eq!(vi.len(), 1);
        assert!(vi.push(Admin));
        assert!(!vi.push(Public));
        assert_eq!(vi.len(), 2);
        assert!(vi.push(Internal));
        assert_eq!(*vi, [Public, Admin, Internal]);
    }

    fn get_hash(value: &ValidInterfaces) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_valid_interfaces_cmp() {
        let mut vi1 = ValidInterfaces::default();
        let mut vi2 = ValidInterfaces::default();
        assert_eq!(vi1, vi2);
        assert_eq!(get_hash(&vi1), get_hash(&vi2));
        assert!(vi2.push(Internal));
        assert!(vi1 != vi2);
        assert!(get_hash(&vi1) != get_hash(&vi2));
        assert!(vi1.push(Internal));
        assert_eq!(vi1, vi2);
        assert_eq!(get_hash(&vi1), get_hash(&vi2));
    }

    #[test]
    fn test_valid_interfaces_from_vec_dedup() {
        let vi: ValidInterfaces = vec![Public, Internal, Public, Public, Admin, Internal].into();
        assert_eq!(*vi, [Public, Internal, Admin]);
    }

    #[test]
    fn test_filters_check_interface() {
        let filters = EndpointFilters::default().with_interfaces(Internal);
        assert!(filters.check(&endpoint("internal", "RegionOne")));
        assert!(!filters.check(&endpoint("public", "RegionOne")));
    }

    #[test]
    fn test_filters_check_region() {
        let filters = EndpointFilters::default().with_region("RegionTwo");
        assert!(filters.check(&endpoint("public", "RegionTwo")));
        assert!(!filters.check(&endpoint("public", "RegionOne")));
        assert!(!filters.check(&endpoint("internal", "RegionTwo")));
    }

    #[test]
    fn test_filters_legacy_interface_names() {
        let filters = EndpointFilters::default();
        assert!(filters.check(&endpoint("publicURL", "RegionOne")));
    }
}
