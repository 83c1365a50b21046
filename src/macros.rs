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

//! Macros for defining protocol structures.

/// A macro for defining serializable and deserializable protocol enums.
///
/// `Clone`, `Copy`, `Debug`, `Serialize`/`Deserialize` and equality traits are
/// automatically derived.
///
/// The easiest variant assumes that the carrier type is a string:
///
/// ```rust
/// oscloud::protocol_enum! {
///     #[doc = "Possible volume statuses."]
///     enum VolumeStatus {
///         Creating = "creating",
///         Available = "available",
///         InUse = "in-use",
///         Deleting = "deleting",
///         Error = "error"
///     }
/// }
/// ```
///
/// The second variant assumes a non-string carrier type, which must be (de-)serializable:
///
/// ```rust
/// oscloud::protocol_enum! {
///     #[doc = "IP protocol version of a subnet."]
///     enum IpVersion: u8 {
///         V4 = 4,
///         V6 = 6
///     }
/// }
/// ```
///
/// These two variants produce a failure when an unknown value is deserialized. If you expect
/// the underlying enumeration to be extended in the future, provide a default value:
///
/// ```rust
/// oscloud::protocol_enum! {
///     #[doc = "Possible network statuses."]
///     #[non_exhaustive]
///     enum NetworkStatus = Unknown {
///         Active = "ACTIVE",
///         Down = "DOWN",
///         Building = "BUILD",
///         Error = "ERROR",
///         Unknown = "UNKNOWN"
///     }
/// }
///
/// oscloud::protocol_enum! {
///     #[doc = "Power state of a server."]
///     #[non_exhaustive]
///     enum ServerPowerState: u8 = NoState {
///         NoState = 0,
///         Running = 1,
///         Paused = 3,
///         Shutdown = 4,
///         Crashed = 6,
///         Suspended = 7
///     }
/// }
/// ```
#[macro_export]
macro_rules! protocol_enum {
    {$(#[$attr:meta])* enum $name:ident: $carrier:ty {
        $($(#[$iattr:meta])* $item:ident = $val:expr),+
    }} => (
        $crate::protocol_enum! {
            $(#[$attr])*
            __private $name: $carrier {
                $($(#[$iattr])* $item = $val),+
            }
        }

        impl<'de> ::serde::de::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
                    where D: ::serde::de::Deserializer<'de> {
                let value: $carrier = ::serde::de::Deserialize::deserialize(deserializer)?;
                match value {
                    $($val => Ok($name::$item)),+,
                    other => {
                        use ::serde::de::Error;
                        let err = format!("Unexpected {}: {}", stringify!($name), other);
                        Err(D::Error::custom(err))
                    }
                }
            }
        }

        impl ::serde::ser::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
                    where S: ::serde::ser::Serializer {
                <$carrier>::from(*self).serialize(serializer)
            }
        }
    );

    {$(#[$attr:meta])* enum $name:ident: $carrier:ty = $default:ident {
        $($(#[$iattr:meta])* $item:ident = $val:expr),+
    }} => (
        $crate::protocol_enum! {
            $(#[$attr])*
            __private $name: $carrier {
                $($(#[$iattr])* $item = $val),+
            }
        }

        impl Default for $name {
            fn default() -> $name {
                $name::$default
            }
        }

        impl<'de> ::serde::de::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
                    where D: ::serde::de::Deserializer<'de> {
                let value: $carrier = ::serde::de::Deserialize::deserialize(deserializer)?;
                Ok(match value {
                    $($val => $name::$item),+,
                    _ => Default::default()
                })
            }
        }

        impl ::serde::ser::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
                    where S: ::serde::ser::Serializer {
                <$carrier>::from(*self).serialize(serializer)
            }
        }
    );

    {$(#[$attr:meta])* enum $name:ident {
        $($(#[$iattr:meta])* $item:ident = $val:expr),+
    }} => (
        $crate::protocol_enum! {
            $(#[$attr])*
            __private $name: String {
                $($(#[$iattr])* $item = $val),+
            }
        }

        impl<'de> ::serde::de::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
                    where D: ::serde::de::Deserializer<'de> {
                match String::deserialize(deserializer)?.as_ref() {
                    $($val => Ok($name::$item)),+,
                    other => {
                        use ::serde::de::Error;
                        let err = format!("Unexpected {}: {}",
                                          stringify!($name), other);
                        Err(D::Error::custom(err))
                    }
                }
            }
        }

        impl ::serde::ser::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
                    where S: ::serde::ser::Serializer {
                serializer.serialize_str(
                    match *self {
                        $($name::$item => $val),+,
                    }
                )
            }
        }
    );

    {$(#[$attr:meta])* enum $name:ident = $default:ident {
        $($(#[$iattr:meta])* $item:ident = $val:expr),+
    }} => (
        $crate::protocol_enum! {
            $(#[$attr])*
            __private $name: String {
                $($(#[$iattr])* $item = $val),+
            }
        }

        impl Default for $name {
            fn default() -> $name {
                $name::$default
            }
        }

        impl<'de> ::serde::de::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
                    where D: ::serde::de::Deserializer<'de> {
                Ok(match String::deserialize(deserializer)?.as_ref() {
                    $($val => $name::$item),+,
                    _ => Default::default()
                })
            }
        }

        impl ::serde::ser::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
                    where S: ::serde::ser::Serializer {
                serializer.serialize_str(
                    match *self {
                        $($name::$item => $val),+,
                    }
                )
            }
        }
    );

    {$(#[$attr:meta])* __private $name:ident: $carrier:ty {
        $($(#[$iattr:meta])* $item:ident = $val:expr),+
    }} => (
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub enum $name {
            $($(#[$iattr])* $item),+,
        }

        impl From<$name> for $carrier {
            /// Converts the enum to the carrier value.
            fn from(value: $name) -> $carrier {
                match value {
                    $($name::$item => $val.into()),+,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            /// Displays the underlying protocol value.
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                <$carrier>::from(*self).fmt(f)
            }
        }
    );
}

#[cfg(test)]
pub mod test {
    protocol_enum! {
        enum VolumeStatus {
            Creating = "creating",
            Available = "available",
            InUse = "in-use",
            Deleting = "deleting",
            Error = "error"
        }
    }

    #[test]
    fn test_string() {
        assert_eq!("in-use", &String::from(VolumeStatus::InUse));
        assert_eq!("in-use", VolumeStatus::InUse.to_string());
        assert_eq!(
            VolumeStatus::Available,
            serde_json::from_str("\"available\"").unwrap()
        );
        assert_eq!(
            "\"available\"",
            serde_json::to_string(&VolumeStatus::Available).unwrap()
        );
        assert!(serde_json::from_str::<VolumeStatus>("\"banana\"").is_err());
        assert!(serde_json::from_str::<VolumeStatus>("42").is_err());
        assert!(!(VolumeStatus::Creating == VolumeStatus::Available));
    }

    protocol_enum! {
        enum IpVersion: u8 {
            V4 = 4,
            V6 = 6
        }
    }

    #[test]
    fn test_carrier() {
        assert_eq!(4, u8::from(IpVersion::V4));
        assert_eq!("6", IpVersion::V6.to_string());
        assert_eq!(IpVersion::V4, serde_json::from_str("4").unwrap());
        assert_eq!("6", serde_json::to_string(&IpVersion::V6).unwrap());
        assert!(serde_json::from_str::<IpVersion>("5").is_err());
        assert!(serde_json::from_str::<IpVersion>("\"four\"").is_err());
    }

    protocol_enum! {
        #[non_exhaustive]
        enum NetworkStatus = Unknown {
            Active = "ACTIVE",
            Down = "DOWN",
            Building = "BUILD",
            Error = "ERROR",
            Unknown = "UNKNOWN"
        }
    }

    #[test]
    fn test_string_with_default() {
        assert_eq!("ACTIVE", &String::from(NetworkStatus::Active));
        assert_eq!(
            NetworkStatus::Down,
            serde_json::from_str("\"DOWN\"").unwrap()
        );
        assert_eq!(NetworkStatus::Unknown, NetworkStatus::default());
        assert_eq!(
            NetworkStatus::Unknown,
            serde_json::from_str("\"banana\"").unwrap()
        );
        assert!(serde_json::from_str::<NetworkStatus>("42").is_err());
    }

    protocol_enum! {
        #[non_exhaustive]
        enum ServerPowerState: u8 = NoState {
            NoState = 0,
            Running = 1,
            Paused = 3,
            Shutdown = 4,
            Crashed = 6,
            Suspended = 7
        }
    }

    #[test]
    fn test_carrier_with_default() {
        assert_eq!(1, u8::from(ServerPowerState::Running));
        assert_eq!(
            ServerPowerState::Running,
            serde_json::from_str("1").unwrap()
        );
        assert_eq!(ServerPowerState::NoState, ServerPowerState::default());
        assert_eq!(ServerPowerState::NoState, serde_json::from_str("42").unwrap());
        assert!(serde_json::from_str::<ServerPowerState>("\"banana\"").is_err());
    }
}
