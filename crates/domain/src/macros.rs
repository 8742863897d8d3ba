//! Macro for implementing Display, FromStr and `as_str` for wire enums
//!
//! Meeting payloads carry several small lowercase string enums (bot status,
//! reconciliation status, relevance policy). This macro keeps their string
//! forms in one place and provides case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use mia_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum RoomState {
//!     Lobby,
//!     InCall,
//!     Ended,
//! }
//!
//! impl_domain_status_conversions!(RoomState {
//!     Lobby => "lobby",
//!     InCall => "in_call",
//!     Ended => "ended",
//! });
//!
//! assert_eq!(RoomState::InCall.as_str(), "in_call");
//! assert_eq!("ENDED".parse::<RoomState>(), Ok(RoomState::Ended));
//! ```

/// Implements `Display`, `FromStr` and a `const fn as_str` for string enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase wire
///   representations
///
/// Parsing lowercases its input first, so `"JOINED"` and `"joined"` map to
/// the same variant.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of this variant.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
