//! Snowflake identifiers.
//!
//! Discord ids are unsigned 64-bit integers. PostgreSQL has no unsigned
//! type, so the database stores the same bits in a `BIGINT`; `as_i64` and
//! `from_i64` convert without loss in both directions.

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            derive_more::Display,
            derive_more::From,
        )]
        #[display("{}", _0)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw id value.
            pub fn get(self) -> u64 {
                self.0
            }

            /// Bit-preserving conversion for `BIGINT` columns.
            pub fn as_i64(self) -> i64 {
                self.0 as i64
            }

            /// Inverse of [`Self::as_i64`].
            pub fn from_i64(value: i64) -> Self {
                Self(value as u64)
            }
        }
    };
}

snowflake!(
    /// A Discord user.
    UserId
);
snowflake!(
    /// A Discord guild (server).
    GuildId
);
snowflake!(
    /// A guild role.
    RoleId
);
snowflake!(
    /// A text channel.
    ChannelId
);
snowflake!(
    /// A message.
    MessageId
);
