//! Conversions between coven ids and Serenity ids.

use serenity::all::{EmojiId, ReactionType};

/// Convert a coven id into its Serenity counterpart.
pub trait ToSerenity {
    /// Serenity id type
    type Id;
    /// Perform the conversion.
    fn to_serenity(self) -> Self::Id;
}

/// Convert a Serenity id into its coven counterpart.
pub trait ToCoven {
    /// Coven id type
    type Id;
    /// Perform the conversion.
    fn to_coven(self) -> Self::Id;
}

macro_rules! id_conversions {
    ($($name:ident),* $(,)?) => {
        $(
            impl ToSerenity for coven_core::$name {
                type Id = serenity::all::$name;

                fn to_serenity(self) -> Self::Id {
                    serenity::all::$name::new(self.get())
                }
            }

            impl ToCoven for serenity::all::$name {
                type Id = coven_core::$name;

                fn to_coven(self) -> Self::Id {
                    coven_core::$name(self.get())
                }
            }
        )*
    };
}

id_conversions!(GuildId, UserId, ChannelId, MessageId, RoleId);

/// Rebuild a reaction from a stored emoji key.
///
/// Numeric keys are custom emoji ids, anything else is a unicode emoji.
pub fn reaction_for_key(key: &str) -> ReactionType {
    match key.parse::<u64>() {
        Ok(id) if id > 0 => ReactionType::Custom {
            animated: false,
            id: EmojiId::new(id),
            name: None,
        },
        _ => ReactionType::Unicode(key.to_string()),
    }
}
