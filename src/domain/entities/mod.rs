//! Domain entities - Core business objects with no external dependencies

pub mod descriptor;
pub mod message;
pub mod options;
pub mod payload;
pub mod user;

pub use descriptor::{Color, CommandDescriptor, Permission};
pub use message::{AutocompleteChoice, AutocompleteRequest, InboundEvent, Interaction, Message};
pub use options::{OptionKind, OptionSpec, OptionValue, ResolvedOptions};
pub use payload::{
    ActionRow, Addition, Attachment, Button, Embed, EmbedField, Footer, Payload, ResponseContent,
    SentMessage,
};
pub use user::{Channel, Guild, Member, Role, User};
