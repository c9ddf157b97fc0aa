pub use super::event::Entity as Event;
pub use super::npc::Entity as Npc;
pub use super::player::Entity as Player;
pub use super::world_flag::Entity as WorldFlag;
