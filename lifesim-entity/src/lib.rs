pub mod event;
pub mod npc;
pub mod player;
pub mod prelude;
pub mod world_flag;

pub use event::Entity as Event;
pub use npc::Entity as Npc;
pub use player::Entity as Player;
pub use world_flag::Entity as WorldFlag;
