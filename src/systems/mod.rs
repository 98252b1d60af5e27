mod draw_list;
mod expiration;
mod lifetime;
mod movement;
mod spawner;

pub use draw_list::{DrawItem, DrawListSystem};
pub use expiration::ExpirationSystem;
pub use lifetime::LifetimeSystem;
pub use movement::MovementSystem;
pub use spawner::SpawnerSystem;
