pub mod assets;
pub mod task;
pub mod verify;
