pub mod animation;
pub mod assets;
pub mod background;
pub mod core;
pub mod input;
pub mod loading;
pub mod materials;
#[cfg(test)]
mod noise;
pub mod scene;
pub mod systems;
