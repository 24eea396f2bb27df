mod assets;
mod gate;
mod navigation;
mod render;
