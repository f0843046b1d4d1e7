pub mod desktops;
pub mod monitors;
pub mod processes;
pub mod rect;
pub mod windows;
