pub mod preview;
pub mod timeline;
pub mod trim_bar;
