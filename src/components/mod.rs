pub mod mobile;
pub mod nav;
pub mod status_bar;
pub mod tree;
