pub mod layout;
pub mod pages;
pub mod profile;
pub mod ui;
