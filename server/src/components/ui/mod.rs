pub mod avatar;
pub mod flash;
pub mod heading;
