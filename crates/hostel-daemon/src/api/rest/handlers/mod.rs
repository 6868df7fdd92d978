//! API request handlers

mod events;
mod floors;
mod health;
mod hostels;
mod rooms;
mod students;
mod webhook;

pub use events::*;
pub use floors::*;
pub use health::*;
pub use hostels::*;
pub use rooms::*;
pub use students::*;
pub use webhook::*;
