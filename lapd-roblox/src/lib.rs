pub mod client;
pub mod model;

pub use client::RobloxClient;
pub use model::RobloxUser;
