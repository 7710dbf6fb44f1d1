#![deny(warnings)]
pub mod meld;
pub mod model;
pub mod win;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "rummy13"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
