//! Concrete provider mechanisms.

mod apt;
mod brew;
mod env;
mod npm;
mod pip;
mod playwright;
mod puppeteer;

pub use apt::AptProvider;
pub use brew::BrewProvider;
pub use env::EnvProvider;
pub use npm::{NpmFlavor, NpmProvider};
pub use pip::{PipFlavor, PipProvider};
pub use playwright::PlaywrightProvider;
pub use puppeteer::PuppeteerProvider;
