pub mod api_client;
pub mod configuration;
pub mod dispatcher;
pub mod extractor;
pub mod foundation;
pub mod messaging;
pub mod models;
pub mod panel;
pub mod startup;

#[cfg(test)]
mod test_support;

pub use api_client::{HttpLyricsApi, LyricsApi};
pub use configuration::*;
pub use dispatcher::Dispatcher;
pub use extractor::{ExtractorChain, Page, PageExtractor};
pub use messaging::{Envelope, Message};
pub use models::*;
pub use panel::PanelController;
