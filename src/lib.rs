pub mod adapters;
pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod html;
pub mod page;
pub mod ports;
mod templates;

pub use board::{ActivityBoard, RemovalOutcome, RenderOutcome, SignupOutcome};
pub use catalog::{Activity, Catalog};
pub use config::BoardConfig;
pub use error::ApiError;
pub use page::Page;

use adapters::{HttpActivitiesApi, TerminalDialogs, TokioTimeProvider};

/// Board wired to the HTTP backend, terminal prompts and tokio timers.
pub type TerminalBoard = ActivityBoard<HttpActivitiesApi, TerminalDialogs, TokioTimeProvider>;

pub fn terminal_board(config: BoardConfig, assume_yes: bool) -> Result<TerminalBoard, ApiError> {
    let api = HttpActivitiesApi::new(config.base_url.clone())?;
    Ok(ActivityBoard::new(
        api,
        TerminalDialogs { assume_yes },
        TokioTimeProvider,
        config,
    ))
}
