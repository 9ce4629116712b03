use crate::editable::BoxId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No box with id {0}")]
    UnknownBox(BoxId),
}
