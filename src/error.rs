use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid panel config: {0}")]
    InvalidConfig(String),

    #[error("renderer failure: {0}")]
    Renderer(String),

    #[error("panel config is not valid json: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
