use serde::Deserialize;

use crate::directory::Directory;
use crate::session::Session;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub session: Session,
    pub dir: Directory,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            session: Session::default(),
            dir: crate::seed::directory()?,
        })
    }
}
