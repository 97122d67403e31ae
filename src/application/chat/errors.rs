use crate::infrastructure::model::ModelError;
use crate::infrastructure::storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ChatError {
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Model(err) => err.user_message(),
            ChatError::Store(_) => "读取项目数据失败，请稍后重试。".to_string(),
        }
    }
}
