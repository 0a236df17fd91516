//! 错误处理模块
//! Error handling module
//!
//! 定义了 asynqmon 中使用的错误类型
//! Defines the error types used in asynqmon

use thiserror::Error;

/// asynqmon 的结果类型
/// Result type for asynqmon
pub type Result<T> = std::result::Result<T, Error>;

/// asynqmon 错误类型
/// asynqmon error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// 队列不存在
  /// Queue does not exist
  #[error("Queue '{queue}' does not exist")]
  QueueNotFound { queue: String },

  /// 无效的任务状态
  /// Invalid task state
  #[error("Invalid task state: {state}")]
  InvalidTaskState { state: String },

  /// 配置错误
  /// Configuration error
  #[error("Configuration error: {message}")]
  Config { message: String },

  /// Broker 错误
  /// Broker error
  #[error("Broker error: {0}")]
  Broker(String),

  /// 其他错误
  /// Other error
  #[error("Other error: {message}")]
  Other { message: String },
}

impl Error {
  /// 创建队列不存在错误
  /// Create a queue-not-found error
  pub fn queue_not_found<S: Into<String>>(queue: S) -> Self {
    Self::QueueNotFound {
      queue: queue.into(),
    }
  }

  /// 创建配置错误
  /// Create a configuration error
  pub fn config<S: Into<String>>(message: S) -> Self {
    Self::Config {
      message: message.into(),
    }
  }

  /// 创建 Broker 错误
  /// Create a broker error
  pub fn broker<S: Into<String>>(message: S) -> Self {
    Self::Broker(message.into())
  }

  /// 创建其他错误
  /// Create an other error
  pub fn other<S: Into<String>>(message: S) -> Self {
    Self::Other {
      message: message.into(),
    }
  }
}
