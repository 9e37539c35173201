//! 仓储层错误类型
//!
//! 把 sqlx 的错误归类为有限的几种情况，供上层通过模式匹配决定响应，
//! 上层不需要了解具体驱动的错误细节。

use thiserror::Error;

/// 存储错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// 变更操作的目标记录不存在
    #[error("记录未找到")]
    NotFound,

    #[error("唯一约束冲突: {0}")]
    UniqueViolation(String),

    /// 输入数据的形状或取值无法映射到存储（类型、长度、编码等）
    #[error("存储输入无效: {0}")]
    InvalidInput(String),

    /// 其他由数据库拒绝的语句（外键、检查约束等）
    #[error("数据库语句执行失败: {0}")]
    Query(String),

    /// 连接池、网络或协议层面的故障
    #[error("存储不可用: {0}")]
    Unavailable(String),
}

/// 仓储层 Result 类型别名
pub type Result<T> = std::result::Result<T, StoreError>;

/// PostgreSQL 数据异常类（22xxx），如字符串超长、非法文本表示
const PG_DATA_EXCEPTION_CLASS: &str = "22";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db) => {
                if db.is_unique_violation() {
                    return Self::UniqueViolation(db.message().to_string());
                }
                let is_data_exception = db
                    .code()
                    .is_some_and(|code| code.starts_with(PG_DATA_EXCEPTION_CLASS));
                if is_data_exception {
                    Self::InvalidInput(db.message().to_string())
                } else {
                    Self::Query(db.message().to_string())
                }
            }
            e @ (sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::Encode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. }) => Self::InvalidInput(e.to_string()),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
