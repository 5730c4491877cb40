use std::fmt;

#[derive(Debug, Clone)]
pub enum ShortfrontError {
    FileOperation(String),
    Serialization(String),
}

impl ShortfrontError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortfrontError::FileOperation(_) => "E001",
            ShortfrontError::Serialization(_) => "E002",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortfrontError::FileOperation(_) => "File Operation Error",
            ShortfrontError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortfrontError::FileOperation(msg) => msg,
            ShortfrontError::Serialization(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortfrontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortfrontError {}

// 便捷的构造函数
impl ShortfrontError {
    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShortfrontError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortfrontError::Serialization(msg.into())
    }
}

impl From<std::io::Error> for ShortfrontError {
    fn from(err: std::io::Error) -> Self {
        ShortfrontError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ShortfrontError {
    fn from(err: serde_json::Error) -> Self {
        ShortfrontError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortfrontError>;
