//! # Formatter Module / 格式化模块
//!
//! Pure string decoration driven by [`FormatOptions`].
//!
//! 由 [`FormatOptions`] 驱动的纯字符串装饰。

use crate::core::config::FormatOptions;

#[derive(Debug, Clone)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn error(&self, text: &str) -> String {
        format!("{}{}{}", self.options.error_prefix, text, self.options.error_suffix)
    }

    pub fn ok(&self, text: &str) -> String {
        format!("{}{}{}", self.options.ok_prefix, text, self.options.ok_suffix)
    }

    pub fn bold(&self, text: &str) -> String {
        format!("{}{}{}", self.options.bold_prefix, text, self.options.bold_suffix)
    }

    pub fn assertion_message(&self, text: &str) -> String {
        format!(
            "{}{}{}",
            self.options.assertion_prefix, text, self.options.assertion_suffix
        )
    }
}
