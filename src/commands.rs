//! # Commands Module / 命令模块

pub mod init;
pub mod run;
