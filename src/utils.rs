//! 工具函数模块
//!
//! 此模块包含了项目中使用的各种工具函数：
//! - 对象路径处理工具（规范化、拼接、扩展名获取）
//! - 上传请求头构建工具
//! - 可注入的时钟与唯一标识来源

pub mod clock;
pub mod headers;
pub mod path;
