//! 时钟与唯一标识来源
//!
//! 路径生成和 CDN 签名都依赖当前时间与随机标识，
//! 通过 trait 注入以便测试时固定取值。

use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(test)]
use mockall::automock;

/// 时间来源
#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync {
    /// 当前 Unix 时间戳（秒）
    fn unix_seconds(&self) -> i64;

    /// 当前 Unix 时间戳（纳秒）
    fn unix_nanos(&self) -> i128;
}

/// 读取系统时间的默认时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_secs() as i64,
            Err(before) => -(before.duration().as_secs() as i64),
        }
    }

    fn unix_nanos(&self) -> i128 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_nanos() as i128,
            Err(before) => -(before.duration().as_nanos() as i128),
        }
    }
}

/// 唯一标识来源
#[cfg_attr(test, automock)]
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// 基于 UUID v4 的唯一标识
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
