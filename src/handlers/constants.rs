use std::time::Duration;

/// 未指定有效期时的默认预签名有效期（10分钟）
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// 允许的最长预签名有效期（7天）
pub const MAX_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// 请求中的有效期（秒），未指定时使用默认值，超过上限时截断
pub fn ttl_from_secs(expires_in: Option<u64>) -> Duration {
    expires_in
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .map_or(DEFAULT_TTL, |ttl| ttl.min(MAX_TTL))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试有效期的默认值与上限
    #[test]
    fn test_ttl_from_secs() {
        assert_eq!(ttl_from_secs(None), DEFAULT_TTL);
        assert_eq!(ttl_from_secs(Some(0)), DEFAULT_TTL);
        assert_eq!(ttl_from_secs(Some(60)), Duration::from_secs(60));
        assert_eq!(ttl_from_secs(Some(u64::MAX)), MAX_TTL);
    }
}
