/// 生成带命名空间前缀的令牌键
pub fn token_key(prefix: &str, uid: &str) -> String {
    format!("{}{}", prefix, uid)
}

/// 匹配命名空间下所有键的模式，前缀中的通配符按字面匹配
pub fn pattern_for(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

/// 去掉命名空间前缀，还原为用户标识
pub fn strip_prefix<'a>(prefix: &str, key: &'a str) -> Option<&'a str> {
    key.strip_prefix(prefix)
}
