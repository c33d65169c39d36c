//! Key layout of the data kept in the key-value store.
//!
//! | Key               | Type       | Content                      |
//! |-------------------|------------|------------------------------|
//! | `url:{code}`      | string     | original URL                 |
//! | `meta:{code}`     | hash       | `created_at`, `ttl_sec`      |
//! | `clicks:{code}`   | string     | click counter                |
//! | `links:popular`   | sorted set | `code -> clicks`             |
//! | `user:{username}` | hash       | `password_hash`              |

/// Sorted set ranking codes by click count.
pub const POPULAR_LINKS: &str = "links:popular";

/// Hash field holding an account's password hash.
pub const PASSWORD_HASH_FIELD: &str = "password_hash";

pub fn url_key(code: &str) -> String {
    format!("url:{}", code)
}

pub fn meta_key(code: &str) -> String {
    format!("meta:{}", code)
}

pub fn clicks_key(code: &str) -> String {
    format!("clicks:{}", code)
}

pub fn user_key(username: &str) -> String {
    format!("user:{}", username)
}
