/// Cache-aside helper for Redis-backed lookups.
///
/// Checks the cache for `$key` first and returns the hit when present. A
/// cache read failure is logged and treated as a miss so that a Redis
/// outage never takes the underlying data source down with it. On a miss
/// the macro runs `$block` to compute the value, schedules a background
/// cache write with the given TTL, and returns the computed value.
///
/// The expansion is a plain `Result` expression with no early return, so
/// callers decide whether a miss-path failure propagates or is handled.
///
/// # Arguments
/// * `$cache`: a [`crate::db::Cache`] (anything with `get_from_cache` and
///   `set_in_background`).
/// * `$key`: the [`crate::db::CacheKey`] to look up and store under.
/// * `$ttl`: time-to-live for the cached value, in seconds.
/// * `$block`: async block computing the value on a miss.
///
/// # Example
/// ```ignore
/// let snapshot = cached!(cache, CacheKey::Catalog(locale), CATALOG_TTL, async move {
///     provider.fetch_catalog(&locale).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let hit = match $cache.get_from_cache(&$key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, key = %$key, "Cache read failed, treating as miss");
                None
            }
        };

        match hit {
            Some(value) => {
                tracing::debug!(key = %$key, "Cache hit");
                Ok(value)
            }
            None => {
                tracing::debug!(key = %$key, "Cache miss");
                match $block.await {
                    Ok(value) => {
                        $cache.set_in_background(&$key, &value, $ttl);
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
}
