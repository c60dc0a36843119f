/*!
 * Tests for the result cache
 */

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use promptbridge::cache::{ResultCache, TtlCache};
use promptbridge::errors::ConfigError;
use promptbridge::pipeline::ValidationResult;

fn result(text: &str) -> ValidationResult {
    ValidationResult {
        original_text: text.to_string(),
        validated_text: text.to_string(),
        issues: Vec::new(),
        metrics: BTreeMap::new(),
        suggestions: Vec::new(),
    }
}

#[test]
fn test_resultCache_setThenGet_shouldReturnStoredResult() {
    let cache = ResultCache::with_ttl_secs(10, 60).unwrap();
    cache.set("key", result("hello"));

    assert_eq!(cache.get("key"), Some(result("hello")));
    assert_eq!(cache.get("other"), None);

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[test]
fn test_resultCache_new_withInvalidBounds_shouldFail() {
    assert!(matches!(
        ResultCache::new(0, Duration::from_secs(60)),
        Err(ConfigError::InvalidCacheSize(0))
    ));
    assert!(matches!(
        ResultCache::new(10, Duration::ZERO),
        Err(ConfigError::InvalidTtl)
    ));
}

#[test]
fn test_resultCache_get_afterTtl_shouldMiss() {
    let cache = ResultCache::new(10, Duration::from_millis(40)).unwrap();
    cache.set("key", result("hello"));

    thread::sleep(Duration::from_millis(100));

    assert_eq!(cache.get("key"), None);
    assert!(cache.is_empty());
    assert_eq!(cache.stats().expirations, 1);
}

#[test]
fn test_resultCache_set_beyondCapacity_shouldEvictInInsertionOrder() {
    let cache = ResultCache::with_ttl_secs(2, 60).unwrap();

    cache.set("first", result("1"));
    cache.set("second", result("2"));
    cache.set("third", result("3"));
    cache.set("fourth", result("4"));

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("first"), None);
    assert_eq!(cache.get("second"), None);
    assert_eq!(cache.get("third"), Some(result("3")));
    assert_eq!(cache.get("fourth"), Some(result("4")));
    assert_eq!(cache.stats().evictions, 2);
}

#[test]
fn test_ttlCache_concurrentSets_shouldNeverExceedCapacity() {
    let cache = Arc::new(TtlCache::<usize>::with_ttl_secs(8, 60).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..100 {
                    cache.set(&format!("{}-{}", worker, i), i);
                    assert!(cache.len() <= 8);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 8);
    assert_eq!(cache.stats().evictions, 8 * 100 - 8);
}

#[test]
fn test_ttlCache_concurrentGetAndSet_shouldStayConsistent() {
    let cache = Arc::new(TtlCache::<String>::with_ttl_secs(4, 60).unwrap());
    cache.set("shared", "value".to_string());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..50 {
                    if let Some(value) = cache.get("shared") {
                        assert_eq!(value, "value");
                    }
                    cache.set("shared", "value".to_string());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().evictions, 0);
}
