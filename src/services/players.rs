use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::PlayerRecord;

/// A roster player resolved against the bulk player directory
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlayer {
    pub name: String,
    pub position: String,
    /// Current NFL team abbreviation; `None` for unrostered or inactive
    /// players, which cannot be matched to a game
    pub team: Option<String>,
}

/// Resolves a player id to display name, position, and team.
///
/// Name preference: "first last", then the full-name field, then the raw
/// id. Position defaults to "N/A". Empty strings are treated as absent.
pub fn resolve_player(player_id: &str, directory: &HashMap<String, PlayerRecord>) -> ResolvedPlayer {
    let Some(record) = directory.get(player_id) else {
        return ResolvedPlayer {
            name: player_id.to_string(),
            position: "N/A".to_string(),
            team: None,
        };
    };

    let name = match (non_empty(&record.first_name), non_empty(&record.last_name)) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        _ => non_empty(&record.full_name)
            .map(str::to_string)
            .unwrap_or_else(|| player_id.to_string()),
    };

    ResolvedPlayer {
        name,
        position: non_empty(&record.position)
            .unwrap_or("N/A")
            .to_string(),
        team: non_empty(&record.team).map(str::to_string),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

struct CacheEntry {
    players: Arc<HashMap<String, PlayerRecord>>,
    fetched_at: Instant,
}

/// Process-wide cache for Sleeper's bulk player directory.
///
/// The directory is a multi-megabyte payload shared across all leagues, so
/// it is fetched at most once per TTL window. Reads never touch the network
/// while an entry is fresh. Callers pass "now" explicitly so tests can
/// freeze time. Two concurrent refreshes are tolerated: the last store
/// wins, which only wastes an upstream call.
pub struct PlayerCache {
    entry: RwLock<Option<CacheEntry>>,
    ttl: Duration,
}

impl PlayerCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    /// Returns the cached directory if its age is below the TTL.
    pub async fn get(&self, now: Instant) -> Option<Arc<HashMap<String, PlayerRecord>>> {
        let guard = self.entry.read().await;
        guard.as_ref().and_then(|entry| {
            let age = now.saturating_duration_since(entry.fetched_at);
            (age < self.ttl).then(|| entry.players.clone())
        })
    }

    /// Replaces the cached directory.
    pub async fn store(&self, players: Arc<HashMap<String, PlayerRecord>>, now: Instant) {
        let mut guard = self.entry.write().await;
        *guard = Some(CacheEntry {
            players,
            fetched_at: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        first: Option<&str>,
        last: Option<&str>,
        full: Option<&str>,
        position: Option<&str>,
        team: Option<&str>,
    ) -> PlayerRecord {
        PlayerRecord {
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            full_name: full.map(str::to_string),
            position: position.map(str::to_string),
            team: team.map(str::to_string),
            status: None,
        }
    }

    #[test]
    fn test_resolve_prefers_first_and_last_name() {
        let mut directory = HashMap::new();
        directory.insert(
            "4034".to_string(),
            record(
                Some("Patrick"),
                Some("Mahomes"),
                Some("P. Mahomes"),
                Some("QB"),
                Some("KC"),
            ),
        );

        let resolved = resolve_player("4034", &directory);
        assert_eq!(resolved.name, "Patrick Mahomes");
        assert_eq!(resolved.position, "QB");
        assert_eq!(resolved.team.as_deref(), Some("KC"));
    }

    #[test]
    fn test_resolve_falls_back_to_full_name() {
        let mut directory = HashMap::new();
        directory.insert(
            "9999".to_string(),
            record(None, Some("Kelce"), Some("Travis Kelce"), Some("TE"), Some("KC")),
        );

        let resolved = resolve_player("9999", &directory);
        assert_eq!(resolved.name, "Travis Kelce");
    }

    #[test]
    fn test_resolve_falls_back_to_player_id() {
        let mut directory = HashMap::new();
        directory.insert("1111".to_string(), record(None, None, None, None, None));

        let resolved = resolve_player("1111", &directory);
        assert_eq!(resolved.name, "1111");
        assert_eq!(resolved.position, "N/A");
        assert_eq!(resolved.team, None);
    }

    #[test]
    fn test_resolve_treats_empty_strings_as_absent() {
        let mut directory = HashMap::new();
        directory.insert(
            "2222".to_string(),
            record(Some(""), Some("Hill"), Some("Tyreek Hill"), Some(""), Some("")),
        );

        let resolved = resolve_player("2222", &directory);
        assert_eq!(resolved.name, "Tyreek Hill");
        assert_eq!(resolved.position, "N/A");
        assert_eq!(resolved.team, None);
    }

    #[test]
    fn test_resolve_unknown_player_id() {
        let directory = HashMap::new();
        let resolved = resolve_player("0000", &directory);
        assert_eq!(resolved.name, "0000");
        assert_eq!(resolved.team, None);
    }

    #[tokio::test]
    async fn test_cache_serves_fresh_entry() {
        let cache = PlayerCache::new(Duration::from_secs(3600));
        let now = Instant::now();
        let players = Arc::new(HashMap::new());

        cache.store(players.clone(), now).await;

        let later = now + Duration::from_secs(3599);
        assert!(cache.get(later).await.is_some());
    }

    #[tokio::test]
    async fn test_cache_expires_after_ttl() {
        let cache = PlayerCache::new(Duration::from_secs(3600));
        let now = Instant::now();
        cache.store(Arc::new(HashMap::new()), now).await;

        let expired = now + Duration::from_secs(3600);
        assert!(cache.get(expired).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_cold_read() {
        let cache = PlayerCache::new(Duration::from_secs(3600));
        assert!(cache.get(Instant::now()).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_store_overwrites() {
        let cache = PlayerCache::new(Duration::from_secs(3600));
        let now = Instant::now();

        let mut first = HashMap::new();
        first.insert("1".to_string(), PlayerRecord::default());
        cache.store(Arc::new(first), now).await;

        cache.store(Arc::new(HashMap::new()), now).await;

        let cached = cache.get(now + Duration::from_secs(1)).await.unwrap();
        assert!(cached.is_empty());
    }
}
