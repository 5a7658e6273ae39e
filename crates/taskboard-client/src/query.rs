//! Query cache
//!
//! Views declare the [`QueryKey`]s they need. Fresh entries are served
//! straight from the cache; stale or missing ones are fetched again.
//! Mutations drop the entries they can affect.

use crate::client::TrackerClient;
use crate::error::Result;
use crate::transport::Transport;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use taskboard_core::models::{ActivityLog, Comment, Id, Project, Sprint, Task, TaskFilter, User};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Projects,
    /// Sprints, optionally of one project
    Sprints(Option<Id>),
    Tasks(TaskFilter),
    Users,
    Comments(Id),
    Activity(Id),
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryData {
    Projects(Vec<Project>),
    Sprints(Vec<Sprint>),
    Tasks(Vec<Task>),
    Users(Vec<User>),
    Comments(Vec<Comment>),
    Activity(Vec<ActivityLog>),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: QueryData,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    stale_after: Duration,
}

impl QueryCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_after,
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<&QueryData> {
        self.entries.get(key).map(|entry| &entry.data)
    }

    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.is_fresh_at(key, Instant::now())
    }

    pub fn is_fresh_at(&self, key: &QueryKey, now: Instant) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| now.saturating_duration_since(entry.fetched_at) < self.stale_after)
    }

    pub fn store(&mut self, key: QueryKey, data: QueryData) {
        self.store_at(key, data, Instant::now());
    }

    pub fn store_at(&mut self, key: QueryKey, data: QueryData, fetched_at: Instant) {
        self.entries.insert(key, CacheEntry { data, fetched_at });
    }

    /// Keys out of `wanted` that need a fetch
    pub fn stale_keys(&self, wanted: &[QueryKey]) -> Vec<QueryKey> {
        let now = Instant::now();
        wanted
            .iter()
            .filter(|key| !self.is_fresh_at(key, now))
            .cloned()
            .collect()
    }

    pub fn invalidate(&mut self, key: &QueryKey) {
        self.entries.remove(key);
    }

    pub fn invalidate_many(&mut self, keys: &[QueryKey]) {
        for key in keys {
            self.entries.remove(key);
        }
    }

    /// After a task mutation: every task list, plus that task's comments and activity
    pub fn invalidate_task(&mut self, task_id: Option<Id>) {
        self.entries.retain(|key, _| match key {
            QueryKey::Tasks(_) => false,
            QueryKey::Comments(id) | QueryKey::Activity(id) => Some(*id) != task_id,
            _ => true,
        });
    }

    /// After a project mutation; tasks go too since they hang off projects
    pub fn invalidate_projects(&mut self) {
        self.entries
            .retain(|key, _| !matches!(key, QueryKey::Projects | QueryKey::Tasks(_)));
    }

    pub fn invalidate_sprints(&mut self) {
        self.entries
            .retain(|key, _| !matches!(key, QueryKey::Sprints(_)));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn projects(&self) -> Option<&[Project]> {
        match self.get(&QueryKey::Projects)? {
            QueryData::Projects(v) => Some(v),
            _ => None,
        }
    }

    pub fn sprints(&self, project_id: Option<Id>) -> Option<&[Sprint]> {
        match self.get(&QueryKey::Sprints(project_id))? {
            QueryData::Sprints(v) => Some(v),
            _ => None,
        }
    }

    pub fn tasks(&self, filter: &TaskFilter) -> Option<&[Task]> {
        match self.get(&QueryKey::Tasks(filter.clone()))? {
            QueryData::Tasks(v) => Some(v),
            _ => None,
        }
    }

    pub fn users(&self) -> Option<&[User]> {
        match self.get(&QueryKey::Users)? {
            QueryData::Users(v) => Some(v),
            _ => None,
        }
    }

    pub fn comments(&self, task_id: Id) -> Option<&[Comment]> {
        match self.get(&QueryKey::Comments(task_id))? {
            QueryData::Comments(v) => Some(v),
            _ => None,
        }
    }

    pub fn activity(&self, task_id: Id) -> Option<&[ActivityLog]> {
        match self.get(&QueryKey::Activity(task_id))? {
            QueryData::Activity(v) => Some(v),
            _ => None,
        }
    }
}

/// Run the API call behind `key`
pub async fn fetch<T: Transport>(client: &TrackerClient<T>, key: &QueryKey) -> Result<QueryData> {
    Ok(match key {
        QueryKey::Projects => QueryData::Projects(client.list_projects().await?),
        QueryKey::Sprints(project_id) => QueryData::Sprints(client.list_sprints(*project_id).await?),
        QueryKey::Tasks(filter) => QueryData::Tasks(client.list_tasks(filter).await?),
        QueryKey::Users => QueryData::Users(client.list_users().await?),
        QueryKey::Comments(id) => QueryData::Comments(client.list_comments(*id).await?),
        QueryKey::Activity(id) => QueryData::Activity(client.list_activity(*id).await?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> QueryCache {
        QueryCache::new(Duration::from_secs(30))
    }

    fn board_key(project_id: Id) -> QueryKey {
        QueryKey::Tasks(TaskFilter::for_project(Some(project_id)))
    }

    #[test]
    fn test_entries_go_stale() {
        let mut cache = cache();
        let start = Instant::now();
        cache.store_at(QueryKey::Users, QueryData::Users(vec![]), start);

        assert!(cache.is_fresh_at(&QueryKey::Users, start + Duration::from_secs(29)));
        assert!(!cache.is_fresh_at(&QueryKey::Users, start + Duration::from_secs(30)));
        // stale data is still served while the refetch runs
        assert!(cache.users().is_some());
        assert!(!cache.is_fresh_at(&QueryKey::Projects, start));
    }

    #[test]
    fn test_stale_keys() {
        let mut cache = cache();
        cache.store(QueryKey::Projects, QueryData::Projects(vec![]));
        let wanted = vec![QueryKey::Projects, QueryKey::Users];
        assert_eq!(cache.stale_keys(&wanted), vec![QueryKey::Users]);
    }

    #[test]
    fn test_task_mutation_invalidation() {
        let mut cache = cache();
        cache.store(board_key(1), QueryData::Tasks(vec![]));
        cache.store(board_key(2), QueryData::Tasks(vec![]));
        cache.store(QueryKey::Comments(7), QueryData::Comments(vec![]));
        cache.store(QueryKey::Activity(7), QueryData::Activity(vec![]));
        cache.store(QueryKey::Comments(8), QueryData::Comments(vec![]));
        cache.store(QueryKey::Projects, QueryData::Projects(vec![]));

        cache.invalidate_task(Some(7));

        assert!(cache.tasks(&TaskFilter::for_project(Some(1))).is_none());
        assert!(cache.tasks(&TaskFilter::for_project(Some(2))).is_none());
        assert!(cache.comments(7).is_none());
        assert!(cache.activity(7).is_none());
        assert!(cache.comments(8).is_some());
        assert!(cache.projects().is_some());
    }

    #[test]
    fn test_project_and_sprint_invalidation() {
        let mut cache = cache();
        cache.store(QueryKey::Projects, QueryData::Projects(vec![]));
        cache.store(board_key(1), QueryData::Tasks(vec![]));
        cache.store(QueryKey::Sprints(None), QueryData::Sprints(vec![]));
        cache.store(QueryKey::Users, QueryData::Users(vec![]));

        cache.invalidate_projects();
        assert!(cache.projects().is_none());
        assert!(cache.tasks(&TaskFilter::for_project(Some(1))).is_none());
        assert!(cache.sprints(None).is_some());

        cache.invalidate_sprints();
        assert!(cache.sprints(None).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_typed_getter_mismatch() {
        let mut cache = cache();
        cache.store(QueryKey::Users, QueryData::Projects(vec![]));
        assert!(cache.users().is_none());
    }
}
