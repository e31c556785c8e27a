// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job_posting::JobPosting;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// 进程内的职位结果缓存
///
/// 条目在 `ttl` 之后过期，`ttl` 为 0 时不缓存任何结果
pub struct JobCache {
    entries: DashMap<String, (Vec<JobPosting>, Instant)>,
    ttl: Duration,
}

impl JobCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// 读取未过期的缓存结果
    pub fn get(&self, key: &str) -> Option<Vec<JobPosting>> {
        if !self.is_enabled() {
            return None;
        }

        let expired = match self.entries.get(key) {
            Some(entry) if entry.1.elapsed() < self.ttl => {
                debug!("Cache hit for {}", key);
                return Some(entry.0.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// 写入结果，同时清理已过期的条目
    pub fn insert(&self, key: String, jobs: Vec<JobPosting>) {
        if !self.is_enabled() {
            return;
        }
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.1.elapsed() < ttl);
        self.entries.insert(key, (jobs, Instant::now()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
