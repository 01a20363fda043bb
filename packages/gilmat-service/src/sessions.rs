use std::{
	collections::{HashMap, VecDeque},
	sync::Arc,
};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::Recommendation;

/// Bounded store of finished recommendations, evicting the oldest session first.
pub struct SessionStore {
	inner: RwLock<Sessions>,
	capacity: usize,
}
impl SessionStore {
	pub fn new(capacity: usize) -> Self {
		Self { inner: RwLock::new(Sessions::default()), capacity: capacity.max(1) }
	}

	pub async fn insert(&self, recommendation: Recommendation) -> (Uuid, Arc<Recommendation>) {
		let id = Uuid::new_v4();
		let recommendation = Arc::new(recommendation);
		let mut sessions = self.inner.write().await;

		while sessions.order.len() >= self.capacity {
			let Some(oldest) = sessions.order.pop_front() else {
				break;
			};

			sessions.entries.remove(&oldest);
		}

		sessions.entries.insert(id, recommendation.clone());
		sessions.order.push_back(id);

		(id, recommendation)
	}

	pub async fn get(&self, id: &Uuid) -> Option<Arc<Recommendation>> {
		self.inner.read().await.entries.get(id).cloned()
	}
}

#[derive(Default)]
struct Sessions {
	entries: HashMap<Uuid, Arc<Recommendation>>,
	order: VecDeque<Uuid>,
}
