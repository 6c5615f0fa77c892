//! Серверная сессия вместо browser localStorage: токены и личность
//! пользователя живут здесь с явным жизненным циклом записал/прочитал/очистил
//! и нигде не интерпретируются - только пробрасываются в movie-service.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};
use uuid::Uuid;

use crate::booking::BookingFlow;
use crate::config::BookingConfig;
use crate::models::{AdminAccount, User};

/// Пользовательская авторизация (POST /auth/login в movie-service).
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Админская авторизация (POST /admin/login), отдельный токен.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub token: String,
    pub admin: AdminAccount,
}

pub struct Session {
    pub flow: BookingFlow,
    pub user: Option<AuthSession>,
    pub admin: Option<AdminAuth>,
    last_touched: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    booking: BookingConfig,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(booking: BookingConfig) -> Self {
        let idle_ttl = Duration::from_secs(booking.session_idle_seconds);
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            booking,
            idle_ttl,
        }
    }

    /// Открывает новую сессию с чистым мастером бронирования.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session {
            flow: BookingFlow::new(&self.booking),
            user: None,
            admin: None,
            last_touched: Instant::now(),
        };
        self.inner.write().await.insert(id, session);
        id
    }

    /// Продлевает сессию; false если её нет.
    pub async fn touch(&self, id: Uuid) -> bool {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(&id) {
            Some(s) => {
                s.last_touched = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Выполняет операцию над сессией под write-блокировкой.
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id)?;
        session.last_touched = Instant::now();
        Some(f(session))
    }

    /// Закрывает сессию (teardown: таймер умирает вместе с мастером).
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    /// Секундный тик всех активных таймеров брони. Возвращает сессии,
    /// у которых бронь истекла на этом тике, с освобождёнными местами.
    pub async fn tick_holds(&self) -> Vec<(Uuid, Vec<String>)> {
        let mut sessions = self.inner.write().await;
        let mut expired = Vec::new();
        for (id, session) in sessions.iter_mut() {
            if let Some(released) = session.flow.tick() {
                expired.push((*id, released));
            }
        }
        expired
    }

    /// Удаляет сессии, к которым давно не обращались.
    pub async fn prune_idle(&self) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        let ttl = self.idle_ttl;
        sessions.retain(|_, s| s.last_touched.elapsed() < ttl);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
