use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest_middleware::reqwest::StatusCode;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use super::backend::{Backend, BackendHealth, Error};
use crate::domain::giveaways::{parse_end_date, CommunityStats, Giveaway, NewGiveaway};

/// In-memory stand-in for the giveaway backend, answers the way the real one does
pub struct MockBackend {
    admin_password: String,
    giveaways: Arc<RwLock<Vec<Giveaway>>>,
}

impl MockBackend {
    pub fn new(admin_password: impl Into<String>) -> Self {
        Self {
            admin_password: admin_password.into(),
            giveaways: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_giveaways(self, giveaways: Vec<Giveaway>) -> Self {
        if let Ok(mut stored) = self.giveaways.write() {
            *stored = giveaways;
        }
        self
    }

    pub fn giveaway_count(&self) -> usize {
        self.giveaways.read().map(|g| g.len()).unwrap_or_default()
    }

    fn poisoned() -> Error {
        Error::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::from("mock backend lock poisoned"),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_giveaways(&self) -> Result<Vec<Giveaway>, Error> {
        let giveaways = self.giveaways.read().map_err(|_| Self::poisoned())?;
        // newest first, like the real backend
        Ok(giveaways.iter().rev().cloned().collect())
    }

    async fn login(&self, password: &str) -> Result<(), Error> {
        if password == self.admin_password {
            Ok(())
        } else {
            Err(Error::Rejected {
                status: StatusCode::UNAUTHORIZED,
                body: String::from("Invalid admin password"),
            })
        }
    }

    async fn create_giveaway(&self, giveaway: &NewGiveaway) -> Result<(), Error> {
        let now = OffsetDateTime::now_utc();
        match parse_end_date(&giveaway.end_date) {
            Some(end) if end > now => {}
            Some(_) => {
                return Err(Error::Rejected {
                    status: StatusCode::BAD_REQUEST,
                    body: String::from("End date must be in the future"),
                })
            }
            None => {
                return Err(Error::Rejected {
                    status: StatusCode::BAD_REQUEST,
                    body: String::from("Invalid date format"),
                })
            }
        }

        let created = Giveaway {
            id: Uuid::new_v4().to_string(),
            title: giveaway.title.clone(),
            description: giveaway.description.clone(),
            prize: giveaway.prize.clone(),
            end_date: giveaway.end_date.clone(),
            entry_requirement: giveaway.entry_requirement.clone(),
            created_at: now.format(&Rfc3339).ok(),
        };
        self.giveaways
            .write()
            .map_err(|_| Self::poisoned())?
            .push(created);
        Ok(())
    }

    async fn delete_giveaway(&self, giveaway_id: &str) -> Result<(), Error> {
        let mut giveaways = self.giveaways.write().map_err(|_| Self::poisoned())?;
        let before = giveaways.len();
        giveaways.retain(|g| g.id != giveaway_id);
        if giveaways.len() == before {
            return Err(Error::Rejected {
                status: StatusCode::NOT_FOUND,
                body: String::from("Giveaway not found"),
            });
        }
        Ok(())
    }

    async fn health(&self) -> Result<BackendHealth, Error> {
        Ok(BackendHealth {
            status: String::from("healthy"),
            database: Some(String::from("in-memory")),
        })
    }

    async fn stats(&self) -> Result<CommunityStats, Error> {
        let giveaways = self.giveaways.read().map_err(|_| Self::poisoned())?;
        let now = OffsetDateTime::now_utc();
        Ok(CommunityStats {
            total_giveaways: giveaways.len() as u64,
            active_giveaways: giveaways.iter().filter(|g| g.is_active_at(now)).count() as u64,
            member_count: 500,
        })
    }
}
