//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use electoral::model::{
    NewAccount, NewCandidate, NewElection, NewPoliticalGroup, NewVotingCenter, NewVotingTable,
};
use electoral::notify::{ActivationNotice, Notifier};
use electoral::types::{CandidateOffice, ElectionType, Id, Role};
use electoral::{Config, Error, MemoryStore, Result, Services};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Forwards every notice to the test
pub struct RecordingNotifier {
    sent: mpsc::UnboundedSender<ActivationNotice>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_activation(&self, notice: &ActivationNotice) -> Result<()> {
        self.sent
            .send(notice.clone())
            .map_err(|_| Error::internal("outbox closed"))
    }
}

/// Mail transport that is always down
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_activation(&self, _notice: &ActivationNotice) -> Result<()> {
        Err(Error::internal("SMTP connection refused"))
    }
}

pub struct Harness {
    pub services: Services<MemoryStore>,
    pub store: Arc<MemoryStore>,
    pub outbox: mpsc::UnboundedReceiver<ActivationNotice>,
}

impl Harness {
    pub async fn new() -> Result<Self> {
        let (sent, outbox) = mpsc::unbounded_channel();
        let store = Arc::new(MemoryStore::new());
        let services = Services::new(
            store.clone(),
            &Config::for_testing(),
            Arc::new(RecordingNotifier { sent }),
        )
        .await?;

        Ok(Self {
            services,
            store,
            outbox,
        })
    }

    pub async fn with_notifier(notifier: Arc<dyn Notifier>) -> Result<Self> {
        let (_sent, outbox) = mpsc::unbounded_channel();
        let store = Arc::new(MemoryStore::new());
        let services = Services::new(store.clone(), &Config::for_testing(), notifier).await?;

        Ok(Self {
            services,
            store,
            outbox,
        })
    }

    /// Wait for the next activation notice and pull the raw token out of its link
    pub async fn next_token(&mut self) -> String {
        let notice = tokio::time::timeout(Duration::from_secs(5), self.outbox.recv())
            .await
            .expect("no activation notice within 5s")
            .expect("outbox closed");
        notice
            .link
            .split("token=")
            .nth(1)
            .expect("activation link without token")
            .to_string()
    }

    pub async fn account(&self, name: &str, email: &str, role: Role) -> Result<Id> {
        let created = self
            .services
            .accounts
            .create(NewAccount {
                name: name.to_string(),
                email: Some(email.to_string()),
                password: Some("Secret123".to_string()),
                role: Some(role),
            })
            .await?;
        Ok(created.into_data()?.id)
    }

    pub async fn voting_table(&self, code: &str) -> Result<(Id, Id)> {
        let center = self
            .services
            .voting_centers
            .create(NewVotingCenter {
                name: format!("I.E. {}", code),
                address: "Av. Arequipa 1200".to_string(),
                district: Some("Lince".to_string()),
                ..Default::default()
            })
            .await?
            .into_data()?;
        let table = self
            .services
            .voting_tables
            .create(NewVotingTable {
                code: code.to_string(),
                voting_center_id: center.center.id,
                room: Some("Aula 3".to_string()),
                floor: None,
            })
            .await?
            .into_data()?;
        Ok((center.center.id, table.table.id))
    }

    pub async fn political_group(&self, name: &str) -> Result<Id> {
        let group = self
            .services
            .political_groups
            .create(NewPoliticalGroup {
                name: name.to_string(),
                ..Default::default()
            })
            .await?
            .into_data()?;
        Ok(group.group.id)
    }

    pub async fn candidate(&self, full_name: &str, group_id: Id) -> Result<Id> {
        let candidate = self
            .services
            .candidates
            .create(NewCandidate {
                full_name: full_name.to_string(),
                office: CandidateOffice::President,
                biography: None,
                photo_url: None,
                political_group_id: group_id,
                account_id: None,
            })
            .await?
            .into_data()?;
        Ok(candidate.candidate.id)
    }

    pub async fn election(&self, name: &str) -> Result<Id> {
        let election = self
            .services
            .elections
            .create(NewElection {
                name: name.to_string(),
                description: None,
                kind: ElectionType::General,
                date: Utc.with_ymd_and_hms(2026, 4, 12, 8, 0, 0).unwrap(),
            })
            .await?
            .into_data()?;
        Ok(election.election.id)
    }
}
