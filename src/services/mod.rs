//! Entity services over a shared record store
//!
//! Every operation runs inside one store transaction: it either commits as
//! a whole or leaves nothing behind.

pub mod accounts;
pub mod candidates;
pub mod comments;
pub mod elections;
pub mod government_plans;
pub mod guides;
pub mod moderation;
pub mod political_groups;
pub mod posts;
pub mod table_members;
pub mod vote_intentions;
pub mod voters;
pub mod voting_centers;
pub mod voting_tables;
mod views;

pub use accounts::{AccountService, ActivateAccountRequest, EmailRegistration, RegisterEmailRequest};
pub use candidates::CandidateService;
pub use comments::CommentService;
pub use elections::{ElectionService, ElectoralEventService};
pub use government_plans::{GovernmentPlanSectionService, GovernmentPlanService};
pub use guides::{GuideContentService, NewsItemService};
pub use moderation::ModerationAlertService;
pub use political_groups::PoliticalGroupService;
pub use posts::PostService;
pub use table_members::TableMemberService;
pub use vote_intentions::VoteIntentionService;
pub use voters::VoterService;
pub use voting_centers::VotingCenterService;
pub use voting_tables::VotingTableService;

use crate::auth::{ActivationTokenIssuer, AuthService, CredentialHasher, Pbkdf2Hasher, SessionIssuer};
use crate::config::Config;
use crate::notify::Notifier;
use crate::store::RecordStore;
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Every service wired to the same store
pub struct Services<S> {
    pub auth: AuthService<S>,
    pub accounts: AccountService<S>,
    pub voters: VoterService<S>,
    pub table_members: TableMemberService<S>,
    pub vote_intentions: VoteIntentionService<S>,
    pub moderation_alerts: ModerationAlertService<S>,
    pub political_groups: PoliticalGroupService<S>,
    pub candidates: CandidateService<S>,
    pub elections: ElectionService<S>,
    pub electoral_events: ElectoralEventService<S>,
    pub government_plans: GovernmentPlanService<S>,
    pub government_plan_sections: GovernmentPlanSectionService<S>,
    pub posts: PostService<S>,
    pub comments: CommentService<S>,
    pub voting_centers: VotingCenterService<S>,
    pub voting_tables: VotingTableService<S>,
    pub guides: GuideContentService<S>,
    pub news: NewsItemService<S>,
}

impl<S: RecordStore> Services<S> {
    pub async fn new(store: Arc<S>, config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let hasher: Arc<dyn CredentialHasher> =
            Arc::new(Pbkdf2Hasher::new(config.auth.password_hash_iterations)?);
        let sessions = SessionIssuer::new(&config.auth)?;
        let tokens = ActivationTokenIssuer::new(config.auth.activation_token_ttl_seconds);

        let auth = AuthService::new(store.clone(), hasher.clone(), sessions).await?;
        let accounts = AccountService::new(
            store.clone(),
            hasher,
            tokens,
            notifier,
            config.mail.clone(),
            config.auth.password_min_length,
        );

        info!("🔧 Services ready");
        Ok(Self {
            auth,
            accounts,
            voters: VoterService::new(store.clone()),
            table_members: TableMemberService::new(store.clone()),
            vote_intentions: VoteIntentionService::new(store.clone()),
            moderation_alerts: ModerationAlertService::new(store.clone()),
            political_groups: PoliticalGroupService::new(store.clone()),
            candidates: CandidateService::new(store.clone()),
            elections: ElectionService::new(store.clone()),
            electoral_events: ElectoralEventService::new(store.clone()),
            government_plans: GovernmentPlanService::new(store.clone()),
            government_plan_sections: GovernmentPlanSectionService::new(store.clone()),
            posts: PostService::new(store.clone()),
            comments: CommentService::new(store.clone()),
            voting_centers: VotingCenterService::new(store.clone()),
            voting_tables: VotingTableService::new(store.clone()),
            guides: GuideContentService::new(store.clone()),
            news: NewsItemService::new(store),
        })
    }
}
