//! Cross-entity rules: uniqueness, promotion, threads, moderation and deletes

mod common;

use chrono::{TimeZone, Utc};
use common::Harness;
use electoral::model::{
    Account, CandidatePatch, CommentPatch, ModerationAlertPatch, NewAssetDeclaration, NewComment,
    NewModerationAlert, NewNewsItem, NewPost, NewTableMember, NewVoteIntention, NewVoterProfile,
    NewWorkExperience, Post, PostModerationAlert, PreRegistration, VoterProfile,
    VoterProfilePatch, VotingCenterPatch, VotingTable, WorkExperience,
};
use electoral::store::{Record, RecordStore, Transaction};
use electoral::types::{ModerationStatus, PostStatus, Role};
use electoral::{Patch, Result};

#[tokio::test]
async fn test_one_profile_per_account_and_document() -> Result<()> {
    let harness = Harness::new().await?;
    let ana = harness.account("Ana Torres", "ana@x.pe", Role::Voter).await?;
    let luis = harness.account("Luis Rojas", "luis@x.pe", Role::Voter).await?;

    harness
        .services
        .voters
        .create(NewVoterProfile {
            account_id: ana,
            document_number: "40111222".to_string(),
            voting_table_id: None,
        })
        .await?;

    let second_profile = harness
        .services
        .voters
        .create(NewVoterProfile {
            account_id: ana,
            document_number: "40999888".to_string(),
            voting_table_id: None,
        })
        .await;
    assert!(second_profile.unwrap_err().is_conflict());

    let same_document = harness
        .services
        .voters
        .create(NewVoterProfile {
            account_id: luis,
            document_number: "40111222".to_string(),
            voting_table_id: None,
        })
        .await;
    assert!(same_document.unwrap_err().is_conflict());

    let blank = harness
        .services
        .voters
        .create(NewVoterProfile {
            account_id: luis,
            document_number: "   ".to_string(),
            voting_table_id: None,
        })
        .await;
    assert!(blank.unwrap_err().is_bad_request());

    let missing_account = harness
        .services
        .voters
        .create(NewVoterProfile {
            account_id: 999,
            document_number: "40555666".to_string(),
            voting_table_id: None,
        })
        .await;
    assert!(missing_account.unwrap_err().is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_table_member_promotion() -> Result<()> {
    println!("🧾 Testing table member assignment...");

    let harness = Harness::new().await?;
    let (_, table_id) = harness.voting_table("045123").await?;
    let ana = harness.account("Ana Torres", "ana@x.pe", Role::Voter).await?;

    let member = harness
        .services
        .table_members
        .create(NewTableMember {
            account_id: ana,
            voting_table_id: table_id,
            role_in_table: Some("President".to_string()),
        })
        .await?
        .into_data()?;
    assert_eq!(member.account.role, Role::TableMember);
    assert_eq!(member.voting_table.code, "045123");

    let account = harness.services.accounts.find_one(ana).await?.into_data()?;
    assert_eq!(account.role, Role::TableMember);

    let twice = harness
        .services
        .table_members
        .create(NewTableMember {
            account_id: ana,
            voting_table_id: table_id,
            role_in_table: None,
        })
        .await;
    assert!(twice.unwrap_err().is_conflict());

    // A failed assignment leaves the role alone
    let luis = harness.account("Luis Rojas", "luis@x.pe", Role::Voter).await?;
    let missing_table = harness
        .services
        .table_members
        .create(NewTableMember {
            account_id: luis,
            voting_table_id: 999,
            role_in_table: None,
        })
        .await;
    assert!(missing_table.unwrap_err().is_not_found());
    let luis_view = harness.services.accounts.find_one(luis).await?.into_data()?;
    assert_eq!(luis_view.role, Role::Voter);

    let table = harness.services.voting_tables.find_one(table_id).await?.into_data()?;
    assert_eq!(table.members.len(), 1);
    assert_eq!(table.members[0].role_in_table.as_deref(), Some("President"));

    Ok(())
}

#[tokio::test]
async fn test_vote_intention_triple_is_unique() -> Result<()> {
    let harness = Harness::new().await?;
    let ana = harness.account("Ana Torres", "ana@x.pe", Role::Voter).await?;
    let group = harness.political_group("Fuerza Andina").await?;
    let first = harness.candidate("María Quispe", group).await?;
    let second = harness.candidate("Carlos Huamán", group).await?;
    let election = harness.election("Elecciones Generales 2026").await?;

    let declare = |candidate_id| NewVoteIntention {
        account_id: ana,
        candidate_id,
        election_id: election,
    };

    harness.services.vote_intentions.create(declare(first)).await?;
    let repeated = harness.services.vote_intentions.create(declare(first)).await;
    assert!(repeated.unwrap_err().is_conflict());

    // A different candidate in the same election is a separate intention
    let other = harness
        .services
        .vote_intentions
        .create(declare(second))
        .await?
        .into_data()?;
    assert_eq!(other.candidate.full_name, "Carlos Huamán");

    let listed = harness.services.vote_intentions.find_all().await?.into_data()?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, other.id);

    let candidate = harness.services.candidates.find_one(first).await?.into_data()?;
    assert_eq!(candidate.vote_intention_count, 1);

    Ok(())
}

#[tokio::test]
async fn test_comment_threads_stay_within_a_post() -> Result<()> {
    let harness = Harness::new().await?;
    let author = harness.account("Ana Torres", "ana@x.pe", Role::Voter).await?;

    let post = |title: &str| NewPost {
        title: title.to_string(),
        content: "¿Dónde voto?".to_string(),
        status: None,
        author_id: author,
        candidate_id: None,
    };
    let first = harness.services.posts.create(post("Primera")).await?.into_data()?;
    assert_eq!(first.post.status, PostStatus::Published);
    let second = harness.services.posts.create(post("Segunda")).await?.into_data()?;

    let comment = |post_id, parent_id| NewComment {
        post_id,
        author_id: author,
        content: "Respuesta".to_string(),
        parent_id,
    };
    let root = harness
        .services
        .comments
        .create(comment(first.post.id, None))
        .await?
        .into_data()?;
    let reply = harness
        .services
        .comments
        .create(comment(first.post.id, Some(root.comment.id)))
        .await?
        .into_data()?;
    assert_eq!(reply.parent.as_ref().map(|p| p.id), Some(root.comment.id));

    let crossed = harness
        .services
        .comments
        .create(comment(second.post.id, Some(root.comment.id)))
        .await;
    assert!(crossed.unwrap_err().is_bad_request());

    let missing_parent = harness
        .services
        .comments
        .create(comment(first.post.id, Some(999)))
        .await;
    assert!(missing_parent.unwrap_err().is_not_found());

    let own_parent = harness
        .services
        .comments
        .update(
            root.comment.id,
            CommentPatch {
                content: None,
                parent_id: Patch::Value(root.comment.id),
            },
        )
        .await;
    assert!(own_parent.unwrap_err().is_bad_request());

    // Root under its own reply would close a loop
    let looped = harness
        .services
        .comments
        .update(
            root.comment.id,
            CommentPatch {
                content: None,
                parent_id: Patch::Value(reply.comment.id),
            },
        )
        .await;
    assert!(looped.unwrap_err().is_bad_request());

    let root_view = harness.services.comments.find_one(root.comment.id).await?.into_data()?;
    assert_eq!(root_view.replies.len(), 1);

    // Detaching the reply keeps it on the post
    let detached = harness
        .services
        .comments
        .update(
            reply.comment.id,
            CommentPatch {
                content: None,
                parent_id: Patch::Null,
            },
        )
        .await?
        .into_data()?;
    assert!(detached.parent.is_none());
    assert_eq!(detached.post.id, first.post.id);

    Ok(())
}

#[tokio::test]
async fn test_moderation_review_stamps_time() -> Result<()> {
    println!("🛡️ Testing moderation review timestamps...");

    let harness = Harness::new().await?;
    let author = harness.account("Ana Torres", "ana@x.pe", Role::Voter).await?;
    let admin = harness.account("Admin", "admin@x.pe", Role::Admin).await?;
    let post = harness
        .services
        .posts
        .create(NewPost {
            title: "Denuncia".to_string(),
            content: "Texto".to_string(),
            status: None,
            author_id: author,
            candidate_id: None,
        })
        .await?
        .into_data()?;

    let alert = harness
        .services
        .moderation_alerts
        .create(NewModerationAlert {
            post_id: post.post.id,
            ai_summary: "Possible misinformation".to_string(),
            status: None,
        })
        .await?
        .into_data()?;
    assert_eq!(alert.alert.status, ModerationStatus::Pending);
    assert!(alert.alert.reviewed_at.is_none());

    let pending = harness.services.moderation_alerts.find_pending().await?.into_data()?;
    assert_eq!(pending.len(), 1);

    let reviewed = harness
        .services
        .moderation_alerts
        .update(
            alert.alert.id,
            ModerationAlertPatch {
                status: Some(ModerationStatus::Approved),
                reviewed_by_admin_id: Patch::Value(admin),
                ..Default::default()
            },
        )
        .await?
        .into_data()?;
    let stamped = reviewed.alert.reviewed_at.expect("review time stamped");
    assert_eq!(reviewed.reviewed_by_admin.map(|a| a.id), Some(admin));

    // A later edit keeps the original stamp
    let edited = harness
        .services
        .moderation_alerts
        .update(
            alert.alert.id,
            ModerationAlertPatch {
                status: Some(ModerationStatus::Rejected),
                ..Default::default()
            },
        )
        .await?
        .into_data()?;
    assert_eq!(edited.alert.reviewed_at, Some(stamped));

    // Removing the reviewer clears the link, not the alert
    harness.services.accounts.remove(admin).await?;
    let after = harness.services.moderation_alerts.find_one(alert.alert.id).await?.into_data()?;
    assert!(after.alert.reviewed_by_admin_id.is_none());
    assert!(after.reviewed_by_admin.is_none());

    // Removing the post removes its alerts
    harness.services.posts.remove(post.post.id).await?;
    let stats = harness.store.stats().await;
    assert_eq!(stats.rows_of(PostModerationAlert::ENTITY), 0);

    Ok(())
}

#[tokio::test]
async fn test_delete_policies() -> Result<()> {
    println!("🗑️ Testing delete policies...");

    let harness = Harness::new().await?;
    let (center_id, table_id) = harness.voting_table("045123").await?;

    let pre = harness
        .services
        .voters
        .pre_register(PreRegistration {
            name: "Juan Pérez".to_string(),
            document_number: "12345678".to_string(),
            voting_table_id: Some(table_id),
        })
        .await?
        .into_data()?;
    assert_eq!(pre.voter.voting_table.as_ref().map(|t| t.id), Some(table_id));

    // Tables still in the center block its removal
    let blocked = harness.services.voting_centers.remove(center_id).await;
    assert!(blocked.unwrap_err().is_conflict());

    // Removing the table unassigns its voters
    harness.services.voting_tables.remove(table_id).await?;
    let voter = harness.services.voters.find_one(pre.voter.id).await?.into_data()?;
    assert!(voter.voting_table.is_none());
    harness.services.voting_centers.remove(center_id).await?;

    // Removing the account takes its profile and content along
    let post = harness
        .services
        .posts
        .create(NewPost {
            title: "Hola".to_string(),
            content: "Texto".to_string(),
            status: Some(PostStatus::Draft),
            author_id: pre.account.id,
            candidate_id: None,
        })
        .await?
        .into_data()?;
    harness.services.accounts.remove(pre.account.id).await?;

    let stats = harness.store.stats().await;
    assert_eq!(stats.rows_of(Account::ENTITY), 0);
    assert_eq!(stats.rows_of(VoterProfile::ENTITY), 0);
    assert_eq!(stats.rows_of(Post::ENTITY), 0);
    assert_eq!(stats.rows_of(VotingTable::ENTITY), 0);
    let gone = harness.services.posts.find_one(post.post.id).await;
    assert!(gone.unwrap_err().is_not_found());

    Ok(())
}

#[tokio::test]
async fn test_candidate_records_follow_the_candidate() -> Result<()> {
    let harness = Harness::new().await?;
    let group = harness.political_group("Fuerza Andina").await?;
    let candidate = harness.candidate("María Quispe", group).await?;
    let linked = harness.account("María Quispe", "maria@x.pe", Role::Candidate).await?;

    harness
        .services
        .candidates
        .add_work_experience(
            candidate,
            NewWorkExperience {
                position: "Alcaldesa".to_string(),
                company: "Municipalidad de Cusco".to_string(),
                start_year: 2015,
                end_year: Some(2018),
                ..Default::default()
            },
        )
        .await?;

    let inverted = harness
        .services
        .candidates
        .add_work_experience(
            candidate,
            NewWorkExperience {
                position: "Regidora".to_string(),
                company: "Municipalidad de Cusco".to_string(),
                start_year: 2012,
                end_year: Some(2010),
                ..Default::default()
            },
        )
        .await;
    assert!(inverted.unwrap_err().is_bad_request());

    let negative = harness
        .services
        .candidates
        .add_asset_declaration(
            candidate,
            NewAssetDeclaration {
                year: 2024,
                declared_income: -1.0,
                ..Default::default()
            },
        )
        .await;
    assert!(negative.unwrap_err().is_bad_request());

    let updated = harness
        .services
        .candidates
        .update(
            candidate,
            CandidatePatch {
                account_id: Patch::Value(linked),
                ..Default::default()
            },
        )
        .await?
        .into_data()?;
    assert_eq!(updated.account.as_ref().map(|a| a.id), Some(linked));
    assert_eq!(updated.work_experience.len(), 1);

    // Groups with candidates cannot be removed
    let blocked = harness.services.political_groups.remove(group).await;
    assert!(blocked.unwrap_err().is_conflict());

    // Removing the linked account only unlinks it
    harness.services.accounts.remove(linked).await?;
    let unlinked = harness.services.candidates.find_one(candidate).await?.into_data()?;
    assert!(unlinked.account.is_none());
    assert_eq!(unlinked.candidate.account_id, None);

    harness.services.candidates.remove(candidate).await?;
    let stats = harness.store.stats().await;
    assert_eq!(stats.rows_of(WorkExperience::ENTITY), 0);
    harness.services.political_groups.remove(group).await?;

    Ok(())
}

#[tokio::test]
async fn test_patch_distinguishes_null_from_absent() -> Result<()> {
    let harness = Harness::new().await?;
    let (center_id, table_id) = harness.voting_table("045123").await?;
    let ana = harness.account("Ana Torres", "ana@x.pe", Role::Voter).await?;

    let voter = harness
        .services
        .voters
        .create(NewVoterProfile {
            account_id: ana,
            document_number: "40111222".to_string(),
            voting_table_id: Some(table_id),
        })
        .await?
        .into_data()?;

    // Absent leaves the table assignment as is
    let untouched = harness
        .services
        .voters
        .update(
            voter.id,
            VoterProfilePatch {
                document_number: Some("40111223".to_string()),
                voting_table_id: Patch::Absent,
            },
        )
        .await?
        .into_data()?;
    assert_eq!(untouched.document_number, "40111223");
    assert!(untouched.voting_table.is_some());

    // Null clears it
    let cleared = harness
        .services
        .voters
        .update(
            voter.id,
            VoterProfilePatch {
                document_number: None,
                voting_table_id: Patch::Null,
            },
        )
        .await?
        .into_data()?;
    assert!(cleared.voting_table.is_none());

    let patch: VotingCenterPatch =
        serde_json::from_str(r#"{"district": null, "name": "I.E. Santa Rosa"}"#)?;
    let center = harness
        .services
        .voting_centers
        .update(center_id, patch)
        .await?
        .into_data()?;
    assert_eq!(center.center.name, "I.E. Santa Rosa");
    assert!(center.center.district.is_none());
    assert_eq!(center.center.address, "Av. Arequipa 1200");

    Ok(())
}

#[tokio::test]
async fn test_news_ordering_and_references() -> Result<()> {
    let harness = Harness::new().await?;
    let election = harness.election("Elecciones Generales 2026").await?;

    let item = |title: &str, day: Option<u32>| NewNewsItem {
        title: title.to_string(),
        published_at: day.map(|d| Utc.with_ymd_and_hms(2026, 3, d, 9, 0, 0).unwrap()),
        election_id: Some(election),
        ..Default::default()
    };
    harness.services.news.create(item("Older", Some(1))).await?;
    harness.services.news.create(item("Newer", Some(20))).await?;
    harness.services.news.create(item("Undated", None)).await?;

    let titles: Vec<String> = harness
        .services
        .news
        .find_all()
        .await?
        .into_data()?
        .into_iter()
        .map(|item| item.title)
        .collect();
    assert_eq!(titles, ["Newer", "Older", "Undated"]);

    let dangling = harness
        .services
        .news
        .create(NewNewsItem {
            title: "Huérfana".to_string(),
            political_group_id: Some(999),
            ..Default::default()
        })
        .await;
    assert!(dangling.unwrap_err().is_not_found());

    // News outlives the election it covered
    harness.services.elections.remove(election).await?;
    let items = harness.services.news.find_all().await?.into_data()?;
    assert!(items.iter().all(|item| item.election_id.is_none()));

    Ok(())
}

#[tokio::test]
async fn test_failed_write_leaves_no_trace() -> Result<()> {
    let harness = Harness::new().await?;
    harness.voting_table("045123").await?;

    {
        let mut tx = harness.store.begin().await?;
        let mut table = tx.list::<VotingTable>().remove(0);
        table.code = "999999".to_string();
        tx.update(table)?;
        // dropped without commit
    }

    let tables = harness.services.voting_tables.find_all().await?.into_data()?;
    assert_eq!(tables[0].table.code, "045123");

    Ok(())
}

#[tokio::test]
async fn test_plans_events_and_guides() -> Result<()> {
    use electoral::model::{
        GovernmentPlanPatch, NewElectoralEvent, NewGovernmentPlan, NewGovernmentPlanSection,
        NewGuideContent,
    };
    use electoral::types::{ElectoralEventCategory, GovernmentPlanSector, GuideCategory};

    let harness = Harness::new().await?;
    let group = harness.political_group("Fuerza Andina").await?;
    let election = harness.election("Elecciones Generales 2026").await?;

    let plan = harness
        .services
        .government_plans
        .create(NewGovernmentPlan {
            political_group_id: group,
            title: "Plan de Gobierno 2026-2031".to_string(),
            from_year: Some(2026),
            to_year: Some(2031),
            ..Default::default()
        })
        .await?
        .into_data()?;

    for (order, title) in [(2, "Salud"), (1, "Educación")] {
        harness
            .services
            .government_plan_sections
            .create(NewGovernmentPlanSection {
                government_plan_id: plan.plan.id,
                sector: GovernmentPlanSector::Health,
                title: title.to_string(),
                content: "Propuestas".to_string(),
                problem_identified: "Brechas de acceso".to_string(),
                strategic_objective: "Cobertura universal".to_string(),
                indicators: "Tasa de cobertura".to_string(),
                goals: "90% al 2031".to_string(),
                order,
            })
            .await?;
    }

    let loaded = harness
        .services
        .government_plans
        .find_one(plan.plan.id)
        .await?
        .into_data()?;
    let titles: Vec<&str> = loaded.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["Educación", "Salud"]);

    let inverted = harness
        .services
        .government_plans
        .update(
            plan.plan.id,
            GovernmentPlanPatch {
                to_year: Patch::Value(2020),
                ..Default::default()
            },
        )
        .await;
    assert!(inverted.unwrap_err().is_bad_request());

    let group_view = harness
        .services
        .political_groups
        .find_one(group)
        .await?
        .into_data()?;
    assert_eq!(group_view.government_plans.len(), 1);

    let event = |name: &str, is_published| NewElectoralEvent {
        election_id: election,
        name: name.to_string(),
        description: None,
        date: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
        category: ElectoralEventCategory::Campaign,
        is_published,
    };
    let shown = harness
        .services
        .electoral_events
        .create(event("Inicio de campaña", None))
        .await?
        .into_data()?;
    assert!(shown.is_published);
    harness
        .services
        .electoral_events
        .create(event("Borrador", Some(false)))
        .await?;

    let published = harness
        .services
        .electoral_events
        .find_published(election)
        .await?
        .into_data()?;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].id, shown.id);

    let guide = harness
        .services
        .guides
        .create(NewGuideContent {
            title: "¿Cómo votar?".to_string(),
            content: "Lleva tu DNI".to_string(),
            category: GuideCategory::VotingProcess,
            election_id: Some(election),
        })
        .await?
        .into_data()?;
    let by_category = harness
        .services
        .guides
        .find_by_category(GuideCategory::VotingProcess)
        .await?
        .into_data()?;
    assert_eq!(by_category.len(), 1);

    // Plans go with their group; guides outlive their election
    harness.services.political_groups.remove(group).await?;
    let gone = harness.services.government_plans.find_one(plan.plan.id).await;
    assert!(gone.unwrap_err().is_not_found());

    harness.services.elections.remove(election).await?;
    let guide = harness.services.guides.find_one(guide.id).await?.into_data()?;
    assert!(guide.election_id.is_none());
    let events = harness.services.electoral_events.find_all().await?.into_data()?;
    assert!(events.is_empty());

    Ok(())
}
