use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use campaign_core::{ActorKey, AggregateEntry, DamageScore, SessionId};
use campaign_session::{
    ActorCategory, ActorDescriptor, CampaignCore, CollectingCore, DeathListener, HostEvent,
    MissionSession, SessionError,
};

fn flight1() -> ActorDescriptor {
    ActorDescriptor::new(1, ActorCategory::Aircraft, "flight1", "Bf109")
}

#[derive(Clone, Default)]
struct KeyLog(Arc<Mutex<Vec<String>>>);

impl DeathListener for KeyLog {
    fn on_actor_dead(&mut self, key: &ActorKey, damages: &[DamageScore]) {
        self.0
            .lock()
            .unwrap()
            .push(format!("{} x{}", key, damages.len()));
    }
}

#[tokio::test]
async fn test_repeated_death_merges_in_order() {
    let mut session = MissionSession::new();
    session
        .dispatch(HostEvent::ActorDead {
            actor: flight1(),
            damages: vec![DamageScore::by_player(10.0, "P1")],
        })
        .unwrap();
    session
        .dispatch(HostEvent::ActorDead {
            actor: flight1(),
            damages: vec![DamageScore::anonymous(5.0)],
        })
        .unwrap();

    let core = CollectingCore::new();
    let session_id = session.id().clone();
    let report = session.finish(&core).await.unwrap();

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].key.to_string(), "Red|Airborne|flight1|Bf109");
    assert_eq!(
        report.entries[0].contributions,
        vec![DamageScore::by_player(10.0, "P1"), DamageScore::anonymous(5.0)]
    );
    assert_eq!(report.deaths_recorded, 2);

    let submissions = core.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0, session_id);
    assert_eq!(submissions[0].1, report.entries);
}

#[tokio::test]
async fn test_listeners_see_tracked_deaths_only() {
    let log = KeyLog::default();
    let mut session = MissionSession::new();
    session.add_listener(log.clone());

    let events = [
        r#"{"type":"mission_started","mission":"Kanalkampf"}"#,
        r#"{"type":"actor_created","actor":{"army":2,"category":"ground_unit","short_name":"0_Chief","internal_type_name":"Tank.Pz_IIIE"}}"#,
        r#"{"type":"actor_damaged","actor":{"army":2,"category":"ground_unit","short_name":"0_Chief","internal_type_name":"Tank.Pz_IIIE"},"damage":{"score":0.4,"initiator":{"ai":"Hurricane"}}}"#,
        r#"{"type":"actor_dead","actor":{"army":2,"category":"person","short_name":"crew","internal_type_name":"Pilot"},"damages":[]}"#,
        r#"{"type":"actor_dead","actor":{"army":2,"category":"ground_unit","short_name":"0_Chief","internal_type_name":"Tank.Pz_IIIE"},"damages":[]}"#,
        r#"{"type":"mission_ended"}"#,
    ];
    for line in events {
        session.dispatch(HostEvent::from_json(line).unwrap()).unwrap();
    }

    assert_eq!(
        *log.0.lock().unwrap(),
        vec!["Blue|Ground|0_Chief|Tank.Pz_IIIE x0".to_string()]
    );

    let report = session.finish(&CollectingCore::new()).await.unwrap();
    assert_eq!(report.mission.as_deref(), Some("Kanalkampf"));
    assert_eq!(report.deaths_recorded, 1);
    assert_eq!(report.deaths_skipped, 1);
    assert!(report.entries[0].contributions.is_empty());
    assert!(report.finished_at >= report.started_at);
}

/// Core that refuses every submission.
struct OfflineCore;

#[async_trait]
impl CampaignCore for OfflineCore {
    async fn submit_outcomes(
        &self,
        _session_id: &SessionId,
        _entries: Vec<AggregateEntry>,
    ) -> Result<(), SessionError> {
        Err(SessionError::Submit("campaign server offline".to_string()))
    }
}

#[tokio::test]
async fn test_rejected_submission_fails_finish() {
    let mut session = MissionSession::new();
    session
        .dispatch(HostEvent::ActorDead {
            actor: flight1(),
            damages: vec![DamageScore::anonymous(1.0)],
        })
        .unwrap();

    let err = session.finish(&OfflineCore).await.unwrap_err();
    assert!(matches!(err, SessionError::Submit(_)));
    assert!(!err.is_contract_violation());
    assert_eq!(
        err.to_string(),
        "Failed to submit outcomes to campaign core: campaign server offline"
    );
}
