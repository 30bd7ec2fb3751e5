    use super::*;
    use crate::error::Error;
    use crate::gateway::MockModerationGateway;
    use crate::store::MemoryStore;

    const ORIGIN: ChannelId = ChannelId(100);
    const LEADER: RoleId = RoleId(10);

    fn issuer() -> Issuer {
        Issuer::new(900u64, "mod1")
    }

    fn quiet_gateway() -> MockModerationGateway {
        let mut gateway = MockModerationGateway::new();
        gateway.expect_send_private().returning(|_, _| Ok(()));
        gateway.expect_send_public().returning(|_, _| Ok(()));
        gateway.expect_remove_roles().returning(|_, _, _| Ok(()));
        gateway
    }

    fn service_with(
        ledger: Ledger,
        store: Arc<MemoryStore>,
        gateway: MockModerationGateway,
    ) -> StrikeService {
        StrikeService::new(
            ledger,
            store,
            Arc::new(gateway),
            AccessPolicy::new([ORIGIN.0], [1]),
            EscalationPolicy::new([LEADER.0]),
        )
        .unwrap()
    }

    fn ledger_with(member: &str, count: usize) -> Ledger {
        let mut ledger = Ledger::new();
        for i in 0..count {
            ledger.append(
                member.into(),
                StrikeRecord::unstamped(format!("r{}", i), &Issuer::named("old")),
            );
        }
        ledger
    }

    fn target(id: &str) -> Target {
        Target::member(id, "user", vec![RoleId(1), LEADER])
    }

    #[tokio::test]
    async fn test_add_strike_on_empty_ledger() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Ledger::new(), store.clone(), quiet_gateway());

        let outcome = service
            .add_strike(&target("u1"), Some("spam"), &issuer(), ORIGIN)
            .await
            .unwrap();

        let AddStrikeOutcome::Added(receipt) = outcome else {
            panic!("strike was not added");
        };
        assert_eq!(receipt.total, 1);
        assert_eq!(receipt.record.reason(), "spam");
        assert_eq!(receipt.record.striked_by(), "mod1");
        assert_eq!(receipt.notice, NoticeDelivery::Private);
        assert_eq!(receipt.escalation, EscalationReport::NotTriggered);

        let saved = store.snapshot().unwrap();
        assert_eq!(saved.count(&"u1".into()), 1);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_add_strike_defaults_reason() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Ledger::new(), store, quiet_gateway());

        for reason in [None, Some("   ")] {
            let outcome = service
                .add_strike(&target("u1"), reason, &issuer(), ORIGIN)
                .await
                .unwrap();
            let AddStrikeOutcome::Added(receipt) = outcome else {
                panic!("strike was not added");
            };
            assert_eq!(receipt.record.reason(), DEFAULT_REASON);
        }
    }

    #[tokio::test]
    async fn test_add_strike_rejects_bot_targets() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = MockModerationGateway::new();
        gateway.expect_send_private().never();
        gateway.expect_send_public().never();
        gateway.expect_remove_roles().never();
        let service = service_with(Ledger::new(), store.clone(), gateway);

        for kind in [TargetKind::SelfBot, TargetKind::Application] {
            let outcome = service
                .add_strike(&target("bot").with_kind(kind), Some("x"), &issuer(), ORIGIN)
                .await
                .unwrap();
            assert!(matches!(outcome, AddStrikeOutcome::TargetRejected(k) if k == kind));
        }
        assert_eq!(store.save_count(), 0);
        assert_eq!(service.count(&"bot".into()).await, 0);
    }

    #[tokio::test]
    async fn test_add_strike_appends_last() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(ledger_with("u1", 1), store, quiet_gateway());

        service
            .add_strike(&target("u1"), Some("newest"), &issuer(), ORIGIN)
            .await
            .unwrap();

        let StrikeListing::Entries(ledger) = service.list_strikes().await else {
            panic!("ledger is empty");
        };
        let history = ledger.history(&"u1".into()).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reason(), "r0");
        assert_eq!(history[1].reason(), "newest");
    }

    #[tokio::test]
    async fn test_third_strike_demotes_once() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = MockModerationGateway::new();
        gateway
            .expect_remove_roles()
            .withf(|member, roles, _| member.as_str() == "u1" && roles.len() == 1 && roles[0] == LEADER)
            .times(1)
            .returning(|_, _, _| Ok(()));
        gateway
            .expect_send_private()
            .withf(|_, text| text.contains("leadership role"))
            .times(1)
            .returning(|_, _| Ok(()));
        gateway
            .expect_send_private()
            .withf(|_, text| text.contains("received a strike"))
            .times(1)
            .returning(|_, _| Ok(()));
        let service = service_with(ledger_with("u1", 2), store, gateway);

        let outcome = service
            .add_strike(&target("u1"), Some("third"), &issuer(), ORIGIN)
            .await
            .unwrap();

        let AddStrikeOutcome::Added(receipt) = outcome else {
            panic!("strike was not added");
        };
        assert_eq!(receipt.total, 3);
        assert_eq!(
            receipt.escalation,
            EscalationReport::Demoted {
                roles: vec![LEADER],
                notice: NoticeDelivery::Private,
            }
        );
    }

    #[tokio::test]
    async fn test_limit_reached_does_not_mutate() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = MockModerationGateway::new();
        gateway.expect_send_private().never();
        gateway.expect_remove_roles().never();
        let service = service_with(ledger_with("u1", 3), store.clone(), gateway);

        let outcome = service
            .add_strike(&target("u1"), Some("fourth"), &issuer(), ORIGIN)
            .await
            .unwrap();

        assert!(matches!(outcome, AddStrikeOutcome::LimitReached { total: 3 }));
        assert_eq!(service.count(&"u1".into()).await, 3);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_threshold_without_leadership_roles_posts_info() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = MockModerationGateway::new();
        gateway.expect_remove_roles().never();
        gateway
            .expect_send_private()
            .withf(|_, text| text.contains("received a strike"))
            .times(1)
            .returning(|_, _| Ok(()));
        gateway
            .expect_send_public()
            .withf(|channel, text| *channel == ORIGIN && text.contains("none were removed"))
            .times(1)
            .returning(|_, _| Ok(()));
        let service = service_with(ledger_with("u1", 2), store, gateway);

        let plain = Target::member("u1", "user", vec![RoleId(1)]);
        let outcome = service
            .add_strike(&plain, None, &issuer(), ORIGIN)
            .await
            .unwrap();

        let AddStrikeOutcome::Added(receipt) = outcome else {
            panic!("strike was not added");
        };
        assert_eq!(receipt.escalation, EscalationReport::NothingToRemove);
    }

    #[tokio::test]
    async fn test_closed_private_messages_fall_back_to_channel() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = MockModerationGateway::new();
        gateway
            .expect_send_private()
            .returning(|_, _| Err(Error::PrivateMessageUnavailable));
        gateway
            .expect_send_public()
            .withf(|channel, text| *channel == ORIGIN && text.starts_with("<@u1>"))
            .times(1)
            .returning(|_, _| Ok(()));
        let service = service_with(Ledger::new(), store.clone(), gateway);

        let outcome = service
            .add_strike(&target("u1"), Some("spam"), &issuer(), ORIGIN)
            .await
            .unwrap();

        let AddStrikeOutcome::Added(receipt) = outcome else {
            panic!("strike was not added");
        };
        assert_eq!(receipt.notice, NoticeDelivery::PublicFallback);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_notice_failure_does_not_fail_strike() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = MockModerationGateway::new();
        gateway
            .expect_send_private()
            .returning(|_, _| Err(Error::Gateway("503".to_string())));
        gateway.expect_send_public().never();
        let service = service_with(Ledger::new(), store, gateway);

        let outcome = service
            .add_strike(&target("u1"), Some("spam"), &issuer(), ORIGIN)
            .await
            .unwrap();

        let AddStrikeOutcome::Added(receipt) = outcome else {
            panic!("strike was not added");
        };
        assert_eq!(receipt.notice, NoticeDelivery::Failed);
    }

    #[tokio::test]
    async fn test_role_removal_failure_is_reported() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = MockModerationGateway::new();
        gateway.expect_send_private().returning(|_, _| Ok(()));
        gateway
            .expect_remove_roles()
            .times(1)
            .returning(|_, _, _| Err(Error::Gateway("Missing Permissions".to_string())));
        let service = service_with(ledger_with("u1", 2), store, gateway);

        let outcome = service
            .add_strike(&target("u1"), Some("third"), &issuer(), ORIGIN)
            .await
            .unwrap();

        let AddStrikeOutcome::Added(receipt) = outcome else {
            panic!("strike was not added");
        };
        assert!(matches!(
            receipt.escalation,
            EscalationReport::RoleRemovalFailed { ref error, .. } if error.contains("Missing Permissions")
        ));
    }

    #[tokio::test]
    async fn test_save_failure_surfaces_and_rolls_back() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_saves(true);
        let mut gateway = MockModerationGateway::new();
        gateway.expect_send_private().never();
        gateway.expect_remove_roles().never();
        let service = service_with(Ledger::new(), store.clone(), gateway);

        let err = service
            .add_strike(&target("u1"), Some("spam"), &issuer(), ORIGIN)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Persistence { .. }));
        assert_eq!(service.count(&"u1".into()).await, 0);
        assert!(matches!(service.list_strikes().await, StrikeListing::Empty));
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_retry_after_failed_threshold_strike_demotes() {
        let store = Arc::new(MemoryStore::new());
        let mut gateway = MockModerationGateway::new();
        gateway.expect_send_private().returning(|_, _| Ok(()));
        gateway
            .expect_remove_roles()
            .times(1)
            .returning(|_, _, _| Ok(()));
        let service = service_with(ledger_with("u1", 2), store.clone(), gateway);

        store.set_fail_saves(true);
        assert!(service
            .add_strike(&target("u1"), Some("third"), &issuer(), ORIGIN)
            .await
            .is_err());
        assert_eq!(service.count(&"u1".into()).await, 2);

        store.set_fail_saves(false);
        let outcome = service
            .add_strike(&target("u1"), Some("third"), &issuer(), ORIGIN)
            .await
            .unwrap();

        let AddStrikeOutcome::Added(receipt) = outcome else {
            panic!("retry was refused");
        };
        assert_eq!(receipt.total, 3);
        assert!(matches!(receipt.escalation, EscalationReport::Demoted { .. }));
        assert_eq!(store.snapshot().unwrap().count(&"u1".into()), 3);
    }

    #[tokio::test]
    async fn test_failed_delete_and_clear_leave_ledger_intact() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_saves(true);
        let service = service_with(ledger_with("u1", 3), store, quiet_gateway());

        assert!(service
            .delete_strikes(&"u1".into(), DeleteAmount::Oldest(2))
            .await
            .is_err());
        assert_eq!(service.count(&"u1".into()).await, 3);

        assert!(service.clear_all().await.is_err());
        assert_eq!(service.count(&"u1".into()).await, 3);
    }

    #[tokio::test]
    async fn test_delete_zero_is_not_delete_all() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(ledger_with("u1", 2), store.clone(), quiet_gateway());

        let removal = service
            .delete_strikes(&"u1".into(), DeleteAmount::Oldest(0))
            .await
            .unwrap();

        assert_eq!(removal, Removal::Nothing { remaining: 2 });
        assert_eq!(service.count(&"u1".into()).await, 2);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_oldest_two_of_three() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(ledger_with("u1", 3), store.clone(), quiet_gateway());

        let removal = service
            .delete_strikes(&"u1".into(), DeleteAmount::Oldest(2))
            .await
            .unwrap();

        let Removal::Partial { removed, remaining } = removal else {
            panic!("expected partial removal");
        };
        let reasons: Vec<_> = removed.iter().map(StrikeRecord::reason).collect();
        assert_eq!(reasons, vec!["r0", "r1"]);
        assert_eq!(remaining, 1);

        let saved = store.snapshot().unwrap();
        assert_eq!(saved.history(&"u1".into()).unwrap()[0].reason(), "r2");
    }

    #[tokio::test]
    async fn test_delete_all_removes_member_from_listing() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(ledger_with("u1", 2), store, quiet_gateway());

        let removal = service
            .delete_strikes(&"u1".into(), DeleteAmount::All)
            .await
            .unwrap();

        assert!(matches!(removal, Removal::All { .. }));
        assert!(matches!(service.list_strikes().await, StrikeListing::Empty));
    }

    #[tokio::test]
    async fn test_delete_unknown_member() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Ledger::new(), store.clone(), quiet_gateway());

        let removal = service
            .delete_strikes(&"u1".into(), DeleteAmount::All)
            .await
            .unwrap();

        assert_eq!(removal, Removal::NoStrikes);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_rearms_escalation() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(ledger_with("u1", 3), store, quiet_gateway());

        service
            .delete_strikes(&"u1".into(), DeleteAmount::Oldest(1))
            .await
            .unwrap();
        let outcome = service
            .add_strike(&target("u1"), Some("again"), &issuer(), ORIGIN)
            .await
            .unwrap();

        let AddStrikeOutcome::Added(receipt) = outcome else {
            panic!("strike was not added");
        };
        assert_eq!(receipt.total, 3);
        assert!(matches!(receipt.escalation, EscalationReport::Demoted { .. }));
    }

    #[tokio::test]
    async fn test_clear_all() {
        let store = Arc::new(MemoryStore::new());
        let mut ledger = ledger_with("u1", 2);
        ledger.append("u2".into(), StrikeRecord::unstamped("x", &Issuer::named("m")));
        let service = service_with(ledger, store.clone(), quiet_gateway());

        assert_eq!(service.clear_all().await.unwrap(), 2);
        assert!(matches!(service.list_strikes().await, StrikeListing::Empty));
        assert!(store.snapshot().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_on_empty_ledger() {
        let store = Arc::new(MemoryStore::new());
        let service = service_with(Ledger::new(), store.clone(), quiet_gateway());

        assert_eq!(service.clear_all().await.unwrap(), 0);
        assert!(matches!(service.list_strikes().await, StrikeListing::Empty));
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_load_from_store() {
        let store = Arc::new(MemoryStore::with_ledger(ledger_with("u1", 2)));
        let service = StrikeService::load(
            store,
            Arc::new(quiet_gateway()),
            AccessPolicy::default(),
            EscalationPolicy::default(),
        )
        .await
        .unwrap();

        assert_eq!(service.count(&"u1".into()).await, 2);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = StrikeService::new(
            Ledger::new(),
            Arc::new(MemoryStore::new()),
            Arc::new(MockModerationGateway::new()),
            AccessPolicy::default(),
            EscalationPolicy::default().with_threshold(0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_authorize_delegates_to_policy() {
        let service = service_with(
            Ledger::new(),
            Arc::new(MemoryStore::new()),
            MockModerationGateway::new(),
        );
        assert!(service.authorize(ORIGIN, &[RoleId(1)]).is_granted());
        assert_eq!(
            service.authorize(ChannelId(5), &[RoleId(1)]),
            AccessDecision::WrongChannel
        );
    }
