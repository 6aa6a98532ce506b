//! Sled-backed vault survives a reopen

use formation_vault::{
    Classification, FormationFields, FormationVault, GrantRequest, InvocationContext,
    MutationProfile, Principal, SledLedger, VaultConfig,
};

fn fields() -> FormationFields {
    FormationFields {
        signature: "sig1".to_string(),
        content_hash: "c".repeat(64),
        metadata: "persisted".to_string(),
        cluster: "c1".to_string(),
        resonance_tags: vec!["f1".to_string()],
    }
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sled");

    {
        let vault = FormationVault::new(SledLedger::open(&path).unwrap());
        let id = vault
            .create_formation(
                InvocationContext::new("P", 1),
                MutationProfile::Fortified,
                fields(),
            )
            .await
            .unwrap();
        vault
            .grant_access(
                InvocationContext::new("P", 2),
                GrantRequest {
                    formation_id: id,
                    grantee: Principal::from("R"),
                    classification: "manipulator".to_string(),
                    duration: 50,
                    can_modify: true,
                },
            )
            .await
            .unwrap();
    }

    let vault = FormationVault::new(SledLedger::open(&path).unwrap());
    let formation = vault.get_formation(1).await.unwrap().unwrap();
    assert_eq!(formation.metadata, "persisted");
    assert_eq!(vault.get_metadata(1).await.unwrap().unwrap().stability, 250);

    let grant = vault
        .check_clearance(1, &Principal::from("R"), Classification::Observer, 10)
        .await
        .unwrap();
    assert_eq!(grant.expires_at, 52);

    let state = vault.registry_state().await.unwrap();
    assert_eq!(state.sequence_tracker, 1);
    assert_eq!(state.total_operations, 2);

    let next = vault
        .create_formation(InvocationContext::new("Q", 3), MutationProfile::Standard, fields())
        .await
        .unwrap();
    assert_eq!(next, 2);
}

#[tokio::test]
async fn test_config_opens_sled_vault() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = VaultConfig::default();
    config.storage.path = dir.path().to_path_buf();

    let vault = config.open_vault().unwrap();
    let id = vault
        .create_formation(InvocationContext::new("P", 1), MutationProfile::Standard, fields())
        .await
        .unwrap();
    assert_eq!(id, 1);
    assert!(config.ledger_path().exists());
}
